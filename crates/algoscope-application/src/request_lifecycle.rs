//! Request lifecycle of a single analysis.
//!
//! At most one analysis request is in flight at any time, across all
//! sessions. Admission goes through a [`RequestGate`], which hands out a
//! [`RequestPermit`]; the gate reopens when the permit is dropped, whether
//! the request succeeded, failed or its future was cancelled.

use algoscope_core::analysis::AnalysisResult;
use algoscope_core::gateway::{AnalysisGateway, GatewayError};
use algoscope_core::session::InputMode;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Label of an answered pseudocode analysis when the service sent none.
pub const PSEUDOCODE_READY_LABEL: &str = "Analysis ready";

/// Label of an answered natural-language analysis when the service sent none.
pub const NATURAL_READY_LABEL: &str = "Translation and analysis ready";

// ============================================================================
// Gate
// ============================================================================

/// System-wide single-flight gate for analysis requests.
#[derive(Debug, Clone, Default)]
pub struct RequestGate {
    busy: Arc<AtomicBool>,
}

impl RequestGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Admits a request if none is in flight.
    ///
    /// # Returns
    ///
    /// - `Some(RequestPermit)`: the caller now owns the in-flight slot
    /// - `None`: another request is in flight
    pub fn try_admit(&self) -> Option<RequestPermit> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| RequestPermit {
                busy: Arc::clone(&self.busy),
            })
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

/// Proof that the holder owns the in-flight slot. Releases it on drop.
#[derive(Debug)]
pub struct RequestPermit {
    busy: Arc<AtomicBool>,
}

impl Drop for RequestPermit {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}

/// Sends `content` to the endpoint matching `mode`.
///
/// Natural-language payloads are folded into an [`AnalysisResult`] carrying
/// a translation block. The permit is only borrowed; the caller decides when
/// the slot is released.
///
/// # Errors
///
/// Propagates the gateway's error unchanged.
pub async fn dispatch(
    gateway: &dyn AnalysisGateway,
    mode: InputMode,
    content: &str,
    _permit: &RequestPermit,
) -> Result<AnalysisResult, GatewayError> {
    match mode {
        InputMode::Pseudocode => gateway.analyze_pseudocode(content).await,
        InputMode::Natural => gateway.analyze_natural(content).await.map(AnalysisResult::from),
    }
}

/// Label shown for an answered request.
pub fn ready_label(mode: InputMode, result: &AnalysisResult) -> String {
    match result.summary_label() {
        Some(label) => label.to_string(),
        None => match mode {
            InputMode::Pseudocode => PSEUDOCODE_READY_LABEL.to_string(),
            InputMode::Natural => NATURAL_READY_LABEL.to_string(),
        },
    }
}

// ============================================================================
// Failure classification
// ============================================================================

/// User-facing category of a failed request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    Network,
    Timeout,
    Analysis,
    Generic,
}

impl FailureClass {
    /// Classifies a raw error message by case-insensitive keywords.
    pub fn classify(raw: &str) -> Self {
        let lower = raw.to_lowercase();
        if lower.contains("failed to fetch") || lower.contains("network") {
            FailureClass::Network
        } else if lower.contains("timeout") {
            FailureClass::Timeout
        } else if lower.contains("http 400")
            || lower.contains("http 422")
            || lower.contains("error building ast")
        {
            FailureClass::Analysis
        } else {
            FailureClass::Generic
        }
    }

    pub fn friendly_message(&self) -> &'static str {
        match self {
            FailureClass::Network => {
                "Could not connect to the server. Check that the backend is running and your connection works."
            }
            FailureClass::Timeout => {
                "The request took too long. Check your connection or try again."
            }
            FailureClass::Analysis => {
                "Your code could not be analyzed. Check the syntax or the selected input type."
            }
            FailureClass::Generic => "There was a problem processing your message.",
        }
    }

    pub fn hint(&self) -> &'static str {
        match self {
            FailureClass::Network => {
                "Hint: make sure the backend is up and nothing blocks the connection."
            }
            FailureClass::Timeout => "Hint: the service may be busy; retry in a moment.",
            FailureClass::Analysis => {
                "Hint: try simplifying the snippet or fix possible syntax errors."
            }
            FailureClass::Generic => "If the error persists, try again later.",
        }
    }
}

// ============================================================================
// Outcome
// ============================================================================

/// Why a send was not admitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    NoCurrentSession,
    NoInputMode,
    RequestInFlight,
    NothingToRetry,
}

/// Result of a send or retry, observable without any error being surfaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// The pending message was answered.
    Answered,
    /// The pending message was marked failed.
    Failed(FailureClass),
    /// Nothing happened: no state change and no gateway call.
    Rejected(RejectReason),
    /// The request completed but its session no longer exists.
    Discarded,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gate_admits_one_at_a_time() {
        let gate = RequestGate::new();
        let permit = gate.try_admit().unwrap();
        assert!(gate.is_busy());
        assert!(gate.try_admit().is_none());

        drop(permit);
        assert!(!gate.is_busy());
        assert!(gate.try_admit().is_some());
        assert!(!gate.is_busy());
    }

    #[test]
    fn test_clones_share_the_slot() {
        let gate = RequestGate::new();
        let other = gate.clone();
        let _permit = gate.try_admit().unwrap();
        assert!(other.is_busy());
        assert!(other.try_admit().is_none());
    }

    #[test]
    fn test_classify_keywords() {
        assert_eq!(FailureClass::classify("TypeError: Failed to fetch"), FailureClass::Network);
        assert_eq!(
            FailureClass::classify("network error: connection refused"),
            FailureClass::Network
        );
        assert_eq!(
            FailureClass::classify("request timeout: operation timed out"),
            FailureClass::Timeout
        );
        assert_eq!(
            FailureClass::classify("HTTP 422: Error building AST"),
            FailureClass::Analysis
        );
        assert_eq!(FailureClass::classify("http 400: bad input"), FailureClass::Analysis);
        assert_eq!(FailureClass::classify("HTTP 500: boom"), FailureClass::Generic);
        assert_eq!(FailureClass::classify(""), FailureClass::Generic);
    }

    #[test]
    fn test_ready_label_prefers_service_label() {
        let mut result = AnalysisResult::default();
        assert_eq!(ready_label(InputMode::Pseudocode, &result), PSEUDOCODE_READY_LABEL);
        assert_eq!(ready_label(InputMode::Natural, &result), NATURAL_READY_LABEL);

        result.pretty = Some("Merge sort".to_string());
        assert_eq!(ready_label(InputMode::Natural, &result), "Merge sort");
    }
}
