//! Session store.
//!
//! Owns every chat session, the current-session pointer, the theme flag and
//! the single in-flight request gate. Constructed once and shared as
//! `Arc<SessionStore>` by all consumers.

use crate::request_lifecycle::{
    FailureClass, RejectReason, RequestGate, SendOutcome, dispatch, ready_label,
};
use algoscope_core::gateway::AnalysisGateway;
use algoscope_core::session::{BOOTSTRAP_TITLE, InputMode, Message, NEW_SESSION_TITLE, Session};
use algoscope_core::theme::ThemeMode;
use algoscope_core::{AlgoscopeError, Result};
use algoscope_infrastructure::CacheRecordAdapter;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug)]
struct StoreState {
    /// Newest first
    sessions: Vec<Session>,
    current_session_id: Option<String>,
    theme: ThemeMode,
}

impl StoreState {
    fn session(&self, id: &str) -> Option<&Session> {
        self.sessions.iter().find(|s| s.id == id)
    }

    fn session_mut(&mut self, id: &str) -> Option<&mut Session> {
        self.sessions.iter_mut().find(|s| s.id == id)
    }

    fn current(&self) -> Option<&Session> {
        self.current_session_id
            .as_deref()
            .and_then(|id| self.session(id))
    }
}

/// Application-level owner of chat sessions.
///
/// # Thread Safety
///
/// State lives behind a `tokio::sync::RwLock`. The lock is never held across
/// a gateway call, so reads stay responsive while a request is in flight.
pub struct SessionStore {
    state: RwLock<StoreState>,
    gate: RequestGate,
    gateway: Arc<dyn AnalysisGateway>,
    adapter: CacheRecordAdapter,
}

impl SessionStore {
    /// Creates a store holding one empty bootstrap session, made current.
    pub fn new(gateway: Arc<dyn AnalysisGateway>) -> Self {
        Self::with_theme(gateway, ThemeMode::default())
    }

    /// Creates a store with an initial theme.
    pub fn with_theme(gateway: Arc<dyn AnalysisGateway>, theme: ThemeMode) -> Self {
        let bootstrap = Session::new(BOOTSTRAP_TITLE);
        let current_session_id = Some(bootstrap.id.clone());
        Self {
            state: RwLock::new(StoreState {
                sessions: vec![bootstrap],
                current_session_id,
                theme,
            }),
            gate: RequestGate::new(),
            gateway,
            adapter: CacheRecordAdapter::new(),
        }
    }

    // ============================================================================
    // Session management
    // ============================================================================

    /// Creates an empty session, puts it first and makes it current.
    ///
    /// # Returns
    ///
    /// The id of the new session.
    pub async fn create_session(&self) -> String {
        let session = Session::new(NEW_SESSION_TITLE);
        let id = session.id.clone();

        let mut state = self.state.write().await;
        state.sessions.insert(0, session);
        state.current_session_id = Some(id.clone());
        tracing::debug!("[SessionStore] Created session {}", id);
        id
    }

    /// Makes `session_id` the current session.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no session has that id; the current session is
    /// left unchanged.
    pub async fn set_current_session(&self, session_id: &str) -> Result<()> {
        let mut state = self.state.write().await;
        if state.session(session_id).is_none() {
            return Err(AlgoscopeError::not_found("Session", session_id));
        }
        state.current_session_id = Some(session_id.to_string());
        Ok(())
    }

    /// Sets the input mode of the current session.
    ///
    /// # Returns
    ///
    /// `true` if applied; `false` if there is no current session or it
    /// already has a mode.
    pub async fn set_input_mode(&self, mode: InputMode) -> bool {
        let mut state = self.state.write().await;
        let Some(id) = state.current_session_id.clone() else {
            return false;
        };
        state
            .session_mut(&id)
            .is_some_and(|session| session.set_input_mode(mode))
    }

    /// Renames a session. Blank titles and unknown ids are ignored.
    ///
    /// # Returns
    ///
    /// `true` if the title changed.
    pub async fn rename_session(&self, session_id: &str, title: &str) -> bool {
        let title = title.trim();
        if title.is_empty() {
            return false;
        }
        let mut state = self.state.write().await;
        match state.session_mut(session_id) {
            Some(session) => {
                session.title = title.to_string();
                true
            }
            None => false,
        }
    }

    /// Flips between light and dark, returning the new theme.
    pub async fn toggle_theme(&self) -> ThemeMode {
        let mut state = self.state.write().await;
        state.theme = state.theme.toggled();
        state.theme
    }

    // ============================================================================
    // Requests
    // ============================================================================

    /// Sends `content` as a new message of the current session.
    ///
    /// Rejected silently (no state change, no gateway call) when there is no
    /// current session, the session has no input mode, or another request is
    /// in flight. Otherwise the user message and a pending assistant message
    /// are appended together, the gateway is called, and the pending message
    /// settles as answered or failed.
    pub async fn send_message(&self, content: &str) -> SendOutcome {
        let (session_id, pending_id, mode, permit) = {
            let mut state = self.state.write().await;
            let Some(session_id) = state.current_session_id.clone() else {
                return SendOutcome::Rejected(RejectReason::NoCurrentSession);
            };
            let Some(session) = state.session(&session_id) else {
                return SendOutcome::Rejected(RejectReason::NoCurrentSession);
            };
            let Some(mode) = session.input_mode() else {
                return SendOutcome::Rejected(RejectReason::NoInputMode);
            };
            let Some(permit) = self.gate.try_admit() else {
                tracing::debug!("[SessionStore] Send rejected: request in flight");
                return SendOutcome::Rejected(RejectReason::RequestInFlight);
            };

            let pending = Message::pending_assistant();
            let pending_id = pending.id().to_string();
            let Some(session) = state.session_mut(&session_id) else {
                return SendOutcome::Rejected(RejectReason::NoCurrentSession);
            };
            session.push_exchange(Message::user(content), pending);
            (session_id, pending_id, mode, permit)
        };

        tracing::info!(
            "[SessionStore] Dispatching {} analysis for session {}",
            mode,
            session_id
        );
        let result = dispatch(self.gateway.as_ref(), mode, content, &permit).await;

        let mut state = self.state.write().await;
        let Some(message) = state
            .session_mut(&session_id)
            .and_then(|session| session.message_mut(&pending_id))
        else {
            tracing::warn!(
                "[SessionStore] Session {} vanished while its request was in flight; discarding result",
                session_id
            );
            return SendOutcome::Discarded;
        };

        let (outcome, settled) = match result {
            Ok(analysis) => {
                let label = ready_label(mode, &analysis);
                (SendOutcome::Answered, message.resolve(label, analysis))
            }
            Err(err) => {
                let raw = err.to_string();
                let class = FailureClass::classify(&raw);
                tracing::warn!("[SessionStore] Analysis failed ({:?}): {}", class, raw);
                (
                    SendOutcome::Failed(class),
                    message.fail(class.friendly_message(), raw),
                )
            }
        };
        if let Err(e) = settled {
            tracing::error!("[SessionStore] Could not settle message {}: {}", pending_id, e);
        }

        drop(state);
        drop(permit);
        outcome
    }

    /// Re-sends the most recent user message of the current session.
    ///
    /// No-op while a request is in flight, without a current session, or
    /// when the current session has no user message.
    pub async fn retry_last(&self) -> SendOutcome {
        if self.gate.is_busy() {
            return SendOutcome::Rejected(RejectReason::RequestInFlight);
        }
        let content = {
            let state = self.state.read().await;
            let Some(session) = state.current() else {
                return SendOutcome::Rejected(RejectReason::NoCurrentSession);
            };
            match session.last_user_message() {
                Some(message) => message.content().to_string(),
                None => return SendOutcome::Rejected(RejectReason::NothingToRetry),
            }
        };
        self.send_message(&content).await
    }

    /// Replaces the sessions with those restored from the service cache.
    ///
    /// The bootstrap state is kept when the cache is empty, yields no usable
    /// record, or cannot be fetched; fetch failures are logged only.
    ///
    /// # Returns
    ///
    /// The number of restored sessions.
    pub async fn rehydrate_from_cache(&self) -> usize {
        let records = match self.gateway.fetch_cached_algorithms().await {
            Ok(records) => records,
            Err(e) => {
                tracing::error!("[SessionStore] Could not load cached analyses: {}", e);
                return 0;
            }
        };

        let restored = self.adapter.to_sessions(&records);
        if restored.is_empty() {
            tracing::debug!("[SessionStore] Cache yielded no sessions; keeping current state");
            return 0;
        }

        let count = restored.len();
        let mut state = self.state.write().await;
        state.current_session_id = restored.first().map(|s| s.id.clone());
        state.sessions = restored;
        tracing::info!("[SessionStore] Restored {} sessions from cache", count);
        count
    }

    // ============================================================================
    // Accessors
    // ============================================================================

    /// Snapshot of all sessions, newest first.
    pub async fn sessions(&self) -> Vec<Session> {
        self.state.read().await.sessions.clone()
    }

    /// Snapshot of the current session.
    pub async fn current_session(&self) -> Option<Session> {
        self.state.read().await.current().cloned()
    }

    pub async fn current_session_id(&self) -> Option<String> {
        self.state.read().await.current_session_id.clone()
    }

    /// Whether an analysis request is in flight.
    pub fn is_loading(&self) -> bool {
        self.gate.is_busy()
    }

    pub async fn theme(&self) -> ThemeMode {
        self.state.read().await.theme
    }
}
