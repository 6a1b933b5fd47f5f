//! Chat message types.
//!
//! An assistant message starts out pending and settles exactly once, either
//! answered (with an analysis attached) or failed. User messages are
//! complete from the start and never carry an analysis.

use crate::analysis::AnalysisResult;
use crate::error::{AlgoscopeError, Result};
use serde::{Deserialize, Serialize};

/// Content of an assistant message while its request is in flight.
pub const PENDING_CONTENT: &str = "Analyzing...";

/// Prefix of the content of a failed assistant message.
pub const ERROR_PREFIX: &str = "Error: ";

/// Represents the author of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// Message typed by the user.
    User,
    /// Reply produced from the analysis service.
    Assistant,
}

/// Lifecycle state of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageStatus {
    Complete,
    Pending,
    Failed,
}

/// A single message in a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    id: String,
    role: MessageRole,
    content: String,
    status: MessageStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    analysis: Option<AnalysisResult>,
    /// Raw error text behind a failure, kept for diagnostics.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error_detail: Option<String>,
    /// Creation timestamp (RFC 3339)
    created_at: String,
}

impl Message {
    fn build(id: String, role: MessageRole, content: String, status: MessageStatus) -> Self {
        Self {
            id,
            role,
            content,
            status,
            analysis: None,
            error_detail: None,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Creates a user message with a fresh id.
    pub fn user(content: impl Into<String>) -> Self {
        Self::build(
            super::new_id(),
            MessageRole::User,
            content.into(),
            MessageStatus::Complete,
        )
    }

    /// Creates a pending assistant placeholder with a fresh id.
    pub fn pending_assistant() -> Self {
        Self::build(
            super::new_id(),
            MessageRole::Assistant,
            PENDING_CONTENT.to_string(),
            MessageStatus::Pending,
        )
    }

    /// Creates an assistant message that is already answered.
    ///
    /// Used when messages are restored rather than produced by a live
    /// request.
    pub fn answered_assistant(
        id: impl Into<String>,
        label: impl Into<String>,
        analysis: AnalysisResult,
    ) -> Self {
        let mut message = Self::build(
            id.into(),
            MessageRole::Assistant,
            label.into(),
            MessageStatus::Complete,
        );
        message.analysis = Some(analysis);
        message
    }

    /// Replaces the generated id.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    // ============================================================================
    // Transitions
    // ============================================================================

    /// Settles a pending message as answered.
    ///
    /// # Errors
    ///
    /// Returns `InvalidState` if the message is not pending; the message is
    /// left untouched.
    pub fn resolve(&mut self, label: impl Into<String>, analysis: AnalysisResult) -> Result<()> {
        self.ensure_pending()?;
        self.content = label.into();
        self.analysis = Some(analysis);
        self.status = MessageStatus::Complete;
        Ok(())
    }

    /// Settles a pending message as failed.
    ///
    /// The content becomes `"Error: "` followed by `friendly`; `detail` is
    /// kept as the raw error text.
    ///
    /// # Errors
    ///
    /// Returns `InvalidState` if the message is not pending.
    pub fn fail(&mut self, friendly: &str, detail: impl Into<String>) -> Result<()> {
        self.ensure_pending()?;
        self.content = format!("{ERROR_PREFIX}{friendly}");
        self.error_detail = Some(detail.into());
        self.status = MessageStatus::Failed;
        Ok(())
    }

    fn ensure_pending(&self) -> Result<()> {
        if self.status == MessageStatus::Pending {
            Ok(())
        } else {
            Err(AlgoscopeError::invalid_state(format!(
                "message {} is already settled ({:?})",
                self.id, self.status
            )))
        }
    }

    // ============================================================================
    // Accessors
    // ============================================================================

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn role(&self) -> MessageRole {
        self.role
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn status(&self) -> MessageStatus {
        self.status
    }

    pub fn analysis(&self) -> Option<&AnalysisResult> {
        self.analysis.as_ref()
    }

    pub fn error_detail(&self) -> Option<&str> {
        self.error_detail.as_deref()
    }

    pub fn created_at(&self) -> &str {
        &self.created_at
    }

    pub fn is_user(&self) -> bool {
        self.role == MessageRole::User
    }

    pub fn is_pending(&self) -> bool {
        self.status == MessageStatus::Pending
    }

    pub fn is_error(&self) -> bool {
        self.status == MessageStatus::Failed
    }

    pub fn is_terminal(&self) -> bool {
        self.status != MessageStatus::Pending
    }
}
