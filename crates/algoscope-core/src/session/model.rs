//! Session domain model.

use super::input_mode::InputMode;
use super::message::{Message, MessageRole};
use serde::{Deserialize, Serialize};

/// Title of the session that exists before anything else is loaded.
pub const BOOTSTRAP_TITLE: &str = "Initial chat";

/// Title of a session created by the user.
pub const NEW_SESSION_TITLE: &str = "New chat";

/// A session takes the first this-many characters of its first message as
/// title.
pub const TITLE_MAX_CHARS: usize = 30;

/// An independent chat with its own input mode and message history.
///
/// Message ordering and the set-once input mode are enforced by keeping
/// those fields private; mutation goes through the methods below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Unique session identifier
    pub id: String,
    /// Human-readable session title
    pub title: String,
    input_mode: Option<InputMode>,
    messages: Vec<Message>,
    /// Timestamp when the session was created (RFC 3339)
    pub created_at: String,
}

impl Session {
    /// Creates an empty session with a fresh id and no input mode.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: super::new_id(),
            title: title.into(),
            input_mode: None,
            messages: Vec::new(),
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Rebuilds a session from already-settled data.
    pub fn restored(
        id: impl Into<String>,
        title: impl Into<String>,
        input_mode: InputMode,
        messages: Vec<Message>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            input_mode: Some(input_mode),
            messages,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn input_mode(&self) -> Option<InputMode> {
        self.input_mode
    }

    /// Sets the input mode unless one is already set.
    ///
    /// # Returns
    ///
    /// `true` if the mode was applied, `false` if the session already had one.
    pub fn set_input_mode(&mut self, mode: InputMode) -> bool {
        if self.input_mode.is_some() {
            return false;
        }
        self.input_mode = Some(mode);
        true
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Appends a user message and its pending assistant partner.
    ///
    /// If the session had no messages yet, its title becomes the first
    /// [`TITLE_MAX_CHARS`] characters of the user's content.
    pub fn push_exchange(&mut self, user: Message, pending: Message) {
        if self.messages.is_empty() {
            self.title = user.content().chars().take(TITLE_MAX_CHARS).collect();
        }
        self.messages.push(user);
        self.messages.push(pending);
    }

    pub fn message_mut(&mut self, message_id: &str) -> Option<&mut Message> {
        self.messages.iter_mut().find(|m| m.id() == message_id)
    }

    /// The most recent message written by the user.
    pub fn last_user_message(&self) -> Option<&Message> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role() == MessageRole::User)
    }
}
