//! Session domain module.
//!
//! # Module Structure
//!
//! - `model`: Chat session (`Session`)
//! - `message`: Messages and their lifecycle (`Message`, `MessageRole`, `MessageStatus`)
//! - `input_mode`: Pseudocode or natural-language input (`InputMode`)

mod input_mode;
mod message;
mod model;

pub use input_mode::InputMode;
pub use message::{ERROR_PREFIX, Message, MessageRole, MessageStatus, PENDING_CONTENT};
pub use model::{BOOTSTRAP_TITLE, NEW_SESSION_TITLE, Session, TITLE_MAX_CHARS};

/// Generates a new unique identifier for sessions and messages.
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
