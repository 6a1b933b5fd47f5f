pub mod analysis;
pub mod config;
pub mod error;
pub mod gateway;
pub mod session;
pub mod theme;

// Re-export common error type
pub use error::{AlgoscopeError, Result};
