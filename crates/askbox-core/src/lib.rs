//! Shared foundation for the askbox chat client.
//!
//! Defines the error type used across all askbox crates, the message
//! types that make up a conversation, and the TOML configuration.

pub mod config;
pub mod error;
pub mod types;

pub use config::AskboxConfig;
pub use error::{AskboxError, Result};
pub use types::{Message, Role};
