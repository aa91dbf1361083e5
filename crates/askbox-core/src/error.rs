use thiserror::Error;

/// Top-level error type for the askbox client.
///
/// Each variant maps to one failure category as seen by the session
/// controller. Subsystem crates construct variants directly so the `?`
/// operator works seamlessly across crate boundaries.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AskboxError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Answer request failed with status {status}")]
    RequestFailed { status: u16 },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Speech is not supported on this platform")]
    SpeechUnsupported,

    #[error("Speech recognition is already active")]
    SpeechBusy,

    #[error("Speech recognition error: {0}")]
    Recognition(String),
}

impl From<toml::de::Error> for AskboxError {
    fn from(err: toml::de::Error) -> Self {
        AskboxError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for AskboxError {
    fn from(err: toml::ser::Error) -> Self {
        AskboxError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for AskboxError {
    fn from(err: serde_json::Error) -> Self {
        AskboxError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for askbox operations.
pub type Result<T> = std::result::Result<T, AskboxError>;
