//! Session controller crate - the conversational core of the widget.
//!
//! Owns the message history and the single-request-in-flight discipline,
//! mediates between text input, speech input, the answer client, and
//! speech output, and implements the close/unload reset lifecycle.

pub mod controller;
pub mod state;

pub use controller::{SessionController, SubmitOutcome};
pub use state::AskPhase;
