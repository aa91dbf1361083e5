//! Answer client crate - the wire contract with the answer service.
//!
//! Provides the AnswerPort trait for sending questions and clearing remote
//! session state, a MockAnswerClient for testing the session controller,
//! and an HttpAnswerClient that talks to the real backend over HTTP.

pub mod http;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::Notify;

use askbox_core::error::{AskboxError, Result};

pub use http::HttpAnswerClient;

/// Request body for `POST {base}/ask`.
#[derive(Debug, Clone, Serialize)]
pub struct AskRequest {
    pub question: String,
}

/// Response body of `POST {base}/ask`.
///
/// The answer field may be absent or empty; the caller decides what to
/// show in that case.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Answer {
    #[serde(default)]
    pub answer: Option<String>,
}

/// Client for the remote answer service.
///
/// Implementations make exactly one attempt per call and never retry;
/// retry policy, if any, belongs to the caller.
pub trait AnswerPort: Send + Sync {
    /// Send one question and await the answer.
    ///
    /// A non-2xx status maps to `RequestFailed`; network or body-decode
    /// failures map to `Transport`.
    fn ask(&self, question: &str) -> impl std::future::Future<Output = Result<Answer>> + Send;

    /// Ask the backend to clear its session state.
    ///
    /// Best-effort: the caller decides whether a delivery failure matters.
    fn reset_remote(&self) -> impl std::future::Future<Output = Result<()>> + Send;

    /// Page-teardown variant of `reset_remote` with a tighter deadline,
    /// so teardown is never held up by a dead backend.
    fn beacon(&self) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// What the mock client does when asked a question.
#[derive(Debug, Clone)]
enum AskScript {
    /// Reply with this answer body (`None` = answer field absent).
    Answer(Option<String>),
    /// Fail with the given HTTP status.
    Status(u16),
    /// Fail at the transport level.
    TransportFailure,
    /// Hold the reply until the gate is released, then answer.
    Gated { answer: String, gate: Arc<Notify> },
}

/// Mock answer client for testing.
///
/// Returns scripted responses without any network traffic and counts
/// every call so tests can assert exact invocation counts. Clones share
/// the counters.
#[derive(Debug, Clone)]
pub struct MockAnswerClient {
    script: AskScript,
    reset_fails: bool,
    ask_calls: Arc<AtomicUsize>,
    reset_calls: Arc<AtomicUsize>,
    beacon_calls: Arc<AtomicUsize>,
}

impl MockAnswerClient {
    fn with_script(script: AskScript) -> Self {
        Self {
            script,
            reset_fails: false,
            ask_calls: Arc::new(AtomicUsize::new(0)),
            reset_calls: Arc::new(AtomicUsize::new(0)),
            beacon_calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Mock that answers every question with the given text.
    pub fn with_answer(answer: &str) -> Self {
        Self::with_script(AskScript::Answer(Some(answer.to_string())))
    }

    /// Mock whose response body carries no answer field.
    pub fn with_missing_answer() -> Self {
        Self::with_script(AskScript::Answer(None))
    }

    /// Mock that fails every question with the given HTTP status.
    pub fn with_status(status: u16) -> Self {
        Self::with_script(AskScript::Status(status))
    }

    /// Mock that fails every question at the transport level.
    pub fn with_transport_failure() -> Self {
        Self::with_script(AskScript::TransportFailure)
    }

    /// Mock whose answer is held back until the returned gate is notified.
    ///
    /// Lets tests act while a request is logically in flight.
    pub fn gated(answer: &str) -> (Self, Arc<Notify>) {
        let gate = Arc::new(Notify::new());
        let client = Self::with_script(AskScript::Gated {
            answer: answer.to_string(),
            gate: Arc::clone(&gate),
        });
        (client, gate)
    }

    /// Make `reset_remote` and `beacon` fail with a transport error.
    pub fn failing_reset(mut self) -> Self {
        self.reset_fails = true;
        self
    }

    /// Number of `ask` calls made so far.
    pub fn ask_count(&self) -> usize {
        self.ask_calls.load(Ordering::SeqCst)
    }

    /// Number of `reset_remote` calls made so far.
    pub fn reset_count(&self) -> usize {
        self.reset_calls.load(Ordering::SeqCst)
    }

    /// Number of `beacon` calls made so far.
    pub fn beacon_count(&self) -> usize {
        self.beacon_calls.load(Ordering::SeqCst)
    }
}

impl AnswerPort for MockAnswerClient {
    async fn ask(&self, _question: &str) -> Result<Answer> {
        self.ask_calls.fetch_add(1, Ordering::SeqCst);
        match &self.script {
            AskScript::Answer(answer) => Ok(Answer {
                answer: answer.clone(),
            }),
            AskScript::Status(status) => Err(AskboxError::RequestFailed { status: *status }),
            AskScript::TransportFailure => {
                Err(AskboxError::Transport("connection refused".to_string()))
            }
            AskScript::Gated { answer, gate } => {
                gate.notified().await;
                Ok(Answer {
                    answer: Some(answer.clone()),
                })
            }
        }
    }

    async fn reset_remote(&self) -> Result<()> {
        self.reset_calls.fetch_add(1, Ordering::SeqCst);
        if self.reset_fails {
            return Err(AskboxError::Transport("reset unreachable".to_string()));
        }
        Ok(())
    }

    async fn beacon(&self) -> Result<()> {
        self.beacon_calls.fetch_add(1, Ordering::SeqCst);
        if self.reset_fails {
            return Err(AskboxError::Transport("beacon unreachable".to_string()));
        }
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================
