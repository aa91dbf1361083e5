//! Speech adapter crate - ports for recognition and synthesis.
//!
//! Provides the SpeechInputPort and SpeechOutputPort traits the session
//! controller talks through, mock adapters for testing, and platform
//! stubs for the real engines.

pub mod platform;

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use askbox_core::error::{AskboxError, Result};

pub use platform::{PlatformSpeechInput, PlatformSpeechOutput};

/// Single-shot speech recognition.
///
/// Each activation yields at most one transcript or one error, after
/// which the adapter is idle again. An activation started while another
/// is outstanding fails immediately with `SpeechBusy`; an absent platform
/// capability fails with `SpeechUnsupported` before anything starts.
/// Both of those are detected synchronously, when the future is created.
pub trait SpeechInputPort: Send + Sync {
    /// Listen for one utterance and return its transcript.
    fn listen_once(&self) -> impl std::future::Future<Output = Result<String>> + Send;

    /// Abort an active recognition, if any. Idempotent.
    fn stop(&self);
}

/// Fire-and-forget speech synthesis.
///
/// At most one utterance is audible at a time: `speak` cancels whatever
/// is currently playing before starting, so the last call wins. No
/// completion signal is surfaced.
pub trait SpeechOutputPort: Send + Sync {
    /// Cancel the current utterance and speak `text`.
    fn speak(&self, text: &str);

    /// Cancel the current utterance without starting a new one.
    fn cancel(&self);
}

// =============================================================================
// MockSpeechInput
// =============================================================================

/// What the mock recognizer delivers on activation.
#[derive(Debug, Clone)]
enum ListenScript {
    /// Deliver this transcript.
    Transcript(String),
    /// Fail mid-listen with a recognition error.
    RecognitionFailure(String),
    /// Report the capability as absent.
    Unsupported,
    /// Never deliver; stays active until `stop`.
    Hang,
}

/// Mock speech recognizer for testing.
///
/// Delivers a scripted result and tracks activation state so tests can
/// exercise the busy gate and the stop path. Clones share state.
#[derive(Debug, Clone)]
pub struct MockSpeechInput {
    script: ListenScript,
    active: Arc<AtomicBool>,
    listens: Arc<AtomicUsize>,
    stops: Arc<AtomicUsize>,
}

impl MockSpeechInput {
    fn with_script(script: ListenScript) -> Self {
        Self {
            script,
            active: Arc::new(AtomicBool::new(false)),
            listens: Arc::new(AtomicUsize::new(0)),
            stops: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Mock that delivers the given transcript on every activation.
    pub fn with_transcript(transcript: &str) -> Self {
        Self::with_script(ListenScript::Transcript(transcript.to_string()))
    }

    /// Mock that fails mid-listen with a recognition error.
    pub fn with_recognition_failure(reason: &str) -> Self {
        Self::with_script(ListenScript::RecognitionFailure(reason.to_string()))
    }

    /// Mock for a platform without a recognition capability.
    pub fn unsupported() -> Self {
        Self::with_script(ListenScript::Unsupported)
    }

    /// Mock whose activation never delivers, for exercising the busy gate.
    pub fn hanging() -> Self {
        Self::with_script(ListenScript::Hang)
    }

    /// Whether an activation is currently outstanding.
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    /// Number of activations that made it past the gates.
    pub fn listen_count(&self) -> usize {
        self.listens.load(Ordering::SeqCst)
    }

    /// Number of `stop` calls.
    pub fn stop_count(&self) -> usize {
        self.stops.load(Ordering::SeqCst)
    }
}

impl SpeechInputPort for MockSpeechInput {
    fn listen_once(&self) -> impl std::future::Future<Output = Result<String>> + Send {
        // Gate checks happen here, synchronously, not on first poll.
        let started: Result<ListenScript> = match self.script {
            ListenScript::Unsupported => Err(AskboxError::SpeechUnsupported),
            _ => {
                if self.active.swap(true, Ordering::SeqCst) {
                    Err(AskboxError::SpeechBusy)
                } else {
                    self.listens.fetch_add(1, Ordering::SeqCst);
                    Ok(self.script.clone())
                }
            }
        };
        let active = Arc::clone(&self.active);
        async move {
            match started? {
                ListenScript::Transcript(transcript) => {
                    active.store(false, Ordering::SeqCst);
                    Ok(transcript)
                }
                ListenScript::RecognitionFailure(reason) => {
                    active.store(false, Ordering::SeqCst);
                    Err(AskboxError::Recognition(reason))
                }
                ListenScript::Hang => {
                    std::future::pending::<()>().await;
                    unreachable!("pending future resolved")
                }
                ListenScript::Unsupported => unreachable!("rejected before activation"),
            }
        }
    }

    fn stop(&self) {
        self.stops.fetch_add(1, Ordering::SeqCst);
        self.active.store(false, Ordering::SeqCst);
    }
}

// =============================================================================
// MockSpeechOutput
// =============================================================================

/// Mock speech synthesizer for testing.
///
/// Records every spoken text and every cancellation. Clones share the
/// recordings.
#[derive(Debug, Clone, Default)]
pub struct MockSpeechOutput {
    spoken: Arc<Mutex<Vec<String>>>,
    cancels: Arc<AtomicUsize>,
}

impl MockSpeechOutput {
    /// Create a new mock with empty recordings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every text spoken so far, in call order.
    pub fn spoken(&self) -> Vec<String> {
        self.spoken.lock().expect("spoken list mutex poisoned").clone()
    }

    /// Number of explicit `cancel` calls.
    pub fn cancel_count(&self) -> usize {
        self.cancels.load(Ordering::SeqCst)
    }
}

impl SpeechOutputPort for MockSpeechOutput {
    fn speak(&self, text: &str) {
        self.spoken
            .lock()
            .expect("spoken list mutex poisoned")
            .push(text.to_string());
    }

    fn cancel(&self) {
        self.cancels.fetch_add(1, Ordering::SeqCst);
    }
}

// =============================================================================
// Tests
// =============================================================================
