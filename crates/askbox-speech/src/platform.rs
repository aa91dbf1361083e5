//! Platform speech adapter stubs.
//!
//! The widget only talks to recognition and synthesis engines through the
//! ports in this crate. No native engine is wired yet, so these stubs
//! report the capability as unavailable and the controller surfaces the
//! unsupported notice instead of starting anything.

use std::sync::atomic::{AtomicBool, Ordering};

use tracing::debug;

use askbox_core::error::{AskboxError, Result};

use crate::{SpeechInputPort, SpeechOutputPort};

/// Stub recognizer for the platform speech-to-text engine.
pub struct PlatformSpeechInput {
    locale: String,
    active: AtomicBool,
}

impl PlatformSpeechInput {
    /// Create a recognizer for the given locale tag.
    pub fn new(locale: &str) -> Self {
        Self {
            locale: locale.to_string(),
            active: AtomicBool::new(false),
        }
    }

    /// Whether a recognition engine is available.
    ///
    /// Always false until an engine is integrated.
    pub fn is_available(&self) -> bool {
        false
    }
}

impl SpeechInputPort for PlatformSpeechInput {
    fn listen_once(&self) -> impl std::future::Future<Output = Result<String>> + Send {
        let started: Result<()> = if !self.is_available() {
            Err(AskboxError::SpeechUnsupported)
        } else if self.active.swap(true, Ordering::SeqCst) {
            Err(AskboxError::SpeechBusy)
        } else {
            Ok(())
        };
        if started.is_ok() {
            debug!(locale = %self.locale, "Starting single-shot recognition");
        }
        async move {
            started?;
            Err(AskboxError::Recognition(
                "no recognition engine configured".to_string(),
            ))
        }
    }

    fn stop(&self) {
        self.active.store(false, Ordering::SeqCst);
    }
}

/// Stub synthesizer for the platform text-to-speech engine.
pub struct PlatformSpeechOutput {
    locale: String,
}

impl PlatformSpeechOutput {
    /// Create a synthesizer for the given locale tag.
    pub fn new(locale: &str) -> Self {
        Self {
            locale: locale.to_string(),
        }
    }

    /// Whether a synthesis engine is available.
    ///
    /// Always false until an engine is integrated.
    pub fn is_available(&self) -> bool {
        false
    }
}

impl SpeechOutputPort for PlatformSpeechOutput {
    fn speak(&self, text: &str) {
        if !self.is_available() {
            debug!(
                locale = %self.locale,
                chars = text.len(),
                "Speech synthesis unavailable, dropping utterance"
            );
        }
    }

    fn cancel(&self) {}
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_platform_input_reports_unsupported() {
        let input = PlatformSpeechInput::new("en-US");
        assert!(!input.is_available());
        let err = input.listen_once().await.unwrap_err();
        assert!(matches!(err, AskboxError::SpeechUnsupported));
    }

    #[test]
    fn test_platform_input_stop_does_not_panic() {
        let input = PlatformSpeechInput::new("en-US");
        input.stop();
    }

    #[test]
    fn test_platform_output_drops_utterances() {
        let output = PlatformSpeechOutput::new("en-US");
        assert!(!output.is_available());
        output.speak("Hello");
        output.cancel();
    }
}
