//! Session controller: single authority over history and request concurrency.
//!
//! All mutation of session state flows through the controller's operations;
//! the presentation layer only reads snapshots and triggers operations.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use tracing::{debug, warn};
use uuid::Uuid;

use askbox_client::AnswerPort;
use askbox_core::config::ChatConfig;
use askbox_core::error::{AskboxError, Result};
use askbox_core::types::Message;
use askbox_speech::{SpeechInputPort, SpeechOutputPort};

use crate::state::AskPhase;

/// How the controller disposed of one submission attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// A user message was appended and the ask flow ran to resolution.
    Accepted,
    /// Ignored: the trimmed input was empty.
    EmptyInput,
    /// Ignored: a request is already in flight.
    RequestInFlight,
    /// Ignored: the input exceeds the configured length bound.
    TooLong,
    /// A mid-listen recognition failure was reported into the chat.
    RecognitionFailed,
}

/// Mutable session state, guarded by one mutex.
struct SessionState {
    history: Vec<Message>,
    phase: AskPhase,
    draft: String,
    /// Bumped on every reset. Resolutions tagged with an older generation
    /// are discarded so a late answer never leaks into a fresh session.
    generation: u64,
}

impl SessionState {
    fn transition(&mut self, target: AskPhase) {
        if self.phase.can_transition_to(&target) {
            tracing::trace!("Ask phase: {} -> {}", self.phase, target);
            self.phase = target;
        } else {
            tracing::error!("Invalid ask phase transition: {} -> {}", self.phase, target);
        }
    }
}

/// Single authority over the conversation session.
///
/// Generic over the three ports so tests substitute mocks and the binary
/// wires the HTTP client and platform speech engines.
pub struct SessionController<C, I, O> {
    client: Arc<C>,
    speech_in: I,
    speech_out: O,
    chat: ChatConfig,
    session_id: Uuid,
    state: Mutex<SessionState>,
    unloaded: AtomicBool,
}

impl<C, I, O> SessionController<C, I, O>
where
    C: AnswerPort + 'static,
    I: SpeechInputPort,
    O: SpeechOutputPort,
{
    /// Create a controller with a fresh session seeded with the greeting.
    pub fn new(chat: ChatConfig, client: C, speech_in: I, speech_out: O) -> Self {
        let session_id = Uuid::new_v4();
        debug!(session = %session_id, "Session created");
        let greeting = Message::agent(chat.greeting.clone());
        Self {
            client: Arc::new(client),
            speech_in,
            speech_out,
            chat,
            session_id,
            state: Mutex::new(SessionState {
                history: vec![greeting],
                phase: AskPhase::Idle,
                draft: String::new(),
                generation: 0,
            }),
            unloaded: AtomicBool::new(false),
        }
    }

    // -- Read surface for the presentation layer --

    /// Snapshot of the message history in display order.
    pub fn history(&self) -> Vec<Message> {
        self.state
            .lock()
            .expect("session state mutex poisoned")
            .history
            .clone()
    }

    /// Whether an answer request is currently in flight.
    pub fn is_pending(&self) -> bool {
        self.state
            .lock()
            .expect("session state mutex poisoned")
            .phase
            .is_pending()
    }

    /// Current uncommitted input text.
    pub fn draft(&self) -> String {
        self.state
            .lock()
            .expect("session state mutex poisoned")
            .draft
            .clone()
    }

    /// Replace the uncommitted input text.
    pub fn set_draft(&self, text: &str) {
        self.state
            .lock()
            .expect("session state mutex poisoned")
            .draft = text.to_string();
    }

    /// Identifier of this controller's session.
    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    // -- Operations --

    /// Submit typed input.
    ///
    /// Empty (after trimming) and over-length input is ignored, as is any
    /// submission while a request is in flight; ignored submissions never
    /// touch the history.
    pub async fn submit_text(&self, text: &str) -> SubmitOutcome {
        self.submit(text).await
    }

    /// Submit a speech transcript. Same contract as `submit_text`; a
    /// transcript delivered while a request is pending is discarded.
    pub async fn submit_speech(&self, transcript: &str) -> SubmitOutcome {
        self.submit(transcript).await
    }

    /// Start a single-shot listen and feed the transcript into the session.
    ///
    /// An unsupported or already-active recognizer surfaces to the caller
    /// as an error for a notice. A mid-listen recognition failure is
    /// reported as the fallback agent message instead; no request was
    /// started, so the pending flag is not involved.
    pub async fn trigger_listen(&self) -> Result<SubmitOutcome> {
        match self.speech_in.listen_once().await {
            Ok(transcript) => Ok(self.submit(&transcript).await),
            Err(AskboxError::Recognition(reason)) => {
                warn!(session = %self.session_id, %reason, "Speech recognition failed");
                let mut state = self.state.lock().expect("session state mutex poisoned");
                state
                    .history
                    .push(Message::agent(self.chat.fallback_reply.clone()));
                Ok(SubmitOutcome::RecognitionFailed)
            }
            Err(e) => Err(e),
        }
    }

    /// Reset the session: cancel speech in both directions, restore the
    /// history to the greeting, and notify the backend.
    ///
    /// The backend notification is fire-and-forget; the user-visible reset
    /// never waits on it and a delivery failure is swallowed. An in-flight
    /// answer request is not cancelled, but the generation bump makes its
    /// eventual resolution a no-op.
    pub fn reset_session(&self) {
        self.speech_out.cancel();
        self.speech_in.stop();

        {
            let mut state = self.state.lock().expect("session state mutex poisoned");
            state.generation += 1;
            state.history.clear();
            state
                .history
                .push(Message::agent(self.chat.greeting.clone()));
            state.phase = AskPhase::Idle; // forced, regardless of a live request
            state.draft.clear();
        }
        debug!(session = %self.session_id, "Session reset");

        let client = Arc::clone(&self.client);
        tokio::spawn(async move {
            if let Err(e) = client.reset_remote().await {
                debug!(error = %e, "Remote session reset not delivered");
            }
        });
    }

    /// Notify the backend that the page is being discarded.
    ///
    /// Fires at most once per controller, uses the short beacon deadline,
    /// and swallows delivery failures. The history is not touched; the
    /// page is gone regardless.
    pub async fn notify_unload(&self) {
        if self.unloaded.swap(true, Ordering::SeqCst) {
            return;
        }
        if let Err(e) = self.client.beacon().await {
            debug!(error = %e, "Unload beacon not delivered");
        }
    }

    // -- Private helpers --

    /// Validate a submission and run the ask flow if it is accepted.
    async fn submit(&self, text: &str) -> SubmitOutcome {
        let question = text.trim();
        if question.is_empty() {
            return SubmitOutcome::EmptyInput;
        }
        if question.chars().count() > self.chat.max_question_chars {
            debug!(session = %self.session_id, "Question over the length bound, ignoring");
            return SubmitOutcome::TooLong;
        }

        let generation = {
            let mut state = self.state.lock().expect("session state mutex poisoned");
            if state.phase.is_pending() {
                debug!(session = %self.session_id, "Request in flight, ignoring submission");
                return SubmitOutcome::RequestInFlight;
            }
            state.transition(AskPhase::Pending);
            state.history.push(Message::user(question));
            state.draft.clear();
            state.generation
        };

        self.ask(question, generation).await;
        SubmitOutcome::Accepted
    }

    /// Run one answer round-trip and resolve it into the history.
    ///
    /// Returning the phase to Idle is the final step on every live path,
    /// so a failed request never leaves the session blocked. A resolution
    /// whose generation was superseded by a reset is discarded wholesale.
    async fn ask(&self, question: &str, generation: u64) {
        let resolved = self.client.ask(question).await;

        let mut state = self.state.lock().expect("session state mutex poisoned");
        if state.generation != generation {
            debug!(
                session = %self.session_id,
                generation, "Discarding resolution for a superseded session"
            );
            return;
        }

        match resolved {
            Ok(answer) => {
                let text = answer
                    .answer
                    .filter(|a| !a.trim().is_empty())
                    .unwrap_or_else(|| self.chat.missing_answer_reply.clone());
                state.history.push(Message::agent(text.clone()));
                state.transition(AskPhase::Idle);
                drop(state);
                self.speech_out.speak(&text);
            }
            Err(e) => {
                warn!(session = %self.session_id, error = %e, "Answer request failed");
                state
                    .history
                    .push(Message::agent(self.chat.fallback_reply.clone()));
                state.transition(AskPhase::Idle);
            }
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
