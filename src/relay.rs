//! Streaming chat relay.
//!
//! `ChatRelay` owns the current session and history, drives one provider
//! turn at a time, converts raw provider deltas into strictly-growing
//! answer prefixes, retries a transient overload once, and downgrades
//! terminal failures into in-band assistant text. No error crosses the
//! `submit` boundary.

use thiserror::Error;
use turn_provider::{ProviderProfile, TurnProvider};
use turn_provider_gemini::GeminiTurnProvider;

use crate::credentials::{self, CredentialError};
use crate::history::TurnHistory;
use crate::persona::PersonaPreamble;
use crate::retry::RetryPolicy;
use crate::session::ChatSession;

use gemini_api::{GeminiApiConfig, GeminiApiError};

/// Final text yielded when the service stays overloaded after the retry.
pub const OVERLOADED_MESSAGE: &str =
    "The service is currently overloaded. Please try again in a moment.";

fn failure_message(detail: &str) -> String {
    format!("An error occurred: {detail}")
}

/// Failure while wiring a relay from ambient configuration.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("credential resolution failed: {0}")]
    Credential(#[from] CredentialError),

    #[error("failed to initialize Gemini transport: {0}")]
    Transport(#[from] GeminiApiError),
}

/// Conversational front-end over one streaming turn provider.
#[derive(Debug)]
pub struct ChatRelay<P: TurnProvider> {
    provider: P,
    preamble: PersonaPreamble,
    session: ChatSession,
    history: TurnHistory,
    retry: RetryPolicy,
}

impl<P: TurnProvider> ChatRelay<P> {
    /// Creates a relay with the default persona and retry policy.
    #[must_use]
    pub fn new(provider: P) -> Self {
        Self::with_options(provider, PersonaPreamble::default(), RetryPolicy::default())
    }

    #[must_use]
    pub fn with_options(provider: P, preamble: PersonaPreamble, retry: RetryPolicy) -> Self {
        let session = ChatSession::new(&preamble);
        Self {
            provider,
            preamble,
            session,
            history: TurnHistory::default(),
            retry,
        }
    }

    #[must_use]
    pub fn provider(&self) -> &P {
        &self.provider
    }

    #[must_use]
    pub fn session(&self) -> &ChatSession {
        &self.session
    }

    #[must_use]
    pub fn history(&self) -> &TurnHistory {
        &self.history
    }

    #[must_use]
    pub fn profile(&self) -> ProviderProfile {
        self.provider.profile()
    }

    /// Replaces the session with a fresh preamble-only one and clears the
    /// history. No prior turn carries over.
    pub fn reset(&mut self) {
        log::debug!("resetting chat session {}", self.session.id());
        self.session = ChatSession::new(&self.preamble);
        self.history.clear();
    }

    /// Sends one user turn and streams the reply.
    ///
    /// `on_prefix` observes the accumulated answer after every non-empty
    /// delta, so each call sees a strict extension of the previous value.
    /// The return value is the final text: the completed answer, or the
    /// in-band message a failure was downgraded to. Whitespace-only input
    /// is ignored and returns an empty string without touching the session.
    ///
    /// Taking `&mut self` keeps turns serialized per relay.
    pub async fn submit(
        &mut self,
        user_text: &str,
        mut on_prefix: impl FnMut(&str) + Send,
    ) -> String {
        let user_text = user_text.trim();
        if user_text.is_empty() {
            return String::new();
        }

        // The user turn stays in the session even if streaming fails.
        self.session.push_user(user_text);

        let mut answer = String::new();
        let mut retries_left = self.retry.max_retries;

        loop {
            let result = {
                let answer = &mut answer;
                let on_prefix = &mut on_prefix;
                let mut forward = |delta: &str| {
                    if delta.is_empty() {
                        return;
                    }
                    answer.push_str(delta);
                    on_prefix(answer.as_str());
                };
                self.provider
                    .stream_turn(self.session.turns(), &mut forward)
                    .await
            };

            match result {
                Ok(()) => {
                    self.session.push_model(answer.clone());
                    self.history.append(user_text, answer.clone());
                    return answer;
                }
                Err(error) => {
                    // Retry only a pre-output overload, and only while the
                    // budget lasts. Partial output makes the failure terminal.
                    if error.is_overloaded() && answer.is_empty() && retries_left > 0 {
                        retries_left -= 1;
                        log::warn!(
                            "provider overloaded, retrying after {:?}: {}",
                            self.retry.delay,
                            error.detail()
                        );
                        tokio::time::sleep(self.retry.delay).await;
                        continue;
                    }

                    let message = if error.is_overloaded() && answer.is_empty() {
                        OVERLOADED_MESSAGE.to_string()
                    } else {
                        failure_message(error.detail())
                    };
                    on_prefix(&message);
                    self.history.append(user_text, message.clone());
                    return message;
                }
            }
        }
    }
}

impl ChatRelay<GeminiTurnProvider> {
    /// Wires a Gemini-backed relay from ambient configuration: resolved
    /// credential, default model, default persona and retry policy.
    pub fn from_environment() -> Result<Self, StartupError> {
        let credential = credentials::resolve()?;
        let config = GeminiApiConfig::new(credential.expose());
        let provider = GeminiTurnProvider::new(config)?;
        Ok(Self::new(provider))
    }
}
