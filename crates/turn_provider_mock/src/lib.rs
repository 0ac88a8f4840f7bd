//! Deterministic scripted implementation of the shared `turn_provider`
//! contract.
//!
//! This crate contains no transport logic and is intended for relay-level
//! tests: each call to `stream_turn` consumes the next scripted outcome and
//! records the turn history it received.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use turn_provider::{ProviderProfile, Turn, TurnError, TurnProvider};

/// Stable provider identifier reported in profiles.
pub const MOCK_PROVIDER_ID: &str = "mock";

/// What one scripted `stream_turn` call should do.
#[derive(Debug, Clone)]
pub enum ScriptedOutcome {
    /// Deliver each delta in order, then succeed.
    Stream(Vec<String>),
    /// Fail immediately without delivering any delta.
    Fail(TurnError),
    /// Deliver each delta in order, then fail.
    FailAfter(Vec<String>, TurnError),
}

impl ScriptedOutcome {
    /// Scripted success delivering the given deltas.
    #[must_use]
    pub fn stream(deltas: &[&str]) -> Self {
        Self::Stream(deltas.iter().map(|delta| delta.to_string()).collect())
    }

    /// Scripted failure before any delta.
    #[must_use]
    pub fn fail(error: TurnError) -> Self {
        Self::Fail(error)
    }

    /// Scripted partial stream followed by a failure.
    #[must_use]
    pub fn fail_after(deltas: &[&str], error: TurnError) -> Self {
        Self::FailAfter(
            deltas.iter().map(|delta| delta.to_string()).collect(),
            error,
        )
    }
}

/// Scripted provider used by relay tests and local runs.
#[derive(Debug, Default)]
pub struct ScriptedTurnProvider {
    outcomes: Mutex<VecDeque<ScriptedOutcome>>,
    received: Mutex<Vec<Vec<Turn>>>,
}

impl ScriptedTurnProvider {
    /// Creates a provider that plays back the given outcomes in order.
    #[must_use]
    pub fn new(outcomes: Vec<ScriptedOutcome>) -> Self {
        Self {
            outcomes: Mutex::new(outcomes.into()),
            received: Mutex::new(Vec::new()),
        }
    }

    /// Appends one more scripted outcome to the playback queue.
    pub fn push_outcome(&self, outcome: ScriptedOutcome) {
        lock_unpoisoned(&self.outcomes).push_back(outcome);
    }

    /// Returns the turn histories received so far, one per call.
    #[must_use]
    pub fn received_turns(&self) -> Vec<Vec<Turn>> {
        lock_unpoisoned(&self.received).clone()
    }

    /// Returns how many `stream_turn` calls have been made.
    #[must_use]
    pub fn call_count(&self) -> usize {
        lock_unpoisoned(&self.received).len()
    }
}

#[async_trait]
impl TurnProvider for ScriptedTurnProvider {
    fn profile(&self) -> ProviderProfile {
        ProviderProfile {
            provider_id: MOCK_PROVIDER_ID.to_string(),
            model_id: "mock".to_string(),
        }
    }

    async fn stream_turn(
        &self,
        turns: &[Turn],
        on_delta: &mut (dyn for<'a> FnMut(&'a str) + Send),
    ) -> Result<(), TurnError> {
        lock_unpoisoned(&self.received).push(turns.to_vec());

        let outcome = lock_unpoisoned(&self.outcomes).pop_front();
        match outcome {
            Some(ScriptedOutcome::Stream(deltas)) => {
                for delta in &deltas {
                    on_delta(delta);
                }
                Ok(())
            }
            Some(ScriptedOutcome::Fail(error)) => Err(error),
            Some(ScriptedOutcome::FailAfter(deltas, error)) => {
                for delta in &deltas {
                    on_delta(delta);
                }
                Err(error)
            }
            None => Err(TurnError::failed("scripted outcomes exhausted")),
        }
    }
}

fn lock_unpoisoned<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}
