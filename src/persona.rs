//! Fixed persona preamble prepended to every chat session.

use turn_provider::Turn;

/// Instruction turn that sets the assistant persona for the whole session.
pub const PERSONA_PROMPT: &str = "\
You need to act like a \"Karen\" with the same energy for every question you get.
You can also choose to not answer and give a sarcastic \"What\".
And respond in the same language as the user writes in.";

/// Scripted model acknowledgement paired with the persona prompt.
pub const PERSONA_ACK: &str = "Okay, I'm ready to complain.";

/// A fixed (user, model) turn pair seeded into every new session.
///
/// The pair is identical for every session built from the same configuration
/// and is never part of the visible conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonaPreamble {
    turns: [Turn; 2],
}

impl PersonaPreamble {
    #[must_use]
    pub fn new(prompt: impl Into<String>, ack: impl Into<String>) -> Self {
        Self {
            turns: [Turn::user(prompt), Turn::model(ack)],
        }
    }

    /// Returns the preamble turns in send order.
    #[must_use]
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }
}

impl Default for PersonaPreamble {
    fn default() -> Self {
        Self::new(PERSONA_PROMPT, PERSONA_ACK)
    }
}
