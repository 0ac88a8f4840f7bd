//! In-memory chat session: preamble-seeded, append-only turn sequence.

use time::OffsetDateTime;
use turn_provider::Turn;
use uuid::Uuid;

use crate::persona::PersonaPreamble;

/// One live conversation: identity metadata plus the ordered turn sequence.
///
/// The first turns are always the persona preamble; everything after it is
/// real conversation. Turns are immutable once appended and a session is
/// only ever replaced wholesale by an explicit reset.
#[derive(Debug, Clone)]
pub struct ChatSession {
    id: Uuid,
    created_at: OffsetDateTime,
    preamble_len: usize,
    turns: Vec<Turn>,
}

impl ChatSession {
    /// Creates a session containing exactly the preamble pair.
    #[must_use]
    pub fn new(preamble: &PersonaPreamble) -> Self {
        let turns = preamble.turns().to_vec();
        Self {
            id: Uuid::new_v4(),
            created_at: OffsetDateTime::now_utc(),
            preamble_len: turns.len(),
            turns,
        }
    }

    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    #[must_use]
    pub fn created_at(&self) -> OffsetDateTime {
        self.created_at
    }

    /// Full turn sequence including the preamble, in send order.
    #[must_use]
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// Conversation turns with the preamble excluded.
    #[must_use]
    pub fn visible_turns(&self) -> &[Turn] {
        &self.turns[self.preamble_len..]
    }

    pub fn push_user(&mut self, text: impl Into<String>) {
        self.turns.push(Turn::user(text));
    }

    pub fn push_model(&mut self, text: impl Into<String>) {
        self.turns.push(Turn::model(text));
    }
}
