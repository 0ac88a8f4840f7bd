//! Append-only record of completed conversation rounds.

use time::OffsetDateTime;

/// One completed round: what the user sent and the final assistant text.
///
/// The assistant text is exactly the last value the relay yielded for the
/// round, including in-band error messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnRecord {
    pub user_text: String,
    pub assistant_text: String,
    pub recorded_at: OffsetDateTime,
}

/// In-memory, insertion-ordered history of completed rounds.
///
/// Purely additive: records are never edited or removed except by `clear`.
#[derive(Debug, Clone, Default)]
pub struct TurnHistory {
    records: Vec<TurnRecord>,
}

impl TurnHistory {
    pub fn append(&mut self, user_text: impl Into<String>, assistant_text: impl Into<String>) {
        self.records.push(TurnRecord {
            user_text: user_text.into(),
            assistant_text: assistant_text.into(),
            recorded_at: OffsetDateTime::now_utc(),
        });
    }

    /// All records in insertion order.
    #[must_use]
    pub fn all(&self) -> &[TurnRecord] {
        &self.records
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Removes every record unconditionally.
    pub fn clear(&mut self) {
        self.records.clear();
    }
}
