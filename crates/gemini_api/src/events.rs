use serde::{Deserialize, Serialize};

/// Canonical finish state reported by a terminal candidate chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GeminiFinishReason {
    Stop,
    MaxTokens,
    Safety,
    Recitation,
}

impl GeminiFinishReason {
    pub fn parse(value: &str) -> Option<Self> {
        Some(match value {
            "STOP" => Self::Stop,
            "MAX_TOKENS" => Self::MaxTokens,
            "SAFETY" => Self::Safety,
            "RECITATION" => Self::Recitation,
            _ => return None,
        })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Stop => "STOP",
            Self::MaxTokens => "MAX_TOKENS",
            Self::Safety => "SAFETY",
            Self::Recitation => "RECITATION",
        }
    }
}

/// Stream event emitted by the parser after normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeminiStreamEvent {
    /// One raw text increment from the current candidate.
    TextDelta { delta: String },
    /// Terminal marker carried on the last candidate chunk.
    Completed {
        finish_reason: Option<GeminiFinishReason>,
    },
    /// In-stream error frame.
    Error {
        code: Option<i64>,
        message: Option<String>,
    },
}

/// Wire shape of one `streamGenerateContent` SSE chunk.
#[derive(Debug, Deserialize)]
pub(crate) struct StreamChunk {
    #[serde(default)]
    candidates: Vec<ChunkCandidate>,
    error: Option<ChunkError>,
}

#[derive(Debug, Deserialize)]
struct ChunkCandidate {
    content: Option<ChunkContent>,
    #[serde(rename = "finishReason")]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChunkContent {
    #[serde(default)]
    parts: Vec<ChunkPart>,
}

#[derive(Debug, Deserialize)]
struct ChunkPart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChunkError {
    code: Option<i64>,
    message: Option<String>,
    status: Option<String>,
}

impl StreamChunk {
    /// Normalize one wire chunk into zero or more stream events.
    ///
    /// A single chunk may carry both a text increment and the terminal
    /// finish marker; the delta is emitted first.
    pub(crate) fn into_events(self) -> Vec<GeminiStreamEvent> {
        let mut events = Vec::new();

        if let Some(error) = self.error {
            let message = match (error.status, error.message) {
                (Some(status), Some(message)) => Some(format!("{status}: {message}")),
                (status, message) => message.or(status),
            };
            events.push(GeminiStreamEvent::Error {
                code: error.code,
                message,
            });
            return events;
        }

        let Some(candidate) = self.candidates.into_iter().next() else {
            return events;
        };

        let delta: String = candidate
            .content
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|part| part.text)
                    .collect()
            })
            .unwrap_or_default();
        if !delta.is_empty() {
            events.push(GeminiStreamEvent::TextDelta { delta });
        }

        if let Some(reason) = candidate.finish_reason {
            events.push(GeminiStreamEvent::Completed {
                finish_reason: GeminiFinishReason::parse(&reason),
            });
        }

        events
    }
}
