//! Transport-only Gemini API client primitives.
//!
//! This crate owns request building, SSE parsing, and error normalization
//! for the `streamGenerateContent` endpoint only. It intentionally contains
//! no credential resolution, no session state, and no retry loop; callers
//! own both the conversation lifecycle and the retry policy, and the
//! overload classification exposed here ([`retry::is_overloaded_http_error`],
//! [`GeminiApiError::is_overloaded`]) is what they branch on.

pub mod client;
pub mod config;
pub mod error;
pub mod events;
pub mod headers;
pub mod payload;
pub mod retry;
pub mod sse;
pub mod url;

pub use reqwest::StatusCode;

pub use client::GeminiApiClient;
pub use client::StreamOutcome;
pub use config::{GeminiApiConfig, DEFAULT_GEMINI_MODEL};
pub use error::GeminiApiError;
pub use events::{GeminiFinishReason, GeminiStreamEvent};
pub use payload::{Content, GenerateContentRequest, Part};
pub use sse::SseStreamParser;
pub use url::{normalize_gemini_base_url, stream_generate_url, DEFAULT_GEMINI_BASE_URL};
