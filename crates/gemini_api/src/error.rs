use std::fmt;

use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Error as JsonError;

use crate::retry::is_overloaded_http_error;

#[derive(Debug)]
pub enum GeminiApiError {
    MissingApiKey,
    InvalidHeader(String),
    InvalidRequestPayload(String),
    Request(reqwest::Error),
    Status(StatusCode, String),
    Serde(JsonError),
    StreamFailed {
        code: Option<i64>,
        message: String,
    },
}

impl GeminiApiError {
    /// Returns true when the failure is the transient-overload signal.
    ///
    /// Classification prefers the structured HTTP status and falls back to
    /// overload markers embedded in the error text.
    #[must_use]
    pub fn is_overloaded(&self) -> bool {
        match self {
            Self::Status(status, message) => {
                is_overloaded_http_error(status.as_u16(), message)
            }
            Self::StreamFailed { code, message } => {
                *code == Some(503) || is_overloaded_http_error(0, message)
            }
            _ => false,
        }
    }
}

/// Error envelope returned by the Gemini API.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorPayload {
    #[serde(rename = "error")]
    pub value: Option<ErrorPayloadFields>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorPayloadFields {
    pub code: Option<i64>,
    pub message: Option<String>,
    pub status: Option<String>,
}

impl ErrorPayloadFields {
    pub fn formatted_message(&self) -> Option<String> {
        let message = self.message.as_deref().and_then(non_empty_string)?;
        match self.status.as_deref().and_then(non_empty_string) {
            Some(status) => Some(format!("{status}: {message}")),
            None => Some(message.to_owned()),
        }
    }
}

impl fmt::Display for GeminiApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingApiKey => write!(f, "API key is required"),
            Self::InvalidHeader(value) => write!(f, "invalid header: {value}"),
            Self::InvalidRequestPayload(message) => {
                write!(f, "invalid request payload: {message}")
            }
            Self::Request(error) => write!(f, "request error: {error}"),
            Self::Status(status, message) => {
                write!(f, "HTTP {}: {message}", status.as_u16())
            }
            Self::Serde(error) => write!(f, "serialization error: {error}"),
            Self::StreamFailed { code, message } => match code {
                Some(code) => write!(f, "stream failed ({code}): {message}"),
                None => write!(f, "stream failed: {message}"),
            },
        }
    }
}

impl std::error::Error for GeminiApiError {}

impl From<reqwest::Error> for GeminiApiError {
    fn from(error: reqwest::Error) -> Self {
        Self::Request(error)
    }
}

impl From<JsonError> for GeminiApiError {
    fn from(error: JsonError) -> Self {
        Self::Serde(error)
    }
}

/// Extract a human-readable message from an error response body.
///
/// Prefers the `{"error":{"status","message"}}` envelope, then the raw
/// body, then the status line's canonical reason.
pub fn parse_error_message(status: StatusCode, body: &str) -> String {
    if let Ok(payload) = serde_json::from_str::<ErrorPayload>(body) {
        if let Some(message) = payload.value.and_then(|error| error.formatted_message()) {
            return message;
        }
    }

    if body.trim().is_empty() {
        status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string()
    } else {
        body.to_string()
    }
}

fn non_empty_string(value: &str) -> Option<&str> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}
