//! Minimal provider-agnostic contract for streaming a single chat turn.
//!
//! This crate intentionally defines only the shared turn/role types, the
//! error taxonomy callers branch on, and the streaming trait seam. It
//! excludes provider transport details, protocol payloads, and session
//! lifecycle concerns.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Role attached to one conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnRole {
    User,
    Model,
}

impl TurnRole {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Model => "model",
        }
    }
}

/// One immutable (role, text) conversation turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: TurnRole,
    pub text: String,
}

impl Turn {
    /// Constructs a user-authored turn.
    #[must_use]
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: TurnRole::User,
            text: text.into(),
        }
    }

    /// Constructs a model-authored turn.
    #[must_use]
    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: TurnRole::Model,
            text: text.into(),
        }
    }
}

/// Immutable metadata describing a turn provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderProfile {
    pub provider_id: String,
    pub model_id: String,
}

/// Terminal failure reported by a provider for one turn.
///
/// `Overloaded` is the structured transient-overload signal: the provider
/// classifies it once at the transport boundary so callers never have to
/// pattern-match error prose to decide retry eligibility.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnError {
    /// The remote service is temporarily unable to serve the request.
    Overloaded { detail: String },
    /// Any other failure; never retried.
    Failed { detail: String },
}

impl TurnError {
    /// Constructs a transient-overload error.
    #[must_use]
    pub fn overloaded(detail: impl Into<String>) -> Self {
        Self::Overloaded {
            detail: detail.into(),
        }
    }

    /// Constructs a non-retryable failure.
    #[must_use]
    pub fn failed(detail: impl Into<String>) -> Self {
        Self::Failed {
            detail: detail.into(),
        }
    }

    /// Returns the underlying failure detail.
    #[must_use]
    pub fn detail(&self) -> &str {
        match self {
            Self::Overloaded { detail } | Self::Failed { detail } => detail,
        }
    }

    /// Returns true when the failure is the transient-overload signal.
    #[must_use]
    pub fn is_overloaded(&self) -> bool {
        matches!(self, Self::Overloaded { .. })
    }
}

impl fmt::Display for TurnError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Overloaded { detail } => write!(f, "service overloaded: {detail}"),
            Self::Failed { detail } => f.write_str(detail),
        }
    }
}

impl std::error::Error for TurnError {}

/// Provider interface for streaming one turn against an ordered history.
///
/// `turns` carries the full session context including the new user turn as
/// its last element. Implementations deliver raw text increments through
/// `on_delta` in arrival order and return once the remote stream ends. A
/// single call is one forward pass; it is not restartable.
#[async_trait]
pub trait TurnProvider: Send + Sync {
    /// Returns provider/model identity metadata.
    fn profile(&self) -> ProviderProfile;

    /// Streams the model reply for the given turn history.
    async fn stream_turn(
        &self,
        turns: &[Turn],
        on_delta: &mut (dyn for<'a> FnMut(&'a str) + Send),
    ) -> Result<(), TurnError>;
}
