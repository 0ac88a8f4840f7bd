//! Gemini-backed implementation of the shared `turn_provider` contract.
//!
//! This adapter translates turn history into `gemini_api` request payloads,
//! forwards raw text deltas, and classifies transport failures into the
//! contract's structured error taxonomy.

use async_trait::async_trait;
use gemini_api::{
    Content, GeminiApiClient, GeminiApiConfig, GeminiApiError, GenerateContentRequest,
};
use turn_provider::{ProviderProfile, Turn, TurnError, TurnProvider, TurnRole};

/// Stable provider identifier reported in profiles.
pub const GEMINI_PROVIDER_ID: &str = "gemini-api";

/// `TurnProvider` adapter backed by `gemini_api` transport primitives.
#[derive(Debug)]
pub struct GeminiTurnProvider {
    client: GeminiApiClient,
}

impl GeminiTurnProvider {
    /// Creates a provider using real Gemini API transport.
    pub fn new(config: GeminiApiConfig) -> Result<Self, GeminiApiError> {
        Ok(Self {
            client: GeminiApiClient::new(config)?,
        })
    }
}

fn request_for(turns: &[Turn]) -> GenerateContentRequest {
    let contents = turns
        .iter()
        .map(|turn| match turn.role {
            TurnRole::User => Content::user(turn.text.clone()),
            TurnRole::Model => Content::model(turn.text.clone()),
        })
        .collect();
    GenerateContentRequest::new(contents)
}

fn map_turn_error(error: GeminiApiError) -> TurnError {
    let detail = error.to_string();
    if error.is_overloaded() {
        TurnError::overloaded(detail)
    } else {
        TurnError::failed(detail)
    }
}

#[async_trait]
impl TurnProvider for GeminiTurnProvider {
    fn profile(&self) -> ProviderProfile {
        ProviderProfile {
            provider_id: GEMINI_PROVIDER_ID.to_string(),
            model_id: self.client.config().model.clone(),
        }
    }

    async fn stream_turn(
        &self,
        turns: &[Turn],
        on_delta: &mut (dyn for<'a> FnMut(&'a str) + Send),
    ) -> Result<(), TurnError> {
        let request = request_for(turns);
        self.client
            .stream_with_handler(&request, on_delta)
            .await
            .map(|_finish_reason| ())
            .map_err(map_turn_error)
    }
}
