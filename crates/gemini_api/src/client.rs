use futures_util::StreamExt;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Response};

use crate::config::GeminiApiConfig;
use crate::error::{parse_error_message, GeminiApiError};
use crate::events::{GeminiFinishReason, GeminiStreamEvent};
use crate::headers::build_headers;
use crate::payload::GenerateContentRequest;
use crate::sse::SseStreamParser;
use crate::url::stream_generate_url;

#[derive(Debug)]
pub struct GeminiApiClient {
    http: Client,
    config: GeminiApiConfig,
}

/// Collected result of one fully-drained stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamOutcome {
    /// Concatenation of every text delta in arrival order.
    pub text: String,
    pub finish_reason: Option<GeminiFinishReason>,
}

impl GeminiApiClient {
    pub fn new(config: GeminiApiConfig) -> Result<Self, GeminiApiError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(GeminiApiError::from)?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &GeminiApiConfig {
        &self.config
    }

    pub fn endpoint(&self) -> String {
        stream_generate_url(&self.config.base_url, &self.config.model)
    }

    pub fn build_headers(&self) -> Result<HeaderMap, GeminiApiError> {
        let headers = build_headers(&self.config)?;
        let mut out = HeaderMap::new();
        for (key, value) in headers {
            out.insert(
                HeaderName::from_bytes(key.as_bytes())
                    .map_err(|_| GeminiApiError::InvalidHeader(format!("invalid key: {key}")))?,
                HeaderValue::from_str(&value).map_err(|_| {
                    GeminiApiError::InvalidHeader(format!("invalid value for {key}"))
                })?,
            );
        }
        Ok(out)
    }

    pub fn build_request(
        &self,
        request: &GenerateContentRequest,
    ) -> Result<reqwest::RequestBuilder, GeminiApiError> {
        if request.contents.is_empty() {
            return Err(GeminiApiError::InvalidRequestPayload(
                "'contents' must carry at least one turn".to_owned(),
            ));
        }

        let headers = self.build_headers()?;
        Ok(self.http.post(self.endpoint()).headers(headers).json(request))
    }

    /// Send one request attempt and map non-success statuses to errors.
    ///
    /// The transport performs no retries; callers own the retry policy.
    pub async fn send(
        &self,
        request: &GenerateContentRequest,
    ) -> Result<Response, GeminiApiError> {
        let response = self.build_request(request)?.send().await?;
        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status();
        let body = response.text().await.unwrap_or_else(|_| {
            status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string()
        });
        Err(GeminiApiError::Status(status, parse_error_message(status, &body)))
    }

    /// Stream the response, forwarding each raw text delta to `on_delta`.
    ///
    /// In-stream error frames surface as [`GeminiApiError::StreamFailed`];
    /// deltas delivered before the failure have already been forwarded.
    pub async fn stream_with_handler<F>(
        &self,
        request: &GenerateContentRequest,
        mut on_delta: F,
    ) -> Result<Option<GeminiFinishReason>, GeminiApiError>
    where
        F: FnMut(&str),
    {
        let response = self.send(request).await?;
        log::debug!(
            "gemini stream opened: model={} contents={}",
            self.config.model,
            request.contents.len()
        );

        let mut bytes = response.bytes_stream();
        let mut parser = SseStreamParser::default();
        let mut finish_reason = None;

        while let Some(chunk) = bytes.next().await {
            let chunk = chunk.map_err(GeminiApiError::from)?;
            for event in parser.feed(&chunk) {
                match event {
                    GeminiStreamEvent::TextDelta { delta } => on_delta(&delta),
                    GeminiStreamEvent::Completed {
                        finish_reason: reason,
                    } => finish_reason = reason,
                    GeminiStreamEvent::Error { code, message } => {
                        return Err(GeminiApiError::StreamFailed {
                            code,
                            message: message
                                .unwrap_or_else(|| "Gemini stream error".to_owned()),
                        });
                    }
                }
            }
        }

        log::debug!(
            "gemini stream closed: finish_reason={:?}",
            finish_reason.map(|reason| reason.as_str())
        );
        Ok(finish_reason)
    }

    /// Collecting variant of [`Self::stream_with_handler`].
    pub async fn stream(
        &self,
        request: &GenerateContentRequest,
    ) -> Result<StreamOutcome, GeminiApiError> {
        let mut text = String::new();
        let finish_reason = self
            .stream_with_handler(request, |delta| {
                text.push_str(delta);
            })
            .await?;

        Ok(StreamOutcome {
            text,
            finish_reason,
        })
    }
}
