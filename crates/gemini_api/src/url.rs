/// Default base URL for Gemini transport requests.
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Normalize a base URL for Gemini endpoints.
///
/// Normalization rules:
/// 1) empty input falls back to the default base URL
/// 2) trailing slashes are stripped
/// 3) a trailing `/models` segment is stripped; the endpoint builder adds it
pub fn normalize_gemini_base_url(input: &str) -> String {
    let base = if input.trim().is_empty() {
        DEFAULT_GEMINI_BASE_URL
    } else {
        input.trim()
    };

    let trimmed = base.trim_end_matches('/');
    if let Some(stripped) = trimmed.strip_suffix("/models") {
        return stripped.to_string();
    }
    trimmed.to_string()
}

/// Build the SSE streaming endpoint for a model.
///
/// Produces `{base}/models/{model}:streamGenerateContent?alt=sse`, the
/// incremental-delivery form of the generate endpoint.
pub fn stream_generate_url(base_url: &str, model: &str) -> String {
    let base = normalize_gemini_base_url(base_url);
    let model = model.trim();
    format!("{base}/models/{model}:streamGenerateContent?alt=sse")
}
