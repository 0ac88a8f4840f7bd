use std::sync::OnceLock;

use regex::Regex;

fn overloaded_marker_regex() -> &'static Regex {
    static CACHED: OnceLock<Regex> = OnceLock::new();
    CACHED.get_or_init(|| {
        Regex::new(r"(?i)\b503\b|overload|unavailable|resource.?exhausted")
            .expect("overload regex must compile")
    })
}

/// Transient-overload classification for HTTP failures.
///
/// True for HTTP 503 or for error text carrying an overload marker (the
/// Gemini envelope embeds `503`/`UNAVAILABLE` in its detail).
pub fn is_overloaded_http_error(status: u16, error_text: &str) -> bool {
    status == 503 || overloaded_marker_regex().is_match(error_text)
}
