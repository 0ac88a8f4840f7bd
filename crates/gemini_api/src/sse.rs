use crate::events::{GeminiStreamEvent, StreamChunk};

/// Incremental parser for SSE byte streams.
///
/// Bytes are buffered raw and only complete frames are decoded, so a
/// multi-byte UTF-8 sequence split across network chunks survives intact.
/// Frames end at a blank line; both LF and CRLF line endings are accepted.
#[derive(Debug, Default)]
pub struct SseStreamParser {
    buffer: Vec<u8>,
}

impl SseStreamParser {
    /// Feed arbitrary bytes into the parser and drain complete events.
    pub fn feed(&mut self, bytes: &[u8]) -> Vec<GeminiStreamEvent> {
        self.buffer.extend_from_slice(bytes);
        let mut events = Vec::new();

        while let Some((end, delimiter_len)) = next_frame_boundary(&self.buffer) {
            let frame = String::from_utf8_lossy(&self.buffer[..end]).into_owned();
            self.buffer.drain(..end + delimiter_len);

            if let Some(payload) = extract_data_payload(&frame) {
                if payload.is_empty() {
                    continue;
                }

                if let Ok(chunk) = serde_json::from_str::<StreamChunk>(&payload) {
                    events.extend(chunk.into_events());
                }
            }
        }

        events
    }

    /// Parse a complete SSE payload string in one shot.
    pub fn parse_frames(input: &str) -> Vec<GeminiStreamEvent> {
        let mut parser = Self::default();
        parser.feed(input.as_bytes())
    }

    pub fn is_empty_buffer(&self) -> bool {
        self.buffer.iter().all(u8::is_ascii_whitespace)
    }
}

/// Locate the next blank-line frame boundary: `(frame end, delimiter length)`.
fn next_frame_boundary(buffer: &[u8]) -> Option<(usize, usize)> {
    let lf = find_subslice(buffer, b"\n\n");
    let crlf = find_subslice(buffer, b"\r\n\r\n");

    match (lf, crlf) {
        (Some(lf), Some(crlf)) if crlf < lf => Some((crlf, 4)),
        (Some(lf), _) => Some((lf, 2)),
        (None, Some(crlf)) => Some((crlf, 4)),
        (None, None) => None,
    }
}

fn find_subslice(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

fn extract_data_payload(frame: &str) -> Option<String> {
    let data_lines: Vec<&str> = frame
        .lines()
        .filter_map(|line| line.strip_prefix("data:"))
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
        .collect();

    if data_lines.is_empty() {
        None
    } else {
        Some(data_lines.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::SseStreamParser;
    use crate::events::GeminiStreamEvent;

    #[test]
    fn parse_sse_frames_incrementally() {
        let mut parser = SseStreamParser::default();
        let mut events = Vec::new();

        events.extend(
            parser.feed(b"data: {\"candidates\":[{\"content\":{\"parts\":[{\"text\":\"Hello\"}]}}]}\n\n"),
        );
        assert_eq!(
            events,
            vec![GeminiStreamEvent::TextDelta {
                delta: "Hello".to_string(),
            }]
        );
        assert!(parser.is_empty_buffer());
    }

    #[test]
    fn partial_frame_is_buffered_until_complete() {
        let mut parser = SseStreamParser::default();
        let first = parser.feed(b"data: {\"candidates\":[{\"content\":");
        assert!(first.is_empty());
        assert!(!parser.is_empty_buffer());

        let rest = parser.feed(b"{\"parts\":[{\"text\":\"ok\"}]}}]}\n\n");
        assert_eq!(
            rest,
            vec![GeminiStreamEvent::TextDelta {
                delta: "ok".to_string(),
            }]
        );
    }
}
