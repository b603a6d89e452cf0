//! Incremental `text/event-stream` decoding

use serde_json::{json, Value};

/// Payload of one complete `data:` line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SseLine {
    Data(String),
    /// The `[DONE]` sentinel
    Done,
}

/// Splits a byte stream into `data:` payloads.
///
/// Chunks may end anywhere, including inside a line or a multi-byte
/// character; the incomplete tail is kept until the next chunk.
#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: Vec<u8>,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a chunk, returning the payloads of the lines it completed
    pub fn push(&mut self, chunk: &[u8]) -> Vec<SseLine> {
        self.buffer.extend_from_slice(chunk);
        let mut lines = Vec::new();
        while let Some(pos) = self.buffer.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=pos).collect();
            if let Some(parsed) = parse_line(&line) {
                lines.push(parsed);
            }
        }
        lines
    }

    /// Flush a final line that was not newline-terminated
    pub fn finish(&mut self) -> Option<SseLine> {
        let rest = std::mem::take(&mut self.buffer);
        parse_line(&rest)
    }
}

fn parse_line(raw: &[u8]) -> Option<SseLine> {
    let line = String::from_utf8_lossy(raw);
    let line = line.trim_end_matches(['\r', '\n']);
    let payload = line.strip_prefix("data:")?;
    let payload = payload.strip_prefix(' ').unwrap_or(payload);
    if payload.trim() == "[DONE]" {
        return Some(SseLine::Done);
    }
    Some(SseLine::Data(payload.to_string()))
}

/// Events of the portal's chat stream, one JSON object per `data:` line:
/// `{"content": ..}`, `{"done": true}` or `{"error": ..}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatEvent {
    Content(String),
    Done,
    Error(String),
}

impl ChatEvent {
    pub fn to_json(&self) -> String {
        let value = match self {
            ChatEvent::Content(content) => json!({ "content": content }),
            ChatEvent::Done => json!({ "done": true }),
            ChatEvent::Error(error) => json!({ "error": error }),
        };
        value.to_string()
    }

    /// Read an event payload; malformed payloads are `None`
    pub fn parse(payload: &str) -> Option<Self> {
        let value: Value = serde_json::from_str(payload).ok()?;
        if let Some(error) = value.get("error").and_then(Value::as_str) {
            return Some(ChatEvent::Error(error.to_string()));
        }
        if value.get("done").and_then(Value::as_bool) == Some(true) {
            return Some(ChatEvent::Done);
        }
        value
            .get("content")
            .and_then(Value::as_str)
            .map(|c| ChatEvent::Content(c.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lines_split_across_chunks() {
        let mut decoder = SseDecoder::new();
        assert!(decoder.push(b"data: {\"content\":\"hel").is_empty());
        let lines = decoder.push(b"lo\"}\n\ndata: [DONE]\n");
        assert_eq!(
            lines,
            vec![SseLine::Data("{\"content\":\"hello\"}".to_string()), SseLine::Done]
        );
    }

    #[test]
    fn test_multibyte_character_split() {
        let text = "data: 안전\n".as_bytes();
        let mut decoder = SseDecoder::new();
        // split inside the first Hangul syllable
        assert!(decoder.push(&text[..7]).is_empty());
        assert_eq!(decoder.push(&text[7..]), vec![SseLine::Data("안전".to_string())]);
    }

    #[test]
    fn test_ignores_other_fields_and_crlf() {
        let mut decoder = SseDecoder::new();
        let lines = decoder.push(b": keep-alive\r\nevent: message\r\ndata:x\r\n");
        assert_eq!(lines, vec![SseLine::Data("x".to_string())]);
        decoder.push(b"data: tail");
        assert_eq!(decoder.finish(), Some(SseLine::Data("tail".to_string())));
        assert_eq!(decoder.finish(), None);
    }

    #[test]
    fn test_chat_event_framing() {
        for event in [
            ChatEvent::Content("안전모 \"착용\"".to_string()),
            ChatEvent::Done,
            ChatEvent::Error("backend down".to_string()),
        ] {
            assert_eq!(ChatEvent::parse(&event.to_json()), Some(event));
        }
        assert_eq!(ChatEvent::parse("not json"), None);
        assert_eq!(ChatEvent::parse("{\"done\":false}"), None);
    }
}
