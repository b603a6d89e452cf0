//! Client for the portal's streaming chat endpoint

use futures::StreamExt;
use serde_json::json;

use portal_types::{Conversation, Error, Result};

use crate::sse::{ChatEvent, SseDecoder, SseLine};

/// Reply shown when a message could not be delivered
pub const FALLBACK_REPLY: &str = "죄송합니다. 메시지 전송에 실패했습니다.";

/// Collects `content` events of a chat stream into the full reply
#[derive(Debug, Default)]
pub struct ReplyAccumulator {
    text: String,
    done: bool,
    error: Option<String>,
}

impl ReplyAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one stream line; returns the appended delta, if any.
    /// Malformed payloads are ignored.
    pub fn feed(&mut self, line: SseLine) -> Option<String> {
        let SseLine::Data(payload) = line else {
            self.done = true;
            return None;
        };
        match ChatEvent::parse(&payload)? {
            ChatEvent::Content(delta) => {
                self.text.push_str(&delta);
                Some(delta)
            }
            ChatEvent::Done => {
                self.done = true;
                None
            }
            ChatEvent::Error(error) => {
                self.error = Some(error);
                self.done = true;
                None
            }
        }
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Final reply, or an error when the server reported one
    pub fn into_result(self) -> Result<String> {
        match self.error {
            Some(error) => Err(Error::Chat(error)),
            None => Ok(self.text),
        }
    }
}

/// HTTP client of a running portal server
pub struct ChatStreamClient {
    http: reqwest::Client,
    base_url: String,
}

impl ChatStreamClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub async fn create_conversation(&self, title: &str) -> Result<Conversation> {
        let response = self
            .http
            .post(format!("{}/api/conversations", self.base_url))
            .json(&json!({ "title": title }))
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| Error::Chat(e.to_string()))?;
        response.json().await.map_err(|e| Error::Chat(e.to_string()))
    }

    pub async fn conversations(&self) -> Result<Vec<Conversation>> {
        let response = self
            .http
            .get(format!("{}/api/conversations", self.base_url))
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| Error::Chat(e.to_string()))?;
        response.json().await.map_err(|e| Error::Chat(e.to_string()))
    }

    /// Send `content` and stream the reply, calling `on_delta` for each piece.
    /// Any failure yields `FALLBACK_REPLY` instead of an error.
    pub async fn send_message<F>(&self, conversation_id: i64, content: &str, on_delta: F) -> String
    where
        F: FnMut(&str),
    {
        match self.try_send_message(conversation_id, content, on_delta).await {
            Ok(reply) => reply,
            Err(e) => {
                tracing::warn!(conversation = conversation_id, error = %e, "chat message failed");
                FALLBACK_REPLY.to_string()
            }
        }
    }

    async fn try_send_message<F>(&self, conversation_id: i64, content: &str, mut on_delta: F) -> Result<String>
    where
        F: FnMut(&str),
    {
        let response = self
            .http
            .post(format!("{}/api/conversations/{}/messages", self.base_url, conversation_id))
            .json(&json!({ "content": content }))
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| Error::Chat(e.to_string()))?;

        let mut decoder = SseDecoder::new();
        let mut reply = ReplyAccumulator::new();
        let mut bytes = response.bytes_stream().boxed();
        while let Some(chunk) = bytes.next().await {
            let chunk = chunk.map_err(|e| Error::Chat(e.to_string()))?;
            for line in decoder.push(&chunk) {
                if let Some(delta) = reply.feed(line) {
                    on_delta(&delta);
                }
            }
            if reply.is_done() {
                break;
            }
        }
        if let Some(line) = decoder.finish() {
            if let Some(delta) = reply.feed(line) {
                on_delta(&delta);
            }
        }
        reply.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data(payload: &str) -> SseLine {
        SseLine::Data(payload.to_string())
    }

    #[test]
    fn test_accumulates_content_and_skips_garbage() {
        let mut reply = ReplyAccumulator::new();
        assert_eq!(reply.feed(data(r#"{"content":"안전모는 "}"#)), Some("안전모는 ".to_string()));
        assert_eq!(reply.feed(data("{oops")), None);
        reply.feed(data(r#"{"content":"턱끈까지"}"#));
        assert!(!reply.is_done());
        reply.feed(data(r#"{"done":true}"#));
        assert!(reply.is_done());
        assert_eq!(reply.into_result().unwrap(), "안전모는 턱끈까지");
    }

    #[test]
    fn test_error_event_fails_reply() {
        let mut reply = ReplyAccumulator::new();
        reply.feed(data(r#"{"error":"upstream returned 401"}"#));
        assert!(reply.is_done());
        assert!(matches!(reply.into_result(), Err(Error::Chat(_))));
    }

    #[tokio::test]
    async fn test_unreachable_server_falls_back() {
        let client = ChatStreamClient::new("http://127.0.0.1:9/");
        let reply = client.send_message(1, "질문", |_| {}).await;
        assert_eq!(reply, FALLBACK_REPLY);
    }
}
