//! Chat backends producing streamed reply deltas

use std::collections::VecDeque;

use futures::stream::{self, BoxStream, StreamExt};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use portal_domain::service::FaqBook;
use portal_types::{ChatRole, Error, Message, Result};

use crate::prompts::DEFAULT_SYSTEM_PROMPT;
use crate::sse::{SseDecoder, SseLine};

/// Reply text arriving piece by piece
pub type DeltaStream = BoxStream<'static, Result<String>>;

/// One message of the history sent to a backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub content: String,
}

impl ChatTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }
}

impl From<&Message> for ChatTurn {
    fn from(message: &Message) -> Self {
        Self {
            role: message.role,
            content: message.content.clone(),
        }
    }
}

/// Source of assistant replies
pub trait ChatBackend: Send + Sync {
    /// Short name for logs
    fn name(&self) -> &'static str;

    /// Stream the reply to the last message of `history`
    fn stream_reply(&self, history: Vec<ChatTurn>) -> DeltaStream;
}

/// Connection settings for an OpenAI-compatible API
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub base_url: String,
    pub model: String,
    pub api_key: String,
    pub system_prompt: Option<String>,
}

/// Streams completions from `<base_url>/chat/completions`
pub struct OpenAiBackend {
    http: reqwest::Client,
    config: OpenAiConfig,
}

impl OpenAiBackend {
    pub fn new(config: OpenAiConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    fn request_body(&self, history: &[ChatTurn]) -> Value {
        let system_prompt = self
            .config
            .system_prompt
            .as_deref()
            .unwrap_or(DEFAULT_SYSTEM_PROMPT);
        let mut messages = vec![json!({ "role": "system", "content": system_prompt })];
        messages.extend(
            history
                .iter()
                .filter(|turn| turn.role != ChatRole::System)
                .map(|turn| json!({ "role": turn.role.as_str(), "content": turn.content })),
        );
        json!({
            "model": self.config.model,
            "messages": messages,
            "stream": true,
        })
    }
}

impl ChatBackend for OpenAiBackend {
    fn name(&self) -> &'static str {
        "openai"
    }

    fn stream_reply(&self, history: Vec<ChatTurn>) -> DeltaStream {
        let url = format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'));
        let request = self
            .http
            .post(url)
            .bearer_auth(&self.config.api_key)
            .json(&self.request_body(&history));

        let response = async move {
            let response = request
                .send()
                .await
                .map_err(|e| Error::Chat(format!("request failed: {e}")))?;
            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(Error::Chat(format!("upstream returned {status}: {body}")));
            }
            let bytes = response
                .bytes_stream()
                .map(|chunk| {
                    chunk
                        .map(|b| b.to_vec())
                        .map_err(|e| Error::Chat(format!("stream interrupted: {e}")))
                })
                .boxed();
            Ok(bytes)
        };

        stream::once(response)
            .map(|result| match result {
                Ok(bytes) => completion_deltas(bytes),
                Err(e) => stream::once(async move { Err::<String, Error>(e) }).boxed(),
            })
            .flatten()
            .boxed()
    }
}

/// Text of `choices[0].delta.content` in a completion chunk
fn completion_delta(payload: &str) -> Option<String> {
    let value: Value = serde_json::from_str(payload).ok()?;
    let content = value.pointer("/choices/0/delta/content")?.as_str()?;
    (!content.is_empty()).then(|| content.to_string())
}

struct DeltaState {
    bytes: BoxStream<'static, Result<Vec<u8>>>,
    decoder: SseDecoder,
    pending: VecDeque<String>,
    finished: bool,
}

impl DeltaState {
    fn accept(&mut self, line: SseLine) {
        match line {
            SseLine::Data(payload) => self.pending.extend(completion_delta(&payload)),
            SseLine::Done => self.finished = true,
        }
    }
}

/// Decode an OpenAI-style completion stream into content deltas.
/// Stops at `[DONE]` or the end of input; unparseable lines are skipped.
pub fn completion_deltas(bytes: BoxStream<'static, Result<Vec<u8>>>) -> DeltaStream {
    let state = DeltaState {
        bytes,
        decoder: SseDecoder::new(),
        pending: VecDeque::new(),
        finished: false,
    };
    stream::unfold(state, |mut state| async move {
        loop {
            if let Some(delta) = state.pending.pop_front() {
                return Some((Ok(delta), state));
            }
            if state.finished {
                return None;
            }
            match state.bytes.next().await {
                Some(Ok(chunk)) => {
                    for line in state.decoder.push(&chunk) {
                        if state.finished {
                            break;
                        }
                        state.accept(line);
                    }
                }
                Some(Err(e)) => {
                    state.finished = true;
                    return Some((Err(e), state));
                }
                None => {
                    if let Some(line) = state.decoder.finish() {
                        state.accept(line);
                    }
                    state.finished = true;
                }
            }
        }
    })
    .boxed()
}

/// Offline backend answering from the FAQ table
pub struct FaqBackend {
    book: &'static FaqBook,
}

impl FaqBackend {
    pub fn new() -> Self {
        Self {
            book: FaqBook::builtin(),
        }
    }

    pub fn with_book(book: &'static FaqBook) -> Self {
        Self { book }
    }
}

impl Default for FaqBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatBackend for FaqBackend {
    fn name(&self) -> &'static str {
        "faq"
    }

    fn stream_reply(&self, history: Vec<ChatTurn>) -> DeltaStream {
        let question = history
            .iter()
            .rev()
            .find(|turn| turn.role == ChatRole::User)
            .map(|turn| turn.content.as_str())
            .unwrap_or("");
        let deltas: Vec<Result<String>> = self
            .book
            .find_answer(question)
            .split_inclusive('\n')
            .map(|line| Ok(line.to_string()))
            .collect();
        stream::iter(deltas).boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunks(parts: &[&str]) -> BoxStream<'static, Result<Vec<u8>>> {
        let owned: Vec<Result<Vec<u8>>> = parts.iter().map(|p| Ok(p.as_bytes().to_vec())).collect();
        stream::iter(owned).boxed()
    }

    #[tokio::test]
    async fn test_completion_deltas_across_chunks() {
        let bytes = chunks(&[
            "data: {\"choices\":[{\"delta\":{\"role\":\"assistant\"}}]}\n\n",
            "data: {\"choices\":[{\"delta\":{\"content\":\"안전\"}}]}\n\ndata: {\"choi",
            "ces\":[{\"delta\":{\"content\":\"모\"}}]}\n\n",
            "data: [DONE]\n\ndata: {\"choices\":[{\"delta\":{\"content\":\"ignored\"}}]}\n",
        ]);
        let deltas: Vec<String> = completion_deltas(bytes)
            .map(|d| d.unwrap())
            .collect()
            .await;
        assert_eq!(deltas, vec!["안전", "모"]);
    }

    #[tokio::test]
    async fn test_completion_stream_error_surfaces() {
        let parts: Vec<Result<Vec<u8>>> = vec![
            Ok(b"data: {\"choices\":[{\"delta\":{\"content\":\"a\"}}]}\n".to_vec()),
            Err(Error::Chat("reset".to_string())),
        ];
        let results: Vec<Result<String>> = completion_deltas(stream::iter(parts).boxed()).collect().await;
        assert_eq!(results.len(), 2);
        assert!(results[1].is_err());
    }

    #[tokio::test]
    async fn test_faq_backend_answers_last_user_turn() {
        let backend = FaqBackend::new();
        let history = vec![ChatTurn::user("점심 메뉴"), ChatTurn::user("작업중지권이 뭔가요?")];
        let reply: Vec<String> = backend
            .stream_reply(history)
            .map(|d| d.unwrap())
            .collect()
            .await;
        assert!(reply.len() > 1);
        assert!(reply.concat().starts_with("작업중지권이란"));
    }

    #[test]
    fn test_request_body_prepends_system_prompt() {
        let backend = OpenAiBackend::new(OpenAiConfig {
            base_url: "http://localhost:1/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            api_key: "k".to_string(),
            system_prompt: None,
        });
        let body = backend.request_body(&[ChatTurn::user("안녕")]);
        assert_eq!(body["stream"], true);
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"], "안녕");
    }
}
