//! Streaming chat for the safety assistant
//!
//! `text/event-stream` decoding, the chat event framing shared by server and
//! client, and the backends that produce reply deltas.

pub mod backend;
pub mod client;
pub mod prompts;
pub mod sse;

pub use backend::{ChatBackend, ChatTurn, DeltaStream, FaqBackend, OpenAiBackend, OpenAiConfig};
pub use client::{ChatStreamClient, ReplyAccumulator, FALLBACK_REPLY};
pub use sse::{ChatEvent, SseDecoder, SseLine};
