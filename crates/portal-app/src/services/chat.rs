//! AI assistant conversations
//!
//! A reply is streamed as `ChatEvent`s: one `Content` per backend delta,
//! then `Done` once the full reply is stored, or a single `Error`.

use std::sync::Arc;

use futures::stream::{self, BoxStream, StreamExt};

use portal_ai::prompts::{conversation_title, DEFAULT_CONVERSATION_TITLE};
use portal_ai::{ChatBackend, ChatEvent, ChatTurn, DeltaStream};
use portal_domain::repository::ConversationRepository;
use portal_types::{ChatRole, Conversation, ConversationDetail, Error, Result};

/// Reply events of one message
pub type EventStream = BoxStream<'static, ChatEvent>;

#[derive(Clone)]
pub struct ChatService {
    repo: Arc<dyn ConversationRepository>,
    backend: Arc<dyn ChatBackend>,
}

impl ChatService {
    pub fn new(repo: Arc<dyn ConversationRepository>, backend: Arc<dyn ChatBackend>) -> Self {
        Self { repo, backend }
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    pub fn list(&self) -> Result<Vec<Conversation>> {
        self.repo.find_all()
    }

    /// Open a conversation; a blank or missing title becomes "새 대화"
    pub fn create(&self, title: Option<&str>) -> Result<Conversation> {
        let title = title
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(DEFAULT_CONVERSATION_TITLE);
        let conversation = self.repo.create(title)?;
        tracing::debug!(id = conversation.id, "conversation created");
        Ok(conversation)
    }

    pub fn get(&self, id: i64) -> Result<ConversationDetail> {
        let conversation = self.repo.find_by_id(id)?.ok_or(Error::not_found("conversation", id))?;
        let messages = self.repo.messages(id)?;
        Ok(ConversationDetail {
            conversation,
            messages,
        })
    }

    pub fn delete(&self, id: i64) -> Result<()> {
        if !self.repo.delete(id)? {
            return Err(Error::not_found("conversation", id));
        }
        tracing::info!(id, "conversation deleted");
        Ok(())
    }

    /// The conversation `id`, or a new one titled after `first_message`
    pub fn ensure_conversation(&self, id: Option<i64>, first_message: &str) -> Result<Conversation> {
        match id {
            Some(id) => self.repo.find_by_id(id)?.ok_or(Error::not_found("conversation", id)),
            None => self.create(Some(&conversation_title(first_message))),
        }
    }

    /// Store `content` as a user message and stream the assistant reply.
    ///
    /// Fails before streaming when the message is blank or the conversation
    /// does not exist; backend failures arrive as an `Error` event.
    pub fn reply_events(&self, conversation_id: i64, content: &str) -> Result<EventStream> {
        let content = content.trim();
        if content.is_empty() {
            return Err(Error::validation("message must not be empty"));
        }
        if self.repo.find_by_id(conversation_id)?.is_none() {
            return Err(Error::not_found("conversation", conversation_id));
        }
        self.repo.append_message(conversation_id, ChatRole::User, content)?;

        let history: Vec<ChatTurn> = self.repo.messages(conversation_id)?.iter().map(ChatTurn::from).collect();
        tracing::debug!(
            conversation = conversation_id,
            backend = self.backend.name(),
            turns = history.len(),
            "streaming reply"
        );
        let state = ReplyState {
            deltas: self.backend.stream_reply(history),
            repo: Arc::clone(&self.repo),
            conversation_id,
            reply: String::new(),
            finished: false,
        };
        Ok(stream::unfold(state, next_event).boxed())
    }

    /// Collect a whole reply; an `Error` event becomes `Error::Chat`
    pub async fn reply(&self, conversation_id: i64, content: &str) -> Result<String> {
        let mut events = self.reply_events(conversation_id, content)?;
        let mut reply = String::new();
        while let Some(event) = events.next().await {
            match event {
                ChatEvent::Content(delta) => reply.push_str(&delta),
                ChatEvent::Done => break,
                ChatEvent::Error(e) => return Err(Error::Chat(e)),
            }
        }
        Ok(reply)
    }
}

struct ReplyState {
    deltas: DeltaStream,
    repo: Arc<dyn ConversationRepository>,
    conversation_id: i64,
    reply: String,
    finished: bool,
}

async fn next_event(mut state: ReplyState) -> Option<(ChatEvent, ReplyState)> {
    if state.finished {
        return None;
    }
    match state.deltas.next().await {
        Some(Ok(delta)) => {
            state.reply.push_str(&delta);
            Some((ChatEvent::Content(delta), state))
        }
        Some(Err(e)) => {
            tracing::warn!(conversation = state.conversation_id, error = %e, "chat backend failed");
            state.finished = true;
            Some((ChatEvent::Error(e.to_string()), state))
        }
        None => {
            state.finished = true;
            let stored = state
                .repo
                .append_message(state.conversation_id, ChatRole::Assistant, &state.reply);
            let event = match stored {
                Ok(_) => ChatEvent::Done,
                Err(e) => {
                    tracing::warn!(conversation = state.conversation_id, error = %e, "reply not stored");
                    ChatEvent::Error(e.to_string())
                }
            };
            Some((event, state))
        }
    }
}
