//! Chat conversations and their messages

use std::path::Path;

use chrono::Utc;

use portal_types::{ChatRole, Conversation, Error, Message, Result};

use crate::table::{Record, Table};

impl Record for Conversation {
    fn id(&self) -> i64 {
        self.id
    }
}

impl Record for Message {
    fn id(&self) -> i64 {
        self.id
    }
}

/// Persistent store for AI assistant conversations
pub struct ConversationStore {
    conversations: Table<Conversation>,
    messages: Table<Message>,
}

impl ConversationStore {
    pub fn open(store_dir: &Path) -> Result<Self> {
        Ok(Self {
            conversations: Table::open(store_dir, "conversations.json")?,
            messages: Table::open(store_dir, "messages.json")?,
        })
    }

    pub fn create(&mut self, title: &str) -> Result<Conversation> {
        self.conversations.insert_with(|id| Conversation {
            id,
            title: title.to_string(),
            created_at: Utc::now(),
        })
    }

    pub fn get(&self, id: i64) -> Option<&Conversation> {
        self.conversations.get(id)
    }

    /// Conversations, newest first
    pub fn all(&self) -> Vec<&Conversation> {
        let mut conversations: Vec<_> = self.conversations.iter().collect();
        conversations.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        conversations
    }

    /// Messages of a conversation in the order they were written
    pub fn messages(&self, conversation_id: i64) -> Vec<&Message> {
        self.messages
            .iter()
            .filter(|m| m.conversation_id == conversation_id)
            .collect()
    }

    /// Add a message; the conversation must still exist
    pub fn append(&mut self, conversation_id: i64, role: ChatRole, content: &str) -> Result<Message> {
        if self.conversations.get(conversation_id).is_none() {
            return Err(Error::not_found("conversation", conversation_id));
        }
        self.messages.insert_with(|id| Message {
            id,
            conversation_id,
            role,
            content: content.to_string(),
            created_at: Utc::now(),
        })
    }

    /// Delete a conversation together with its messages
    pub fn remove(&mut self, id: i64) -> Result<bool> {
        let removed = self.conversations.remove(id)?.is_some();
        if removed {
            let dropped = self.messages.remove_where(|m| m.conversation_id == id)?;
            tracing::debug!(conversation = id, messages = dropped, "conversation removed");
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_messages_follow_conversation() {
        let dir = tempdir().unwrap();
        let mut store = ConversationStore::open(dir.path()).unwrap();
        let first = store.create("새 대화").unwrap();
        let second = store.create("안전모").unwrap();
        store.append(first.id, ChatRole::User, "질문").unwrap();
        store.append(first.id, ChatRole::Assistant, "답변").unwrap();
        store.append(second.id, ChatRole::User, "다른 질문").unwrap();

        let roles: Vec<_> = store.messages(first.id).iter().map(|m| m.role).collect();
        assert_eq!(roles, vec![ChatRole::User, ChatRole::Assistant]);

        assert!(store.remove(first.id).unwrap());
        assert!(store.messages(first.id).is_empty());
        assert_eq!(store.messages(second.id).len(), 1);
    }

    #[test]
    fn test_append_to_removed_conversation() {
        let dir = tempdir().unwrap();
        let mut store = ConversationStore::open(dir.path()).unwrap();
        let conversation = store.create("새 대화").unwrap();
        store.remove(conversation.id).unwrap();

        let err = store.append(conversation.id, ChatRole::Assistant, "늦은 답변").unwrap_err();
        assert!(matches!(err, Error::NotFound { kind: "conversation", .. }));
        assert!(store.messages(conversation.id).is_empty());

        let reopened = ConversationStore::open(dir.path()).unwrap();
        assert!(reopened.messages(conversation.id).is_empty());
    }
}
