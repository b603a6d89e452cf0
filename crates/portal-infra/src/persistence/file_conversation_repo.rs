//! File-based implementation of ConversationRepository

use std::path::Path;
use std::sync::Mutex;

use portal_domain::repository::ConversationRepository;
use portal_store::ConversationStore;
use portal_types::{ChatRole, Conversation, Message, Result};

use super::lock;

pub struct FileConversationRepository {
    store: Mutex<ConversationStore>,
}

impl FileConversationRepository {
    pub fn open(store_dir: &Path) -> Result<Self> {
        Ok(Self {
            store: Mutex::new(ConversationStore::open(store_dir)?),
        })
    }
}

impl ConversationRepository for FileConversationRepository {
    fn find_all(&self) -> Result<Vec<Conversation>> {
        let store = lock(&self.store, "conversations")?;
        Ok(store.all().into_iter().cloned().collect())
    }

    fn find_by_id(&self, id: i64) -> Result<Option<Conversation>> {
        Ok(lock(&self.store, "conversations")?.get(id).cloned())
    }

    fn create(&self, title: &str) -> Result<Conversation> {
        lock(&self.store, "conversations")?.create(title)
    }

    fn messages(&self, conversation_id: i64) -> Result<Vec<Message>> {
        let store = lock(&self.store, "conversations")?;
        Ok(store.messages(conversation_id).into_iter().cloned().collect())
    }

    fn append_message(&self, conversation_id: i64, role: ChatRole, content: &str) -> Result<Message> {
        lock(&self.store, "conversations")?.append(conversation_id, role, content)
    }

    fn delete(&self, id: i64) -> Result<bool> {
        lock(&self.store, "conversations")?.remove(id)
    }
}
