//! Repository trait definitions for data persistence
//!
//! Implementations are shared across request handlers, so every repository
//! is `Send + Sync` and takes `&self`.

use portal_types::{
    ChatRole, Conversation, Error, Message, NewNotice, NewTeam, NewVehicle, Notice, NoticeCategory,
    NoticeUpdate, Settings, Team, Vehicle, VehicleUpdate,
};

/// Repository for notices of every board
pub trait NoticeRepository: Send + Sync {
    /// Notices of one category, newest first
    fn find_by_category(&self, category: NoticeCategory) -> Result<Vec<Notice>, Error>;

    /// All notices, newest first
    fn find_all(&self) -> Result<Vec<Notice>, Error>;

    fn find_by_id(&self, id: i64) -> Result<Option<Notice>, Error>;

    fn create(&self, notice: NewNotice) -> Result<Notice, Error>;

    /// Apply a partial update; `None` when the notice does not exist
    fn update(&self, id: i64, update: NoticeUpdate) -> Result<Option<Notice>, Error>;

    /// Returns whether a notice was deleted
    fn delete(&self, id: i64) -> Result<bool, Error>;
}

/// Repository for yearly team scorecards
pub trait TeamRepository: Send + Sync {
    fn find_by_year(&self, year: i32) -> Result<Vec<Team>, Error>;

    fn find_by_id(&self, id: i64) -> Result<Option<Team>, Error>;

    fn find_by_name(&self, name: &str, year: i32) -> Result<Option<Team>, Error>;

    fn create(&self, team: NewTeam, base_score: i32) -> Result<Team, Error>;

    /// Store `team` over the record with the same id
    fn save(&self, team: Team) -> Result<Option<Team>, Error>;
}

/// Repository for field vehicles
pub trait VehicleRepository: Send + Sync {
    fn find_all(&self) -> Result<Vec<Vehicle>, Error>;

    fn find_by_id(&self, id: i64) -> Result<Option<Vehicle>, Error>;

    fn create(&self, vehicle: NewVehicle) -> Result<Vehicle, Error>;

    fn update(&self, id: i64, update: VehicleUpdate) -> Result<Option<Vehicle>, Error>;

    fn delete(&self, id: i64) -> Result<bool, Error>;
}

/// Repository for AI assistant conversations
pub trait ConversationRepository: Send + Sync {
    /// Conversations, newest first
    fn find_all(&self) -> Result<Vec<Conversation>, Error>;

    fn find_by_id(&self, id: i64) -> Result<Option<Conversation>, Error>;

    fn create(&self, title: &str) -> Result<Conversation, Error>;

    /// Messages of a conversation in write order
    fn messages(&self, conversation_id: i64) -> Result<Vec<Message>, Error>;

    fn append_message(&self, conversation_id: i64, role: ChatRole, content: &str) -> Result<Message, Error>;

    /// Delete a conversation and its messages
    fn delete(&self, id: i64) -> Result<bool, Error>;
}

/// Repository for portal settings
pub trait SettingsRepository: Send + Sync {
    fn load(&self) -> Result<Settings, Error>;

    fn set_locked(&self, locked: bool) -> Result<Settings, Error>;
}
