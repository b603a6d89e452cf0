//! Persistent store for portal records
//!
//! Every table is one JSON file under the data directory. Ids are allocated
//! sequentially per table and never reused.

mod conversations;
mod notices;
mod settings;
mod table;
mod teams;
mod vehicles;

pub use conversations::ConversationStore;
pub use notices::NoticeStore;
pub use settings::SettingsStore;
pub use table::{Record, Table};
pub use teams::TeamStore;
pub use vehicles::VehicleStore;
