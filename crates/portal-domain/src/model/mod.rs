//! Domain model types

pub mod content;
pub mod equipment;

pub use content::{AttachmentContent, NoticeContent, RequestContent, RequestStatus, SlideContent};
pub use equipment::{EquipmentItem, ItemStatus, TeamData, DEFAULT_CATEGORY};
