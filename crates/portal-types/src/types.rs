//! Records shared by every layer of the portal

use std::collections::BTreeMap;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::Error;

/// Deserialize null as default value
fn null_to_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::deserialize(deserializer).map(|opt| opt.unwrap_or_default())
}

/// Board a notice belongs to. Determines how `Notice::content` is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum NoticeCategory {
    #[value(name = "notice")]
    Notice,
    #[value(name = "rule")]
    Rule,
    #[value(name = "edu")]
    Edu,
    #[value(name = "equipment")]
    Equipment,
    #[value(name = "equip_status")]
    EquipStatus,
    #[value(name = "equip_request")]
    EquipRequest,
    #[value(name = "digital_board")]
    DigitalBoard,
}

impl NoticeCategory {
    pub const ALL: [NoticeCategory; 7] = [
        NoticeCategory::Notice,
        NoticeCategory::Rule,
        NoticeCategory::Edu,
        NoticeCategory::Equipment,
        NoticeCategory::EquipStatus,
        NoticeCategory::EquipRequest,
        NoticeCategory::DigitalBoard,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NoticeCategory::Notice => "notice",
            NoticeCategory::Rule => "rule",
            NoticeCategory::Edu => "edu",
            NoticeCategory::Equipment => "equipment",
            NoticeCategory::EquipStatus => "equip_status",
            NoticeCategory::EquipRequest => "equip_request",
            NoticeCategory::DigitalBoard => "digital_board",
        }
    }

    /// Board title shown in the portal menu
    pub fn label(&self) -> &'static str {
        match self {
            NoticeCategory::Notice => "안전공지",
            NoticeCategory::Rule => "안전규정",
            NoticeCategory::Edu => "안전교육",
            NoticeCategory::Equipment => "안전보호구 관리",
            NoticeCategory::EquipStatus => "팀별 보호구 현황",
            NoticeCategory::EquipRequest => "용품 신청",
            NoticeCategory::DigitalBoard => "전자게시판",
        }
    }

    /// Whether the portal lock freezes edits on this board.
    /// Equipment requests stay open to field staff while locked.
    pub fn is_lockable(&self) -> bool {
        !matches!(self, NoticeCategory::EquipRequest)
    }
}

impl std::fmt::Display for NoticeCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NoticeCategory {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NoticeCategory::ALL
            .into_iter()
            .find(|c| c.as_str() == s.trim())
            .ok_or_else(|| Error::validation(format!("unknown notice category: {s}")))
    }
}

/// Generic categorized content record used by every board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notice {
    pub id: i64,
    pub title: String,
    /// Free text, or a JSON document whose shape depends on `category`
    pub content: String,
    pub category: NoticeCategory,
    #[serde(default)]
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Payload for creating a notice
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewNotice {
    pub title: String,
    #[serde(default)]
    pub content: String,
    pub category: NoticeCategory,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl NewNotice {
    pub fn new(category: NoticeCategory, title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            category,
            image_url: None,
        }
    }

    pub fn with_image(mut self, image_url: impl Into<String>) -> Self {
        self.image_url = Some(image_url.into());
        self
    }
}

/// Partial update of a notice; absent fields are left untouched
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoticeUpdate {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub category: Option<NoticeCategory>,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl NoticeUpdate {
    pub fn content(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Default::default()
        }
    }
}

/// Operations team safety scorecard for one year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub id: i64,
    pub name: String,
    pub year: i32,
    #[serde(default, deserialize_with = "null_to_default")]
    pub vehicle_count: u32,
    #[serde(default, deserialize_with = "null_to_default")]
    pub total_score: i32,
    #[serde(default, deserialize_with = "null_to_default")]
    pub work_accident: u32,
    #[serde(default, deserialize_with = "null_to_default")]
    pub fine_speed: u32,
    #[serde(default, deserialize_with = "null_to_default")]
    pub fine_signal: u32,
    #[serde(default, deserialize_with = "null_to_default")]
    pub fine_lane: u32,
    #[serde(default, deserialize_with = "null_to_default")]
    pub inspection_miss: u32,
    #[serde(default, deserialize_with = "null_to_default")]
    pub suggestion: u32,
    #[serde(default, deserialize_with = "null_to_default")]
    pub activity: u32,
    /// Vehicle accident counts keyed by vehicle (plate or label)
    #[serde(default, deserialize_with = "null_to_default")]
    pub vehicle_accidents: BTreeMap<String, u32>,
}

/// Payload for registering a team in a given year
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTeam {
    pub name: String,
    pub year: i32,
    #[serde(default)]
    pub vehicle_count: u32,
}

/// Partial update of a team scorecard
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamUpdate {
    #[serde(default)]
    pub vehicle_count: Option<u32>,
    /// Explicit total; when absent the total is recomputed from the counters
    #[serde(default)]
    pub total_score: Option<i32>,
    #[serde(default)]
    pub work_accident: Option<u32>,
    #[serde(default)]
    pub fine_speed: Option<u32>,
    #[serde(default)]
    pub fine_signal: Option<u32>,
    #[serde(default)]
    pub fine_lane: Option<u32>,
    #[serde(default)]
    pub inspection_miss: Option<u32>,
    #[serde(default)]
    pub suggestion: Option<u32>,
    #[serde(default)]
    pub activity: Option<u32>,
    #[serde(default)]
    pub vehicle_accidents: Option<BTreeMap<String, u32>>,
}

impl TeamUpdate {
    /// Apply the present fields onto `team`
    pub fn apply_to(&self, team: &mut Team) {
        if let Some(v) = self.vehicle_count {
            team.vehicle_count = v;
        }
        if let Some(v) = self.work_accident {
            team.work_accident = v;
        }
        if let Some(v) = self.fine_speed {
            team.fine_speed = v;
        }
        if let Some(v) = self.fine_signal {
            team.fine_signal = v;
        }
        if let Some(v) = self.fine_lane {
            team.fine_lane = v;
        }
        if let Some(v) = self.inspection_miss {
            team.inspection_miss = v;
        }
        if let Some(v) = self.suggestion {
            team.suggestion = v;
        }
        if let Some(v) = self.activity {
            team.activity = v;
        }
        if let Some(ref v) = self.vehicle_accidents {
            team.vehicle_accidents = v.clone();
        }
        if let Some(v) = self.total_score {
            team.total_score = v;
        }
    }
}

/// Field vehicle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    pub id: i64,
    pub plate_number: String,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub team: Option<String>,
    #[serde(default)]
    pub driver: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewVehicle {
    pub plate_number: String,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub team: Option<String>,
    #[serde(default)]
    pub driver: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleUpdate {
    #[serde(default)]
    pub plate_number: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub team: Option<String>,
    #[serde(default)]
    pub driver: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl VehicleUpdate {
    pub fn apply_to(&self, vehicle: &mut Vehicle) {
        if let Some(ref v) = self.plate_number {
            vehicle.plate_number = v.clone();
        }
        if self.model.is_some() {
            vehicle.model = self.model.clone();
        }
        if self.team.is_some() {
            vehicle.team = self.team.clone();
        }
        if self.driver.is_some() {
            vehicle.driver = self.driver.clone();
        }
        if self.notes.is_some() {
            vehicle.notes = self.notes.clone();
        }
    }
}

/// AI assistant conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    pub id: i64,
    pub title: String,
    pub created_at: DateTime<Utc>,
}

/// Speaker of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

impl ChatRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatRole::System => "system",
            ChatRole::User => "user",
            ChatRole::Assistant => "assistant",
        }
    }
}

/// Persisted chat message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: i64,
    pub conversation_id: i64,
    pub role: ChatRole,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Conversation together with its ordered messages
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationDetail {
    #[serde(flatten)]
    pub conversation: Conversation,
    pub messages: Vec<Message>,
}

/// Portal-wide settings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default)]
    pub is_locked: bool,
}
