//! Equipment inventory records embedded in `equip_status` notices

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Category used when a spreadsheet row or stored item has none
pub const DEFAULT_CATEGORY: &str = "기타";

/// Condition of an equipment item
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ItemStatus {
    /// 등록: registered, not yet inspected
    #[default]
    Registered,
    /// 양호: inspected and serviceable
    Good,
    /// 불량: defective
    Bad,
}

impl ItemStatus {
    /// Parse a Korean or English status label. Unknown labels mean registered.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "양호" | "good" | "ok" | "normal" => ItemStatus::Good,
            "불량" | "bad" | "defective" | "broken" => ItemStatus::Bad,
            _ => ItemStatus::Registered,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ItemStatus::Registered => "등록",
            ItemStatus::Good => "양호",
            ItemStatus::Bad => "불량",
        }
    }
}

impl std::fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for ItemStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for ItemStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.map(|s| ItemStatus::parse(&s)).unwrap_or_default())
    }
}

/// Accept numbers or numeric strings; negatives clamp to zero
fn lenient_quantity<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    let number = match value {
        Some(serde_json::Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(serde_json::Value::String(s)) => s.trim().replace(',', "").parse().unwrap_or(0.0),
        _ => 0.0,
    };
    Ok(number.max(0.0).min(u32::MAX as f64) as u32)
}

fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}

/// Accept RFC 3339 timestamps or plain dates; anything else is dropped
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer).unwrap_or(None);
    Ok(raw.and_then(|s| parse_timestamp(&s)))
}

fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(s.trim()) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

/// One line of a team's equipment list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquipmentItem {
    pub name: String,
    #[serde(default, deserialize_with = "lenient_quantity")]
    pub quantity: u32,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default)]
    pub status: ItemStatus,
}

impl EquipmentItem {
    pub fn new(name: impl Into<String>, quantity: u32, category: impl Into<String>, status: ItemStatus) -> Self {
        let category = category.into();
        Self {
            name: name.into().trim().to_string(),
            quantity,
            category: if category.trim().is_empty() {
                default_category()
            } else {
                category.trim().to_string()
            },
            status,
        }
    }
}

/// Per-team inventory payload stored as the content of an `equip_status` notice
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamData {
    pub team: String,
    /// Required, so attachment reports naming a team do not parse as records
    pub items: Vec<EquipmentItem>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub last_updated: Option<DateTime<Utc>>,
}

impl TeamData {
    pub fn new(team: impl Into<String>, items: Vec<EquipmentItem>, last_updated: DateTime<Utc>) -> Self {
        let mut data = Self {
            team: team.into().trim().to_string(),
            items,
            last_updated: Some(last_updated),
        };
        data.dedup_items();
        data
    }

    /// Parse notice content. Malformed JSON, or a record without a team
    /// name, yields `None`.
    pub fn parse(content: &str) -> Option<Self> {
        let mut data: TeamData = serde_json::from_str(content).ok()?;
        data.team = data.team.trim().to_string();
        if data.team.is_empty() {
            return None;
        }
        data.items.retain(|item| !item.name.trim().is_empty());
        data.dedup_items();
        Some(data)
    }

    /// Serialize back into notice content
    pub fn to_content(&self) -> String {
        // TeamData has no map keys or non-finite floats, so this cannot fail
        serde_json::to_string(self).unwrap_or_default()
    }

    pub fn find_item(&self, name: &str) -> Option<&EquipmentItem> {
        let name = name.trim();
        self.items.iter().find(|item| item.name == name)
    }

    pub fn contains_item(&self, name: &str) -> bool {
        self.find_item(name).is_some()
    }

    /// Append `item` unless an item with the same name exists.
    /// Returns whether it was added.
    pub fn push_unique(&mut self, item: EquipmentItem) -> bool {
        if self.contains_item(&item.name) {
            return false;
        }
        self.items.push(item);
        true
    }

    /// Insert or replace by name, keeping the position of an existing item
    pub fn upsert_item(&mut self, item: EquipmentItem) {
        match self.items.iter_mut().find(|existing| existing.name == item.name) {
            Some(existing) => *existing = item,
            None => self.items.push(item),
        }
    }

    /// Enforce unique names; a later duplicate replaces the earlier one in place
    fn dedup_items(&mut self) {
        let items = std::mem::take(&mut self.items);
        for item in items {
            self.upsert_item(item);
        }
    }

    pub fn total_quantity(&self) -> u64 {
        self.items.iter().map(|i| i.quantity as u64).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parse() {
        assert_eq!(ItemStatus::parse("양호"), ItemStatus::Good);
        assert_eq!(ItemStatus::parse(" BAD "), ItemStatus::Bad);
        assert_eq!(ItemStatus::parse("등록"), ItemStatus::Registered);
        assert_eq!(ItemStatus::parse("점검중"), ItemStatus::Registered);
    }

    #[test]
    fn test_parse_team_data() {
        let content = r#"{"team":"포항운용팀","items":[
            {"name":"안전모","quantity":12,"category":"머리보호","status":"양호"},
            {"name":"절연장갑","quantity":"4","category":"전기","status":"불량"}
        ],"lastUpdated":"2025-03-02T09:00:00Z"}"#;
        let data = TeamData::parse(content).unwrap();
        assert_eq!(data.team, "포항운용팀");
        assert_eq!(data.items.len(), 2);
        assert_eq!(data.items[1].quantity, 4);
        assert_eq!(data.items[1].status, ItemStatus::Bad);
        assert!(data.last_updated.is_some());
    }

    #[test]
    fn test_malformed_content_is_absent() {
        assert!(TeamData::parse("안전모 10개").is_none());
        assert!(TeamData::parse(r#"{"text":"보고서"}"#).is_none());
        assert!(TeamData::parse(r#"{"team":"  ","items":[]}"#).is_none());
        assert!(TeamData::parse(r#"{"team":"포항운용팀","text":"보고","excelUrl":"/uploads/a.xlsx"}"#).is_none());
    }

    #[test]
    fn test_missing_fields_default() {
        let data = TeamData::parse(r#"{"team":"구미운용팀","items":[{"name":"안전화","quantity":-3}],"lastUpdated":"어제"}"#)
            .unwrap();
        let item = &data.items[0];
        assert_eq!(item.quantity, 0);
        assert_eq!(item.category, DEFAULT_CATEGORY);
        assert_eq!(item.status, ItemStatus::Registered);
        assert!(data.last_updated.is_none());
    }

    #[test]
    fn test_duplicate_names_last_wins() {
        let data = TeamData::parse(
            r#"{"team":"안동운용팀","items":[
                {"name":"안전대","quantity":2},
                {"name":"안전모","quantity":5},
                {"name":"안전대","quantity":7,"status":"양호"}
            ]}"#,
        )
        .unwrap();
        assert_eq!(data.items.len(), 2);
        assert_eq!(data.items[0].name, "안전대");
        assert_eq!(data.items[0].quantity, 7);
    }

    #[test]
    fn test_push_unique() {
        let mut data = TeamData::new("문경운용팀", vec![], Utc::now());
        assert!(data.push_unique(EquipmentItem::new("방진마스크", 20, "호흡", ItemStatus::Good)));
        assert!(!data.push_unique(EquipmentItem::new("방진마스크", 1, "호흡", ItemStatus::Bad)));
        assert_eq!(data.items.len(), 1);
        assert_eq!(data.total_quantity(), 20);
    }

    #[test]
    fn test_content_round_trip_keeps_korean_status() {
        let data = TeamData::new(
            "남대구운용팀",
            vec![EquipmentItem::new("안전모", 3, "", ItemStatus::Bad)],
            Utc::now(),
        );
        let content = data.to_content();
        assert!(content.contains("\"불량\""));
        assert!(content.contains("\"lastUpdated\""));
        assert_eq!(TeamData::parse(&content).unwrap().items[0].category, DEFAULT_CATEGORY);
    }
}
