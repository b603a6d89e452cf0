//! Equipment inventory aggregation across team records

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use portal_types::{Notice, NoticeCategory};

use crate::model::{ItemStatus, TeamData};

/// A parsed inventory record together with the notice that stores it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamRecord {
    pub notice_id: i64,
    #[serde(flatten)]
    pub data: TeamData,
}

/// Totals of one item name across the selected teams
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemSummary {
    pub name: String,
    pub category: String,
    /// good + bad
    pub registered: u64,
    pub good: u64,
    pub bad: u64,
    /// Teams holding the item, in record order
    pub teams: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySummary {
    pub category: String,
    pub kinds: usize,
    pub registered: u64,
    pub good: u64,
    pub bad: u64,
}

/// Inspection state of a team's inventory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InventoryStatus {
    /// 미등록: the team has no record
    Unregistered,
    /// 양호: no defective items
    Good,
    /// 점검필요: at least one defective item
    NeedsInspection,
}

impl InventoryStatus {
    pub fn label(&self) -> &'static str {
        match self {
            InventoryStatus::Unregistered => "미등록",
            InventoryStatus::Good => "양호",
            InventoryStatus::NeedsInspection => "점검필요",
        }
    }
}

impl std::fmt::Display for InventoryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamInventoryStatus {
    pub team: String,
    pub item_kinds: usize,
    pub total_quantity: u64,
    /// Quantity of defective items
    pub bad_count: u64,
    pub status: InventoryStatus,
    pub last_updated: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryTotals {
    pub kinds: usize,
    pub registered: u64,
    pub good: u64,
    pub bad: u64,
    pub teams_reporting: usize,
}

impl InventoryTotals {
    pub fn compute(summaries: &[ItemSummary], teams_reporting: usize) -> Self {
        let mut totals = InventoryTotals {
            kinds: summaries.len(),
            teams_reporting,
            ..Default::default()
        };
        for summary in summaries {
            totals.registered += summary.registered;
            totals.good += summary.good;
            totals.bad += summary.bad;
        }
        totals
    }
}

/// Parse an `equip_status` notice body; anything but a team record is absent
pub fn parse_team_data(content: &str) -> Option<TeamData> {
    TeamData::parse(content)
}

/// Inventory records among `notices`, one per team, sorted by team name.
///
/// Notices outside `equip_status` and bodies that are not team records are
/// skipped. When two notices name the same team the higher id wins.
pub fn collect_team_records(notices: &[Notice]) -> Vec<TeamRecord> {
    let mut by_team: BTreeMap<String, TeamRecord> = BTreeMap::new();
    for notice in notices.iter().filter(|n| n.category == NoticeCategory::EquipStatus) {
        let Some(data) = parse_team_data(&notice.content) else {
            continue;
        };
        match by_team.get(&data.team) {
            Some(existing) if existing.notice_id > notice.id => {}
            _ => {
                by_team.insert(
                    data.team.clone(),
                    TeamRecord {
                        notice_id: notice.id,
                        data,
                    },
                );
            }
        }
    }
    by_team.into_values().collect()
}

/// Sum quantities per item name across all records, or only `team`'s.
///
/// Items still marked 등록 count as good. Output is sorted by category, then name.
pub fn aggregate_items(records: &[TeamRecord], team: Option<&str>) -> Vec<ItemSummary> {
    let mut summaries: Vec<ItemSummary> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    let selected = records
        .iter()
        .filter(|r| team.map_or(true, |t| r.data.team == t.trim()));

    for record in selected {
        for item in &record.data.items {
            let slot = *index.entry(item.name.clone()).or_insert_with(|| {
                summaries.push(ItemSummary {
                    name: item.name.clone(),
                    category: item.category.clone(),
                    registered: 0,
                    good: 0,
                    bad: 0,
                    teams: Vec::new(),
                });
                summaries.len() - 1
            });
            let summary = &mut summaries[slot];
            let quantity = item.quantity as u64;
            match item.status {
                ItemStatus::Bad => summary.bad += quantity,
                ItemStatus::Good | ItemStatus::Registered => summary.good += quantity,
            }
            summary.registered = summary.good + summary.bad;
            if !summary.teams.contains(&record.data.team) {
                summary.teams.push(record.data.team.clone());
            }
        }
    }

    summaries.sort_by(|a, b| a.category.cmp(&b.category).then_with(|| a.name.cmp(&b.name)));
    summaries
}

/// Group item summaries by category, sorted by category name
pub fn categorize(summaries: &[ItemSummary]) -> Vec<CategorySummary> {
    let mut groups: BTreeMap<&str, CategorySummary> = BTreeMap::new();
    for summary in summaries {
        let group = groups
            .entry(summary.category.as_str())
            .or_insert_with(|| CategorySummary {
                category: summary.category.clone(),
                kinds: 0,
                registered: 0,
                good: 0,
                bad: 0,
            });
        group.kinds += 1;
        group.registered += summary.registered;
        group.good += summary.good;
        group.bad += summary.bad;
    }
    groups.into_values().collect()
}

/// Inventory state of every roster team, in roster order
pub fn team_overview(records: &[TeamRecord], roster: &[String]) -> Vec<TeamInventoryStatus> {
    roster
        .iter()
        .map(|team| {
            let Some(record) = records.iter().find(|r| r.data.team == team.trim()) else {
                return TeamInventoryStatus {
                    team: team.clone(),
                    item_kinds: 0,
                    total_quantity: 0,
                    bad_count: 0,
                    status: InventoryStatus::Unregistered,
                    last_updated: None,
                };
            };
            let bad_count: u64 = record
                .data
                .items
                .iter()
                .filter(|i| i.status == ItemStatus::Bad)
                .map(|i| i.quantity as u64)
                .sum();
            let has_bad = record.data.items.iter().any(|i| i.status == ItemStatus::Bad);
            TeamInventoryStatus {
                team: team.clone(),
                item_kinds: record.data.items.len(),
                total_quantity: record.data.total_quantity(),
                bad_count,
                status: if has_bad {
                    InventoryStatus::NeedsInspection
                } else {
                    InventoryStatus::Good
                },
                last_updated: record.data.last_updated,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::EquipmentItem;

    fn notice(id: i64, category: NoticeCategory, content: &str) -> Notice {
        Notice {
            id,
            title: format!("notice {id}"),
            content: content.to_string(),
            category,
            image_url: None,
            created_at: Utc::now(),
        }
    }

    fn record(id: i64, team: &str, items: Vec<EquipmentItem>) -> TeamRecord {
        TeamRecord {
            notice_id: id,
            data: TeamData::new(team, items, Utc::now()),
        }
    }

    fn sample() -> Vec<TeamRecord> {
        vec![
            record(
                1,
                "동대구운용팀",
                vec![
                    EquipmentItem::new("안전모", 10, "머리보호", ItemStatus::Good),
                    EquipmentItem::new("절연장갑", 4, "전기", ItemStatus::Bad),
                ],
            ),
            record(
                2,
                "포항운용팀",
                vec![
                    EquipmentItem::new("안전모", 5, "머리보호", ItemStatus::Registered),
                    EquipmentItem::new("절연장갑", 2, "전기", ItemStatus::Good),
                ],
            ),
        ]
    }

    #[test]
    fn test_collect_skips_other_content() {
        let notices = vec![
            notice(1, NoticeCategory::EquipStatus, r#"{"team":"구미운용팀","items":[]}"#),
            notice(2, NoticeCategory::EquipStatus, r#"{"team":"구미운용팀","text":"보고","excelUrl":"/uploads/x.xlsx"}"#),
            notice(3, NoticeCategory::EquipStatus, "not json"),
            notice(4, NoticeCategory::Notice, r#"{"team":"안동운용팀","items":[]}"#),
        ];
        let records = collect_team_records(&notices);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].notice_id, 1);
        assert!(records[0].data.items.is_empty());
    }

    #[test]
    fn test_collect_newest_record_wins() {
        let notices = vec![
            notice(9, NoticeCategory::EquipStatus, r#"{"team":"문경운용팀","items":[{"name":"안전화","quantity":3}]}"#),
            notice(4, NoticeCategory::EquipStatus, r#"{"team":"문경운용팀","items":[]}"#),
        ];
        let records = collect_team_records(&notices);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].notice_id, 9);
    }

    #[test]
    fn test_aggregate_all_teams() {
        let summaries = aggregate_items(&sample(), None);
        assert_eq!(summaries.len(), 2);

        let helmet = summaries.iter().find(|s| s.name == "안전모").unwrap();
        assert_eq!(helmet.good, 15);
        assert_eq!(helmet.bad, 0);
        assert_eq!(helmet.registered, 15);
        assert_eq!(helmet.teams, vec!["동대구운용팀", "포항운용팀"]);

        let gloves = summaries.iter().find(|s| s.name == "절연장갑").unwrap();
        assert_eq!(gloves.good, 2);
        assert_eq!(gloves.bad, 4);
        assert_eq!(gloves.registered, gloves.good + gloves.bad);
    }

    #[test]
    fn test_aggregate_sorted_by_category_then_name() {
        let summaries = aggregate_items(&sample(), None);
        let order: Vec<_> = summaries.iter().map(|s| s.category.as_str()).collect();
        assert_eq!(order, vec!["머리보호", "전기"]);
    }

    #[test]
    fn test_aggregate_single_team() {
        let summaries = aggregate_items(&sample(), Some("포항운용팀"));
        let gloves = summaries.iter().find(|s| s.name == "절연장갑").unwrap();
        assert_eq!(gloves.bad, 0);
        assert_eq!(gloves.teams, vec!["포항운용팀"]);

        assert!(aggregate_items(&sample(), Some("없는팀")).is_empty());
    }

    #[test]
    fn test_categorize_and_totals() {
        let summaries = aggregate_items(&sample(), None);
        let categories = categorize(&summaries);
        assert_eq!(categories.len(), 2);
        assert_eq!(categories[1].category, "전기");
        assert_eq!(categories[1].registered, 6);

        let totals = InventoryTotals::compute(&summaries, 2);
        assert_eq!(totals.kinds, 2);
        assert_eq!(totals.registered, 21);
        assert_eq!(totals.bad, 4);
    }

    #[test]
    fn test_team_overview_statuses() {
        let roster: Vec<String> = ["동대구운용팀", "포항운용팀", "문경운용팀"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let overview = team_overview(&sample(), &roster);
        assert_eq!(overview[0].status, InventoryStatus::NeedsInspection);
        assert_eq!(overview[0].bad_count, 4);
        assert_eq!(overview[1].status, InventoryStatus::Good);
        assert_eq!(overview[1].total_quantity, 7);
        assert_eq!(overview[2].status, InventoryStatus::Unregistered);
        assert_eq!(overview[2].status.label(), "미등록");
    }
}
