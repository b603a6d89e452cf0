//! Reconciliation of imported spreadsheet rows against stored team records

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{EquipmentItem, TeamData};
use crate::service::inventory::TeamRecord;

/// One spreadsheet row after header mapping
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportRow {
    pub team: String,
    pub item: EquipmentItem,
}

/// A single per-team write produced by a plan
#[derive(Debug, Clone, PartialEq)]
pub enum ReconcileAction {
    /// Overwrite the record stored in notice `notice_id`
    Update { notice_id: i64, data: TeamData },
    /// Store a new record
    Create { data: TeamData },
}

impl ReconcileAction {
    pub fn data(&self) -> &TeamData {
        match self {
            ReconcileAction::Update { data, .. } | ReconcileAction::Create { data } => data,
        }
    }

    pub fn team(&self) -> &str {
        &self.data().team
    }
}

/// Outcome counts of a best-effort batch
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchReport {
    pub succeeded: usize,
    pub failed: usize,
    pub skipped: usize,
    pub errors: Vec<String>,
}

impl BatchReport {
    pub fn success(&mut self) {
        self.succeeded += 1;
    }

    pub fn failure(&mut self, message: impl Into<String>) {
        self.failed += 1;
        self.errors.push(message.into());
    }

    pub fn skip(&mut self) {
        self.skipped += 1;
    }

    pub fn total(&self) -> usize {
        self.succeeded + self.failed + self.skipped
    }
}

/// Bulk-add plan: writes to perform and teams that already hold the item
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BulkAddPlan {
    pub actions: Vec<ReconcileAction>,
    pub skipped: Vec<String>,
}

/// Group rows by trimmed team name. A repeated item name within a team
/// replaces the earlier row.
pub fn group_rows(rows: impl IntoIterator<Item = ImportRow>) -> BTreeMap<String, Vec<EquipmentItem>> {
    let mut groups: BTreeMap<String, Vec<EquipmentItem>> = BTreeMap::new();
    for row in rows {
        let team = row.team.trim();
        if team.is_empty() {
            continue;
        }
        let items = groups.entry(team.to_string()).or_default();
        match items.iter_mut().find(|existing| existing.name == row.item.name) {
            Some(existing) => *existing = row.item,
            None => items.push(row.item),
        }
    }
    groups
}

/// Plan an import: each group replaces the stored list of the team with the
/// same name, or becomes a new record.
pub fn plan_import(
    existing: &[TeamRecord],
    groups: BTreeMap<String, Vec<EquipmentItem>>,
    now: DateTime<Utc>,
) -> Vec<ReconcileAction> {
    groups
        .into_iter()
        .map(|(team, items)| {
            let data = TeamData::new(team, items, now);
            match existing.iter().find(|r| r.data.team.trim() == data.team) {
                Some(record) => ReconcileAction::Update {
                    notice_id: record.notice_id,
                    data,
                },
                None => ReconcileAction::Create { data },
            }
        })
        .collect()
}

/// Plan adding `item` to every existing record that does not yet hold an
/// item of the same name
pub fn plan_bulk_add(existing: &[TeamRecord], item: &EquipmentItem, now: DateTime<Utc>) -> BulkAddPlan {
    let mut plan = BulkAddPlan::default();
    for record in existing {
        let mut data = record.data.clone();
        if !data.push_unique(item.clone()) {
            plan.skipped.push(data.team);
            continue;
        }
        data.last_updated = Some(now);
        plan.actions.push(ReconcileAction::Update {
            notice_id: record.notice_id,
            data,
        });
    }
    plan
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ItemStatus;

    fn row(team: &str, name: &str, quantity: u32) -> ImportRow {
        ImportRow {
            team: team.to_string(),
            item: EquipmentItem::new(name, quantity, "보호구", ItemStatus::Good),
        }
    }

    fn existing() -> Vec<TeamRecord> {
        vec![
            TeamRecord {
                notice_id: 11,
                data: TeamData::new(
                    "동대구운용팀",
                    vec![EquipmentItem::new("안전모", 3, "머리보호", ItemStatus::Good)],
                    Utc::now(),
                ),
            },
            TeamRecord {
                notice_id: 12,
                data: TeamData::new("서대구운용팀", vec![], Utc::now()),
            },
        ]
    }

    #[test]
    fn test_group_rows_last_row_wins() {
        let groups = group_rows(vec![
            row(" 동대구운용팀", "안전모", 3),
            row("동대구운용팀", "안전화", 2),
            row("동대구운용팀 ", "안전모", 9),
            row("", "무시", 1),
            row("포항운용팀", "안전모", 1),
        ]);
        assert_eq!(groups.len(), 2);
        let items = &groups["동대구운용팀"];
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].name, "안전모");
        assert_eq!(items[0].quantity, 9);
    }

    #[test]
    fn test_plan_import_update_or_create() {
        let now = Utc::now();
        let groups = group_rows(vec![row("동대구운용팀", "절연장갑", 5), row("구미운용팀", "안전모", 2)]);
        let plan = plan_import(&existing(), groups, now);
        assert_eq!(plan.len(), 2);

        let create = plan.iter().find(|a| a.team() == "구미운용팀").unwrap();
        assert!(matches!(create, ReconcileAction::Create { .. }));

        let update = plan.iter().find(|a| a.team() == "동대구운용팀").unwrap();
        match update {
            ReconcileAction::Update { notice_id, data } => {
                assert_eq!(*notice_id, 11);
                // imported list replaces the stored one
                assert_eq!(data.items.len(), 1);
                assert_eq!(data.items[0].name, "절연장갑");
                assert_eq!(data.last_updated, Some(now));
            }
            other => panic!("expected update, got {other:?}"),
        }
    }

    #[test]
    fn test_plan_bulk_add_skips_holders() {
        let item = EquipmentItem::new("안전모", 1, "머리보호", ItemStatus::Registered);
        let plan = plan_bulk_add(&existing(), &item, Utc::now());
        assert_eq!(plan.skipped, vec!["동대구운용팀".to_string()]);
        assert_eq!(plan.actions.len(), 1);
        assert_eq!(plan.actions[0].team(), "서대구운용팀");
        assert!(plan.actions[0].data().contains_item("안전모"));
    }

    #[test]
    fn test_batch_report_counts() {
        let mut report = BatchReport::default();
        report.success();
        report.skip();
        report.failure("포항운용팀: disk full");
        assert_eq!(report.total(), 3);
        assert_eq!(report.errors.len(), 1);
    }
}
