//! Equipment inventory use cases
//!
//! Team inventories live in `equip_status` notices as JSON `TeamData`.
//! Imports and bulk additions are applied team by team; a failed write is
//! counted in the report and the batch carries on.

use std::path::Path;
use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;

use portal_domain::model::EquipmentItem;
use portal_domain::repository::NoticeRepository;
use portal_domain::service::{
    aggregate_items, categorize, collect_team_records, group_rows, plan_bulk_add, plan_import, team_overview,
    BatchReport, CategorySummary, ImportRow, InventoryTotals, ItemSummary, ReconcileAction, TeamInventoryStatus,
    TeamRecord,
};
use portal_infra::{excel, spreadsheet};
use portal_types::{Error, NewNotice, NoticeCategory, NoticeUpdate, Result};

use super::settings::SettingsService;

/// Aggregated inventory view
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EquipmentSummary {
    /// Team filter the item figures were computed for
    pub team: Option<String>,
    pub items: Vec<ItemSummary>,
    pub categories: Vec<CategorySummary>,
    pub totals: InventoryTotals,
    /// Every roster team, regardless of the filter
    pub teams: Vec<TeamInventoryStatus>,
}

/// Title of the notice holding a team's inventory
pub fn record_title(team: &str) -> String {
    format!("{team} 보호구 현황")
}

#[derive(Clone)]
pub struct EquipmentService {
    notices: Arc<dyn NoticeRepository>,
    settings: SettingsService,
    roster: Vec<String>,
}

impl EquipmentService {
    pub fn new(notices: Arc<dyn NoticeRepository>, settings: SettingsService, roster: Vec<String>) -> Self {
        Self {
            notices,
            settings,
            roster,
        }
    }

    /// Stored team inventories, one per team
    pub fn records(&self) -> Result<Vec<TeamRecord>> {
        let notices = self.notices.find_by_category(NoticeCategory::EquipStatus)?;
        Ok(collect_team_records(&notices))
    }

    pub fn summary(&self, team: Option<&str>) -> Result<EquipmentSummary> {
        let team = team.map(str::trim).filter(|t| !t.is_empty());
        let records = self.records()?;
        let items = aggregate_items(&records, team);
        let categories = categorize(&items);
        let reporting = match team {
            Some(team) => records.iter().filter(|r| r.data.team == team).count(),
            None => records.len(),
        };
        let totals = InventoryTotals::compute(&items, reporting);

        // teams that report but are not on the roster still show up
        let mut roster = self.roster.clone();
        for record in &records {
            if !roster.contains(&record.data.team) {
                roster.push(record.data.team.clone());
            }
        }

        Ok(EquipmentSummary {
            team: team.map(str::to_string),
            items,
            categories,
            totals,
            teams: team_overview(&records, &roster),
        })
    }

    /// Import an equipment sheet; rejected rows count as failures
    pub fn import_csv(&self, bytes: &[u8]) -> Result<BatchReport> {
        self.import_csv_with_progress(bytes, |_, _| {})
    }

    /// Import an equipment sheet, reporting `(done, total)` after each team
    pub fn import_csv_with_progress<F>(&self, bytes: &[u8], on_progress: F) -> Result<BatchReport>
    where
        F: FnMut(usize, usize),
    {
        self.settings.ensure_unlocked()?;
        let sheet = spreadsheet::parse_equipment_csv(bytes)?;
        let mut report = BatchReport::default();
        for error in &sheet.errors {
            report.failure(error.to_string());
        }
        let report = self.apply_rows(sheet.rows, report, on_progress)?;
        tracing::info!(
            succeeded = report.succeeded,
            failed = report.failed,
            "equipment sheet imported"
        );
        Ok(report)
    }

    /// Replace the inventories of the teams named in `rows`
    pub fn import_rows(&self, rows: Vec<ImportRow>) -> Result<BatchReport> {
        self.settings.ensure_unlocked()?;
        self.apply_rows(rows, BatchReport::default(), |_, _| {})
    }

    /// Add `item` to every team inventory that lacks an item of that name
    pub fn bulk_add(&self, item: EquipmentItem) -> Result<BatchReport> {
        self.bulk_add_with_progress(item, |_, _| {})
    }

    pub fn bulk_add_with_progress<F>(&self, item: EquipmentItem, on_progress: F) -> Result<BatchReport>
    where
        F: FnMut(usize, usize),
    {
        self.settings.ensure_unlocked()?;
        if item.name.is_empty() {
            return Err(Error::validation("item name must not be empty"));
        }
        let records = self.records()?;
        let plan = plan_bulk_add(&records, &item, Utc::now());
        let mut report = BatchReport::default();
        for team in &plan.skipped {
            tracing::debug!(team = %team, item = %item.name, "item already present");
            report.skip();
        }
        self.apply(plan.actions, &mut report, on_progress);
        tracing::info!(
            item = %item.name,
            succeeded = report.succeeded,
            skipped = report.skipped,
            failed = report.failed,
            "bulk add finished"
        );
        Ok(report)
    }

    /// Inventory workbook as bytes
    pub fn export_xlsx(&self) -> Result<Vec<u8>> {
        let records = self.records()?;
        let summaries = aggregate_items(&records, None);
        excel::inventory_xlsx_bytes(&records, &summaries)
    }

    pub fn export_to(&self, path: &Path) -> Result<()> {
        let records = self.records()?;
        let summaries = aggregate_items(&records, None);
        excel::export_inventory(&records, &summaries, path)
    }

    fn apply_rows<F>(&self, rows: Vec<ImportRow>, mut report: BatchReport, on_progress: F) -> Result<BatchReport>
    where
        F: FnMut(usize, usize),
    {
        let records = self.records()?;
        let actions = plan_import(&records, group_rows(rows), Utc::now());
        self.apply(actions, &mut report, on_progress);
        Ok(report)
    }

    fn apply<F>(&self, actions: Vec<ReconcileAction>, report: &mut BatchReport, mut on_progress: F)
    where
        F: FnMut(usize, usize),
    {
        let total = actions.len();
        for (done, action) in actions.into_iter().enumerate() {
            let team = action.team().to_string();
            match self.write(action) {
                Ok(()) => report.success(),
                Err(e) => {
                    tracing::warn!(team = %team, error = %e, "inventory write failed");
                    report.failure(format!("{team}: {e}"));
                }
            }
            on_progress(done + 1, total);
        }
    }

    fn write(&self, action: ReconcileAction) -> Result<()> {
        match action {
            ReconcileAction::Update { notice_id, data } => {
                self.notices
                    .update(notice_id, NoticeUpdate::content(data.to_content()))?
                    .ok_or(Error::not_found("notice", notice_id))?;
            }
            ReconcileAction::Create { data } => {
                let notice = NewNotice::new(NoticeCategory::EquipStatus, record_title(&data.team), data.to_content());
                self.notices.create(notice)?;
            }
        }
        Ok(())
    }
}
