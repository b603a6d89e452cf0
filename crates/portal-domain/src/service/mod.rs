//! Domain services

pub mod faq;
pub mod inventory;
pub mod reconcile;
pub mod scoring;
pub mod slides;

pub use faq::{FaqBook, FaqEntry};
pub use inventory::{
    aggregate_items, categorize, collect_team_records, parse_team_data, team_overview, CategorySummary,
    InventoryStatus, InventoryTotals, ItemSummary, TeamInventoryStatus, TeamRecord,
};
pub use reconcile::{
    group_rows, plan_bulk_add, plan_import, BatchReport, BulkAddPlan, ImportRow, ReconcileAction,
};
pub use scoring::{scoreboard, vehicle_accident_count, ScoreGrade, ScoreRules, ScoreboardEntry};
pub use slides::{Slide, SlideDeck, AUTOPLAY_INTERVAL};
