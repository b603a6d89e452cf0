//! Infrastructure layer for the safety portal
//!
//! File-backed repository implementations, spreadsheet import and export,
//! and storage of uploaded files.

pub mod excel;
pub mod persistence;
pub mod spreadsheet;
pub mod uploads;

pub use persistence::{
    FileConversationRepository, FileNoticeRepository, FileSettingsRepository, FileTeamRepository,
    FileVehicleRepository,
};
