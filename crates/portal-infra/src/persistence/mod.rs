//! Persistence implementations
//!
//! This module provides file-based implementations of the repository traits.
//! Each repository owns one store behind a `Mutex`.

mod file_conversation_repo;
mod file_notice_repo;
mod file_settings_repo;
mod file_team_repo;
mod file_vehicle_repo;

use std::sync::{Mutex, MutexGuard};

use portal_types::{Result, StoreError};

pub use file_conversation_repo::FileConversationRepository;
pub use file_notice_repo::FileNoticeRepository;
pub use file_settings_repo::FileSettingsRepository;
pub use file_team_repo::FileTeamRepository;
pub use file_vehicle_repo::FileVehicleRepository;

fn lock<'a, T>(mutex: &'a Mutex<T>, store: &str) -> Result<MutexGuard<'a, T>> {
    mutex
        .lock()
        .map_err(|_| StoreError::Poisoned(store.to_string()).into())
}
