//! File-based implementation of SettingsRepository

use std::path::Path;
use std::sync::Mutex;

use portal_domain::repository::SettingsRepository;
use portal_store::SettingsStore;
use portal_types::{Result, Settings};

use super::lock;

pub struct FileSettingsRepository {
    store: Mutex<SettingsStore>,
}

impl FileSettingsRepository {
    pub fn open(store_dir: &Path) -> Result<Self> {
        Ok(Self {
            store: Mutex::new(SettingsStore::open(store_dir)?),
        })
    }
}

impl SettingsRepository for FileSettingsRepository {
    fn load(&self) -> Result<Settings> {
        Ok(lock(&self.store, "settings")?.get())
    }

    fn set_locked(&self, locked: bool) -> Result<Settings> {
        lock(&self.store, "settings")?.set_locked(locked)
    }
}
