//! Portal settings (lock flag)

use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use portal_types::{Result, Settings, StoreError};

/// Single-document settings store
pub struct SettingsStore {
    store_path: PathBuf,
    settings: Settings,
}

impl SettingsStore {
    pub fn open(store_dir: &Path) -> Result<Self> {
        fs::create_dir_all(store_dir)?;
        let store_path = store_dir.join("settings.json");

        let settings = if store_path.exists() {
            let file = File::open(&store_path)?;
            let reader = BufReader::new(file);
            serde_json::from_reader(reader).map_err(|e| StoreError::Corrupted {
                path: store_path.display().to_string(),
                reason: e.to_string(),
            })?
        } else {
            Settings::default()
        };

        Ok(Self { store_path, settings })
    }

    fn write(&self, settings: &Settings) -> Result<()> {
        let file = File::create(&self.store_path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, settings)?;
        Ok(())
    }

    pub fn get(&self) -> Settings {
        self.settings
    }

    pub fn set_locked(&mut self, locked: bool) -> Result<Settings> {
        let next = Settings { is_locked: locked };
        self.write(&next)?;
        self.settings = next;
        Ok(self.settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_lock_flag_persists() {
        let dir = tempdir().unwrap();
        {
            let mut store = SettingsStore::open(dir.path()).unwrap();
            assert!(!store.get().is_locked);
            store.set_locked(true).unwrap();
        }
        let store = SettingsStore::open(dir.path()).unwrap();
        assert!(store.get().is_locked);
    }

    #[test]
    fn test_failed_write_keeps_flag() {
        let dir = tempdir().unwrap();
        let mut store = SettingsStore::open(dir.path()).unwrap();
        fs::create_dir_all(dir.path().join("settings.json")).unwrap();
        assert!(store.set_locked(true).is_err());
        assert!(!store.get().is_locked);
    }
}
