//! Portal lock flag

use std::sync::Arc;

use portal_domain::repository::SettingsRepository;
use portal_types::{Error, Result, Settings};

#[derive(Clone)]
pub struct SettingsService {
    repo: Arc<dyn SettingsRepository>,
}

impl SettingsService {
    pub fn new(repo: Arc<dyn SettingsRepository>) -> Self {
        Self { repo }
    }

    pub fn settings(&self) -> Result<Settings> {
        self.repo.load()
    }

    pub fn is_locked(&self) -> Result<bool> {
        Ok(self.repo.load()?.is_locked)
    }

    pub fn set_locked(&self, locked: bool) -> Result<Settings> {
        let settings = self.repo.set_locked(locked)?;
        tracing::info!(locked, "portal lock changed");
        Ok(settings)
    }

    /// Fail with `Error::Locked` while the portal is locked
    pub fn ensure_unlocked(&self) -> Result<()> {
        if self.is_locked()? {
            return Err(Error::Locked);
        }
        Ok(())
    }
}
