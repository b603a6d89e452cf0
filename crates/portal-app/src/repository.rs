//! Repository adapters for persistence layer

use std::path::Path;
use std::sync::Arc;

use portal_domain::repository::{
    ConversationRepository, NoticeRepository, SettingsRepository, TeamRepository, VehicleRepository,
};
use portal_infra::persistence::{
    FileConversationRepository, FileNoticeRepository, FileSettingsRepository, FileTeamRepository,
    FileVehicleRepository,
};
use portal_infra::uploads::UploadStore;
use portal_types::Result;

use crate::config::Config;

/// Shared handles to every repository
#[derive(Clone)]
pub struct Repositories {
    pub notices: Arc<dyn NoticeRepository>,
    pub teams: Arc<dyn TeamRepository>,
    pub vehicles: Arc<dyn VehicleRepository>,
    pub conversations: Arc<dyn ConversationRepository>,
    pub settings: Arc<dyn SettingsRepository>,
}

impl Repositories {
    /// Open file-based repositories under `data_dir`
    pub fn open(data_dir: &Path) -> Result<Self> {
        tracing::debug!(dir = %data_dir.display(), "opening repositories");
        Ok(Self {
            notices: Arc::new(FileNoticeRepository::open(data_dir)?),
            teams: Arc::new(FileTeamRepository::open(data_dir)?),
            vehicles: Arc::new(FileVehicleRepository::open(data_dir)?),
            conversations: Arc::new(FileConversationRepository::open(data_dir)?),
            settings: Arc::new(FileSettingsRepository::open(data_dir)?),
        })
    }
}

/// Open repositories in the configured data directory
pub fn open_repositories(config: &Config) -> Result<Repositories> {
    let data_dir = config.data_dir()?;
    Repositories::open(&data_dir)
}

/// Open the configured upload directory
pub fn open_upload_store(config: &Config) -> Result<UploadStore> {
    let upload_dir = config.upload_dir()?;
    UploadStore::open(&upload_dir)
}
