//! Application services
//!
//! `Portal` bundles one service per surface over a shared set of
//! repositories. Services are cheap to clone and safe to share between
//! request handlers.

mod chat;
mod equipment;
mod notices;
mod settings;
mod teams;
mod uploads;
mod vehicles;

use std::sync::Arc;

use portal_ai::{ChatBackend, FaqBackend, OpenAiBackend, OpenAiConfig};
use portal_infra::uploads::UploadStore;
use portal_types::Result;

use crate::config::Config;
use crate::repository::{open_repositories, open_upload_store, Repositories};

pub use chat::{ChatService, EventStream};
pub use equipment::{record_title, EquipmentService, EquipmentSummary};
pub use notices::NoticeService;
pub use settings::SettingsService;
pub use teams::{current_year, TeamService};
pub use uploads::{FileUpload, ImageUpload, UploadService};
pub use vehicles::VehicleService;

#[derive(Clone)]
pub struct Portal {
    pub notices: NoticeService,
    pub equipment: EquipmentService,
    pub teams: TeamService,
    pub vehicles: VehicleService,
    pub chat: ChatService,
    pub uploads: UploadService,
    pub settings: SettingsService,
}

impl Portal {
    /// Open the configured data directories and chat backend
    pub fn open(config: &Config) -> Result<Self> {
        let repos = open_repositories(config)?;
        let uploads = open_upload_store(config)?;
        Ok(Self::from_parts(repos, uploads, build_backend(config), config))
    }

    pub fn from_parts(
        repos: Repositories,
        uploads: UploadStore,
        backend: Arc<dyn ChatBackend>,
        config: &Config,
    ) -> Self {
        let settings = SettingsService::new(repos.settings);
        Self {
            notices: NoticeService::new(Arc::clone(&repos.notices), settings.clone()),
            equipment: EquipmentService::new(repos.notices, settings.clone(), config.teams.clone()),
            teams: TeamService::new(repos.teams, settings.clone(), config.scoring.clone(), config.teams.clone()),
            vehicles: VehicleService::new(repos.vehicles),
            chat: ChatService::new(repos.conversations, backend),
            uploads: UploadService::new(uploads),
            settings,
        }
    }
}

/// OpenAI-compatible backend when an API key is available, FAQ answers otherwise
pub fn build_backend(config: &Config) -> Arc<dyn ChatBackend> {
    match config.ai.resolved_api_key() {
        Some(api_key) => {
            tracing::info!(model = %config.ai.model, "using OpenAI-compatible chat backend");
            Arc::new(OpenAiBackend::new(OpenAiConfig {
                base_url: config.ai.base_url.clone(),
                model: config.ai.model.clone(),
                api_key,
                system_prompt: config.ai.system_prompt.clone(),
            }))
        }
        None => {
            tracing::info!("no API key configured, answering from the FAQ table");
            Arc::new(FaqBackend::new())
        }
    }
}
