//! File-based implementation of TeamRepository

use std::path::Path;
use std::sync::Mutex;

use portal_domain::repository::TeamRepository;
use portal_store::TeamStore;
use portal_types::{NewTeam, Result, Team};

use super::lock;

pub struct FileTeamRepository {
    store: Mutex<TeamStore>,
}

impl FileTeamRepository {
    pub fn open(store_dir: &Path) -> Result<Self> {
        Ok(Self {
            store: Mutex::new(TeamStore::open(store_dir)?),
        })
    }
}

impl TeamRepository for FileTeamRepository {
    fn find_by_year(&self, year: i32) -> Result<Vec<Team>> {
        let store = lock(&self.store, "teams")?;
        Ok(store.by_year(year).into_iter().cloned().collect())
    }

    fn find_by_id(&self, id: i64) -> Result<Option<Team>> {
        Ok(lock(&self.store, "teams")?.get(id).cloned())
    }

    fn find_by_name(&self, name: &str, year: i32) -> Result<Option<Team>> {
        Ok(lock(&self.store, "teams")?.find(name, year).cloned())
    }

    fn create(&self, team: NewTeam, base_score: i32) -> Result<Team> {
        lock(&self.store, "teams")?.add(team, base_score)
    }

    fn save(&self, team: Team) -> Result<Option<Team>> {
        lock(&self.store, "teams")?.replace(team)
    }
}
