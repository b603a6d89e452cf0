//! Team scorecard use cases

use std::path::Path;
use std::sync::Arc;

use chrono::{Datelike, Utc};

use portal_domain::repository::TeamRepository;
use portal_domain::service::{scoreboard, ScoreRules, ScoreboardEntry};
use portal_infra::excel;
use portal_types::{Error, NewTeam, Result, Team, TeamUpdate};

use super::settings::SettingsService;

/// Current calendar year, the default scorecard year
pub fn current_year() -> i32 {
    Utc::now().year()
}

#[derive(Clone)]
pub struct TeamService {
    repo: Arc<dyn TeamRepository>,
    settings: SettingsService,
    rules: ScoreRules,
    roster: Vec<String>,
}

impl TeamService {
    pub fn new(
        repo: Arc<dyn TeamRepository>,
        settings: SettingsService,
        rules: ScoreRules,
        roster: Vec<String>,
    ) -> Self {
        Self {
            repo,
            settings,
            rules,
            roster,
        }
    }

    pub fn rules(&self) -> &ScoreRules {
        &self.rules
    }

    /// Teams of `year`, highest score first
    pub fn list(&self, year: i32) -> Result<Vec<Team>> {
        let mut teams = self.repo.find_by_year(year)?;
        teams.sort_by(|a, b| b.total_score.cmp(&a.total_score).then_with(|| a.name.cmp(&b.name)));
        Ok(teams)
    }

    pub fn scoreboard(&self, year: i32) -> Result<Vec<ScoreboardEntry>> {
        Ok(scoreboard(&self.repo.find_by_year(year)?))
    }

    pub fn get(&self, id: i64) -> Result<Team> {
        self.repo.find_by_id(id)?.ok_or(Error::not_found("team", id))
    }

    /// Apply counter changes. The total is recomputed from the counters
    /// unless the update carries an explicit one.
    pub fn update(&self, id: i64, update: TeamUpdate) -> Result<Team> {
        self.settings.ensure_unlocked()?;
        let mut team = self.get(id)?;
        update.apply_to(&mut team);
        if update.total_score.is_none() {
            team.total_score = self.rules.score(&team);
        }
        let saved = self.repo.save(team)?.ok_or(Error::not_found("team", id))?;
        tracing::info!(id, team = %saved.name, score = saved.total_score, "team updated");
        Ok(saved)
    }

    /// Register roster teams missing from `year`; returns the created teams
    pub fn seed(&self, year: i32) -> Result<Vec<Team>> {
        self.settings.ensure_unlocked()?;
        let mut created = Vec::new();
        for name in &self.roster {
            if self.repo.find_by_name(name, year)?.is_some() {
                continue;
            }
            let team = NewTeam {
                name: name.clone(),
                year,
                vehicle_count: 0,
            };
            created.push(self.repo.create(team, self.rules.base)?);
        }
        tracing::info!(year, created = created.len(), "roster seeded");
        Ok(created)
    }

    pub fn export_scoreboard(&self, year: i32, path: &Path) -> Result<()> {
        excel::export_scoreboard(&self.scoreboard(year)?, path)
    }

    pub fn scoreboard_xlsx(&self, year: i32) -> Result<Vec<u8>> {
        excel::scoreboard_xlsx_bytes(&self.scoreboard(year)?)
    }
}
