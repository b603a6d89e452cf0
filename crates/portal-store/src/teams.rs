//! Team scorecard table

use std::collections::BTreeMap;
use std::path::Path;

use portal_types::{NewTeam, Result, Team};

use crate::table::{Record, Table};

impl Record for Team {
    fn id(&self) -> i64 {
        self.id
    }
}

/// Persistent store for yearly team scorecards
pub struct TeamStore {
    table: Table<Team>,
}

impl TeamStore {
    pub fn open(store_dir: &Path) -> Result<Self> {
        Ok(Self {
            table: Table::open(store_dir, "teams.json")?,
        })
    }

    /// Register a team with a clean record (base score supplied by caller)
    pub fn add(&mut self, new: NewTeam, base_score: i32) -> Result<Team> {
        self.table.insert_with(|id| Team {
            id,
            name: new.name,
            year: new.year,
            vehicle_count: new.vehicle_count,
            total_score: base_score,
            work_accident: 0,
            fine_speed: 0,
            fine_signal: 0,
            fine_lane: 0,
            inspection_miss: 0,
            suggestion: 0,
            activity: 0,
            vehicle_accidents: BTreeMap::new(),
        })
    }

    pub fn get(&self, id: i64) -> Option<&Team> {
        self.table.get(id)
    }

    /// Teams of one year, sorted by name
    pub fn by_year(&self, year: i32) -> Vec<&Team> {
        let mut teams: Vec<_> = self.table.iter().filter(|t| t.year == year).collect();
        teams.sort_by(|a, b| a.name.cmp(&b.name));
        teams
    }

    pub fn find(&self, name: &str, year: i32) -> Option<&Team> {
        self.table.iter().find(|t| t.year == year && t.name == name)
    }

    /// Replace a stored team with `team` (matched by id)
    pub fn replace(&mut self, team: Team) -> Result<Option<Team>> {
        let id = team.id;
        self.table.update(id, move |stored| *stored = team)
    }

    pub fn remove(&mut self, id: i64) -> Result<bool> {
        Ok(self.table.remove(id)?.is_some())
    }

    pub fn count(&self) -> usize {
        self.table.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn new_team(name: &str, year: i32) -> NewTeam {
        NewTeam {
            name: name.to_string(),
            year,
            vehicle_count: 10,
        }
    }

    #[test]
    fn test_teams_scoped_by_year() {
        let dir = tempdir().unwrap();
        let mut store = TeamStore::open(dir.path()).unwrap();
        store.add(new_team("포항운용팀", 2025), 100).unwrap();
        store.add(new_team("구미운용팀", 2025), 100).unwrap();
        store.add(new_team("포항운용팀", 2026), 100).unwrap();

        let names: Vec<_> = store.by_year(2025).iter().map(|t| t.name.clone()).collect();
        assert_eq!(names, vec!["구미운용팀", "포항운용팀"]);
        assert!(store.find("포항운용팀", 2026).is_some());
        assert!(store.find("구미운용팀", 2026).is_none());
    }

    #[test]
    fn test_replace_overwrites_counters() {
        let dir = tempdir().unwrap();
        let mut store = TeamStore::open(dir.path()).unwrap();
        let mut team = store.add(new_team("문경운용팀", 2025), 100).unwrap();
        team.fine_lane = 2;
        team.total_score = 94;

        let stored = store.replace(team).unwrap().unwrap();
        assert_eq!(stored.fine_lane, 2);
        assert_eq!(store.get(stored.id).unwrap().total_score, 94);
    }
}
