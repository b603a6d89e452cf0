//! Team safety scoring

use serde::{Deserialize, Serialize};

use portal_types::Team;

/// Safety grade band of a total score
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ScoreGrade {
    /// 90 and above
    A,
    /// 80 to 89
    B,
    /// below 80
    C,
}

impl ScoreGrade {
    pub fn from_score(score: i32) -> Self {
        if score >= 90 {
            ScoreGrade::A
        } else if score >= 80 {
            ScoreGrade::B
        } else {
            ScoreGrade::C
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ScoreGrade::A => "우수",
            ScoreGrade::B => "주의",
            ScoreGrade::C => "심각",
        }
    }
}

impl std::fmt::Display for ScoreGrade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let grade = match self {
            ScoreGrade::A => "A",
            ScoreGrade::B => "B",
            ScoreGrade::C => "C",
        };
        write!(f, "{} ({})", grade, self.label())
    }
}

/// Points applied per counted event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreRules {
    pub base: i32,
    /// Per work or vehicle accident
    pub accident: i32,
    pub fine_speed: i32,
    pub fine_signal: i32,
    pub fine_lane: i32,
    pub inspection_miss: i32,
    pub suggestion: i32,
    pub activity: i32,
}

impl Default for ScoreRules {
    fn default() -> Self {
        Self {
            base: 100,
            accident: -40,
            fine_speed: -1,
            fine_signal: -2,
            fine_lane: -3,
            inspection_miss: -3,
            suggestion: 3,
            activity: 3,
        }
    }
}

impl ScoreRules {
    /// Total score implied by the team's counters, clamped to the `i32` range
    pub fn score(&self, team: &Team) -> i32 {
        let points = |count: u64, per: i32| (count as i64).saturating_mul(i64::from(per));
        let accidents = u64::from(team.work_accident) + vehicle_accident_total(team);
        let total = [
            points(accidents, self.accident),
            points(u64::from(team.fine_speed), self.fine_speed),
            points(u64::from(team.fine_signal), self.fine_signal),
            points(u64::from(team.fine_lane), self.fine_lane),
            points(u64::from(team.inspection_miss), self.inspection_miss),
            points(u64::from(team.suggestion), self.suggestion),
            points(u64::from(team.activity), self.activity),
        ]
        .into_iter()
        .fold(i64::from(self.base), i64::saturating_add);
        total.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
    }
}

fn vehicle_accident_total(team: &Team) -> u64 {
    team.vehicle_accidents.values().map(|&n| u64::from(n)).sum()
}

/// Sum of the per-vehicle accident counts
pub fn vehicle_accident_count(team: &Team) -> u32 {
    team.vehicle_accidents.values().fold(0, |sum, &n| sum.saturating_add(n))
}

/// One line of the scoreboard
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreboardEntry {
    pub rank: usize,
    #[serde(flatten)]
    pub team: Team,
    pub vehicle_accident_total: u32,
    pub grade: ScoreGrade,
}

/// Teams ranked by total score (descending, ties broken by name)
pub fn scoreboard(teams: &[Team]) -> Vec<ScoreboardEntry> {
    let mut ranked: Vec<&Team> = teams.iter().collect();
    ranked.sort_by(|a, b| b.total_score.cmp(&a.total_score).then_with(|| a.name.cmp(&b.name)));
    ranked
        .into_iter()
        .enumerate()
        .map(|(i, team)| ScoreboardEntry {
            rank: i + 1,
            vehicle_accident_total: vehicle_accident_count(team),
            grade: ScoreGrade::from_score(team.total_score),
            team: team.clone(),
        })
        .collect()
}
