//! JSON-fixture stats backend.
//!
//! Serves players, advanced rows, game logs and standings from a JSON
//! document so the analyzer can run without network access:
//!
//! ```json
//! {
//!   "players": [{
//!     "id": 2544, "full_name": "LeBron James", "is_active": true,
//!     "season_stats": [{ "season": "2024-25", "ppg": 24.4, ... }],
//!     "advanced": [...],
//!     "game_log": [...]
//!   }],
//!   "standings": [{ "team_name": "Los Angeles Lakers", ... }]
//! }
//! ```

use std::path::Path;

use async_trait::async_trait;
use legm_core::error::StatsError;
use legm_core::stats::*;
use serde::{Deserialize, Serialize};

use crate::names::{current_season, normalize_name};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FixtureData {
    #[serde(default)]
    pub players: Vec<FixturePlayer>,
    #[serde(default)]
    pub standings: Vec<TeamStanding>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixturePlayer {
    pub id: u64,
    pub full_name: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub season_stats: Vec<PlayerSeasonStats>,
    #[serde(default)]
    pub advanced: Vec<PlayerAdvancedStats>,
    /// Most recent game first
    #[serde(default)]
    pub game_log: Vec<PlayerGameLog>,
}

fn default_active() -> bool {
    true
}

impl FixturePlayer {
    fn first_name(&self) -> String {
        normalize_name(self.full_name.split_whitespace().next().unwrap_or(""))
    }

    fn last_name(&self) -> String {
        normalize_name(self.full_name.split_whitespace().last().unwrap_or(""))
    }
}

fn prefer_active<'a>(matches: &[&'a FixturePlayer]) -> Option<&'a FixturePlayer> {
    matches
        .iter()
        .find(|p| p.is_active)
        .or_else(|| matches.first())
        .copied()
}

/// A `StatsBackend` over an in-memory [`FixtureData`].
///
/// `season: None` means the current season; when the fixture has no row for
/// it, the player's latest season in the fixture is used instead.
pub struct FixtureStats {
    data: FixtureData,
}

impl FixtureStats {
    pub fn new(data: FixtureData) -> Self {
        Self { data }
    }

    pub fn from_json(json: &str) -> Result<Self, StatsError> {
        let data: FixtureData = serde_json::from_str(json)
            .map_err(|e| StatsError::InvalidData(format!("bad stats fixture: {e}")))?;
        Ok(Self::new(data))
    }

    pub fn from_path(path: &Path) -> Result<Self, StatsError> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            StatsError::InvalidData(format!("cannot read stats fixture {}: {e}", path.display()))
        })?;
        Self::from_json(&json)
    }

    /// Resolve a human-typed name: exact match, then substring, then
    /// first + last name. Active players win ties.
    fn find_player(&self, name: &str) -> Result<&FixturePlayer, StatsError> {
        let query = normalize_name(name);
        let not_found = || {
            StatsError::NotFound(format!(
                "Could not find an NBA player matching '{}'. \
                 Try using their full name (e.g. 'LeBron James').",
                name.trim()
            ))
        };
        if query.is_empty() {
            return Err(not_found());
        }

        let players = &self.data.players;

        let exact: Vec<_> = players
            .iter()
            .filter(|p| normalize_name(&p.full_name) == query)
            .collect();
        if let Some(p) = prefer_active(&exact) {
            return Ok(p);
        }

        let partial: Vec<_> = players
            .iter()
            .filter(|p| normalize_name(&p.full_name).contains(&query))
            .collect();
        if let Some(p) = prefer_active(&partial) {
            return Ok(p);
        }

        let parts: Vec<&str> = query.split(' ').collect();
        if let [first, .., last] = parts.as_slice() {
            let by_name: Vec<_> = players
                .iter()
                .filter(|p| p.last_name() == *last && p.first_name().contains(*first))
                .collect();
            if let Some(p) = prefer_active(&by_name) {
                return Ok(p);
            }
        }

        Err(not_found())
    }

    fn pick_season<'a, T>(
        rows: &'a [T],
        season: Option<&str>,
        season_of: impl Fn(&T) -> &str,
    ) -> Option<&'a T> {
        match season {
            Some(s) => rows.iter().find(|r| season_of(r) == s),
            None => {
                let current = current_season();
                rows.iter()
                    .find(|r| season_of(r) == current)
                    .or_else(|| rows.iter().max_by(|a, b| season_of(a).cmp(season_of(b))))
            }
        }
    }
}

#[async_trait]
impl StatsBackend for FixtureStats {
    async fn season_averages(
        &self,
        player_name: &str,
        season: Option<&str>,
    ) -> Result<PlayerSeasonStats, StatsError> {
        let player = self.find_player(player_name)?;
        Self::pick_season(&player.season_stats, season, |r| r.season.as_str())
            .cloned()
            .ok_or_else(|| {
                StatsError::NotFound(format!(
                    "No stats found for '{}' in the {} season.",
                    player.full_name,
                    season.map(str::to_string).unwrap_or_else(current_season)
                ))
            })
    }

    async fn advanced_stats(
        &self,
        player_name: &str,
        season: Option<&str>,
    ) -> Result<PlayerAdvancedStats, StatsError> {
        let player = self.find_player(player_name)?;
        Self::pick_season(&player.advanced, season, |r| r.season.as_str())
            .cloned()
            .ok_or_else(|| {
                StatsError::NotFound(format!(
                    "No advanced stats found for '{}' in the {} season.",
                    player.full_name,
                    season.map(str::to_string).unwrap_or_else(current_season)
                ))
            })
    }

    async fn recent_games(
        &self,
        player_name: &str,
        last_n: usize,
    ) -> Result<Vec<PlayerGameLog>, StatsError> {
        let player = self.find_player(player_name)?;
        if player.game_log.is_empty() {
            return Err(StatsError::NotFound(format!(
                "No recent games found for '{}' in the {} season.",
                player.full_name,
                current_season()
            )));
        }
        Ok(player.game_log.iter().take(last_n).cloned().collect())
    }

    async fn standings(&self, conference: Option<&str>) -> Result<Vec<TeamStanding>, StatsError> {
        let standings = match conference {
            Some(conf) => {
                let conf = normalize_name(conf);
                self.data
                    .standings
                    .iter()
                    .filter(|s| normalize_name(&s.conference) == conf)
                    .cloned()
                    .collect()
            }
            None => self.data.standings.clone(),
        };
        Ok(standings)
    }

    async fn team_record(&self, team_name: &str) -> Result<TeamStanding, StatsError> {
        let query = normalize_name(team_name);
        self.data
            .standings
            .iter()
            .find(|s| !query.is_empty() && normalize_name(&s.team_name).contains(&query))
            .cloned()
            .ok_or_else(|| {
                StatsError::NotFound(format!(
                    "Could not find a team matching '{}'. \
                     Try using the full team name (e.g. 'Lakers', 'Boston Celtics').",
                    team_name.trim()
                ))
            })
    }
}
