//! Stats backend trait and the stat models it returns.
//!
//! The backend resolves human-typed player and team names, fetches the data,
//! and fails with [`StatsError::NotFound`] when a name cannot be resolved or
//! no data exists. Request pacing against the upstream provider is the
//! backend's own business.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::StatsError;

/// Aggregated per-game season averages for a player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSeasonStats {
    pub player_name: String,
    pub player_id: u64,
    /// Season string, e.g. "2024-25"
    pub season: String,
    pub team: String,
    pub games_played: u32,
    pub mpg: f64,
    pub ppg: f64,
    pub rpg: f64,
    pub apg: f64,
    pub spg: f64,
    pub bpg: f64,
    /// 0.0–1.0
    pub fg_pct: f64,
    pub fg3_pct: f64,
    pub ft_pct: f64,
    pub turnovers: f64,
    pub plus_minus: f64,
}

/// Advanced / estimated metrics for a player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerAdvancedStats {
    pub player_name: String,
    pub player_id: u64,
    pub season: String,
    pub team: String,
    pub ts_pct: f64,
    pub efg_pct: f64,
    pub usg_pct: f64,
    pub off_rating: f64,
    pub def_rating: f64,
    pub net_rating: f64,
    pub ast_ratio: f64,
    pub tov_pct: f64,
    pub pace: f64,
    /// Player Impact Estimate
    pub pie: f64,
}

/// One entry of a player's game log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerGameLog {
    pub player_name: String,
    /// e.g. "FEB 14, 2025"
    pub date: String,
    /// e.g. "LAL vs. BOS"
    pub matchup: String,
    /// "W" or "L"
    pub result: String,
    pub minutes: u32,
    pub points: u32,
    pub rebounds: u32,
    pub assists: u32,
    pub steals: u32,
    pub blocks: u32,
    /// made/attempted, e.g. "10/20"
    pub fg: String,
    pub fg3: String,
    pub ft: String,
    pub plus_minus: f64,
}

/// Side-by-side season averages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerComparison {
    pub player_a: PlayerSeasonStats,
    pub player_b: PlayerSeasonStats,
}

/// Conference standings entry for a team.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamStanding {
    pub team_name: String,
    pub team_id: u64,
    /// "East" or "West"
    pub conference: String,
    pub wins: u32,
    pub losses: u32,
    pub win_pct: f64,
    pub conference_rank: u32,
    /// e.g. "W3"
    pub streak: String,
    /// e.g. "7-3"
    pub last_10: String,
}

/// Read-only access to NBA statistics.
///
/// `season: None` means the current season.
#[async_trait]
pub trait StatsBackend: Send + Sync {
    async fn season_averages(
        &self,
        player_name: &str,
        season: Option<&str>,
    ) -> Result<PlayerSeasonStats, StatsError>;

    async fn advanced_stats(
        &self,
        player_name: &str,
        season: Option<&str>,
    ) -> Result<PlayerAdvancedStats, StatsError>;

    async fn recent_games(
        &self,
        player_name: &str,
        last_n: usize,
    ) -> Result<Vec<PlayerGameLog>, StatsError>;

    /// Compare two players' current-season averages.
    async fn comparison(
        &self,
        player_a: &str,
        player_b: &str,
    ) -> Result<PlayerComparison, StatsError> {
        let player_a = self.season_averages(player_a, None).await?;
        let player_b = self.season_averages(player_b, None).await?;
        Ok(PlayerComparison { player_a, player_b })
    }

    /// Standings, optionally filtered to "East" or "West".
    async fn standings(&self, conference: Option<&str>) -> Result<Vec<TeamStanding>, StatsError>;

    /// A single team's standing, matched by (partial) name.
    async fn team_record(&self, team_name: &str) -> Result<TeamStanding, StatsError>;
}
