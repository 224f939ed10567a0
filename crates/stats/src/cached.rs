//! Caching and retrying decorator around any `StatsBackend`.

use std::time::Duration;

use async_trait::async_trait;
use legm_core::error::StatsError;
use legm_core::stats::*;
use tracing::debug;

use crate::cache::TtlCache;
use crate::names::{current_season, normalize_name};
use crate::retry::{RetryPolicy, with_retry};

/// Wraps a backend with a TTL cache per result type and retry on transient
/// failures. Cache keys are built from the operation, the normalized name
/// and the resolved season, so "LeBron James" and "lebron  james" share an
/// entry. Failures are never cached.
pub struct CachedStats<B> {
    inner: B,
    policy: RetryPolicy,
    seasons: TtlCache<PlayerSeasonStats>,
    advanced: TtlCache<PlayerAdvancedStats>,
    games: TtlCache<Vec<PlayerGameLog>>,
    standings: TtlCache<Vec<TeamStanding>>,
    teams: TtlCache<TeamStanding>,
}

impl<B: StatsBackend> CachedStats<B> {
    pub fn new(inner: B, ttl: Duration, policy: RetryPolicy) -> Self {
        Self {
            inner,
            policy,
            seasons: TtlCache::new(ttl),
            advanced: TtlCache::new(ttl),
            games: TtlCache::new(ttl),
            standings: TtlCache::new(ttl),
            teams: TtlCache::new(ttl),
        }
    }

    /// Drop every cached result.
    pub fn clear(&self) {
        self.seasons.clear();
        self.advanced.clear();
        self.games.clear();
        self.standings.clear();
        self.teams.clear();
    }

    pub fn inner(&self) -> &B {
        &self.inner
    }
}

fn season_key(season: Option<&str>) -> String {
    season.map(str::to_string).unwrap_or_else(current_season)
}

#[async_trait]
impl<B: StatsBackend> StatsBackend for CachedStats<B> {
    async fn season_averages(
        &self,
        player_name: &str,
        season: Option<&str>,
    ) -> Result<PlayerSeasonStats, StatsError> {
        let key = format!("player_season:{}:{}", normalize_name(player_name), season_key(season));
        if let Some(hit) = self.seasons.get(&key) {
            debug!(%key, "Stats cache hit");
            return Ok(hit);
        }

        let stats = with_retry(&self.policy, "season_averages", || {
            self.inner.season_averages(player_name, season)
        })
        .await?;
        self.seasons.set(key, stats.clone(), None);
        Ok(stats)
    }

    async fn advanced_stats(
        &self,
        player_name: &str,
        season: Option<&str>,
    ) -> Result<PlayerAdvancedStats, StatsError> {
        let key = format!("player_advanced:{}:{}", normalize_name(player_name), season_key(season));
        if let Some(hit) = self.advanced.get(&key) {
            debug!(%key, "Stats cache hit");
            return Ok(hit);
        }

        let stats = with_retry(&self.policy, "advanced_stats", || {
            self.inner.advanced_stats(player_name, season)
        })
        .await?;
        self.advanced.set(key, stats.clone(), None);
        Ok(stats)
    }

    async fn recent_games(
        &self,
        player_name: &str,
        last_n: usize,
    ) -> Result<Vec<PlayerGameLog>, StatsError> {
        let key = format!(
            "player_games:{}:{}:{last_n}",
            normalize_name(player_name),
            current_season()
        );
        if let Some(hit) = self.games.get(&key) {
            debug!(%key, "Stats cache hit");
            return Ok(hit);
        }

        let games = with_retry(&self.policy, "recent_games", || {
            self.inner.recent_games(player_name, last_n)
        })
        .await?;
        self.games.set(key, games.clone(), None);
        Ok(games)
    }

    async fn standings(&self, conference: Option<&str>) -> Result<Vec<TeamStanding>, StatsError> {
        let key = format!(
            "standings:{}",
            conference.map(normalize_name).unwrap_or_else(|| "all".into())
        );
        if let Some(hit) = self.standings.get(&key) {
            debug!(%key, "Stats cache hit");
            return Ok(hit);
        }

        let standings =
            with_retry(&self.policy, "standings", || self.inner.standings(conference)).await?;
        self.standings.set(key, standings.clone(), None);
        Ok(standings)
    }

    async fn team_record(&self, team_name: &str) -> Result<TeamStanding, StatsError> {
        let key = format!("team_record:{}", normalize_name(team_name));
        if let Some(hit) = self.teams.get(&key) {
            debug!(%key, "Stats cache hit");
            return Ok(hit);
        }

        let record =
            with_retry(&self.policy, "team_record", || self.inner.team_record(team_name)).await?;
        self.teams.set(key, record.clone(), None);
        Ok(record)
    }
}
