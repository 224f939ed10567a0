//! Subcommand implementations and the wiring they share.

pub mod analyze;
pub mod bot;
pub mod config_cmd;
pub mod doctor;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use legm_agent::TakeAnalyzer;
use legm_config::AppConfig;
use legm_core::stats::StatsBackend;
use legm_stats::{CachedStats, FixtureStats, RetryPolicy};

pub type CmdResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

pub fn load_config() -> CmdResult<AppConfig> {
    Ok(AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?)
}

/// Where stats come from: the CLI flag, else `stats.fixture_path`.
pub fn fixture_path(config: &AppConfig, flag: Option<&Path>) -> Option<PathBuf> {
    flag.map(Path::to_path_buf)
        .or_else(|| config.stats.fixture_path.as_ref().map(PathBuf::from))
}

/// Fixture-backed stats, wrapped with the configured cache and retry policy.
pub fn build_stats(config: &AppConfig, flag: Option<&Path>) -> CmdResult<Arc<dyn StatsBackend>> {
    let path = fixture_path(config, flag)
        .ok_or("No stats source: pass --stats-fixture or set stats.fixture_path in config.toml")?;
    let fixture = FixtureStats::from_path(&path)?;

    let delays = config
        .stats
        .retry_delays_ms
        .iter()
        .map(|ms| Duration::from_millis(*ms))
        .collect();
    let policy = RetryPolicy::new(config.stats.retry_attempts, delays);
    let ttl = Duration::from_secs(config.stats.cache_ttl_secs);

    Ok(Arc::new(CachedStats::new(fixture, ttl, policy)))
}

pub fn build_analyzer(config: &AppConfig, stats: Arc<dyn StatsBackend>) -> CmdResult<TakeAnalyzer> {
    let provider = legm_providers::build_from_config(config)?;
    let tools = Arc::new(legm_tools::stats_registry(stats));
    Ok(TakeAnalyzer::from_config(provider, tools, config)
        .with_call_timeout(Duration::from_secs(config.llm.request_timeout_secs)))
}
