//! Shared test doubles for the analysis loop.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use legm_core::chart::{ChartRenderer, ChartSpec};
use legm_core::error::{ChartError, ProviderError, StatsError};
use legm_core::provider::{Provider, ProviderRequest, ProviderResponse};
use legm_core::stats::{
    PlayerAdvancedStats, PlayerGameLog, PlayerSeasonStats, StatsBackend, TeamStanding,
};
use legm_core::tool::ToolCall;

/// A provider that replays scripted results and records every request.
///
/// Panics if more calls are made than results provided.
pub struct ScriptedProvider {
    results: Mutex<Vec<Result<ProviderResponse, ProviderError>>>,
    requests: Mutex<Vec<ProviderRequest>>,
    delay: Option<Duration>,
}

impl ScriptedProvider {
    pub fn new(results: Vec<Result<ProviderResponse, ProviderError>>) -> Self {
        Self {
            results: Mutex::new(results),
            requests: Mutex::new(Vec::new()),
            delay: None,
        }
    }

    /// Sleep before answering each call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<ProviderRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Provider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let call = {
            let mut requests = self.requests.lock().unwrap();
            requests.push(request);
            requests.len() - 1
        };
        let mut results = self.results.lock().unwrap();
        if results.is_empty() {
            panic!("ScriptedProvider: no more responses (call #{call})");
        }
        results.remove(0)
    }
}

pub fn text_response(text: &str) -> ProviderResponse {
    ProviderResponse::text(text)
}

pub fn tool_response(text: &str, calls: Vec<ToolCall>) -> ProviderResponse {
    ProviderResponse::tool_use(text, calls)
}

/// Knows only LeBron James; records every season-averages lookup.
#[derive(Default)]
pub struct MockStats {
    lookups: Mutex<Vec<String>>,
    failure: Option<StatsError>,
}

impl MockStats {
    pub fn failing(error: StatsError) -> Self {
        Self {
            lookups: Mutex::new(Vec::new()),
            failure: Some(error),
        }
    }

    pub fn lookups(&self) -> Vec<String> {
        self.lookups.lock().unwrap().clone()
    }
}

fn not_found(name: &str) -> StatsError {
    StatsError::NotFound(format!(
        "Could not find an NBA player matching '{name}'. Try using their full name (e.g. 'LeBron James')."
    ))
}

#[async_trait]
impl StatsBackend for MockStats {
    async fn season_averages(
        &self,
        player_name: &str,
        season: Option<&str>,
    ) -> Result<PlayerSeasonStats, StatsError> {
        self.lookups.lock().unwrap().push(player_name.to_string());
        if let Some(err) = &self.failure {
            return Err(err.clone());
        }
        if player_name != "LeBron James" {
            return Err(not_found(player_name));
        }
        Ok(PlayerSeasonStats {
            player_name: "LeBron James".into(),
            player_id: 2544,
            season: season.unwrap_or("2024-25").into(),
            team: "LAL".into(),
            games_played: 70,
            mpg: 35.0,
            ppg: 25.0,
            rpg: 7.0,
            apg: 7.0,
            spg: 1.0,
            bpg: 0.5,
            fg_pct: 0.51,
            fg3_pct: 0.38,
            ft_pct: 0.75,
            turnovers: 3.5,
            plus_minus: 2.1,
        })
    }

    async fn advanced_stats(
        &self,
        player_name: &str,
        _season: Option<&str>,
    ) -> Result<PlayerAdvancedStats, StatsError> {
        Err(not_found(player_name))
    }

    async fn recent_games(
        &self,
        player_name: &str,
        _last_n: usize,
    ) -> Result<Vec<PlayerGameLog>, StatsError> {
        Err(not_found(player_name))
    }

    async fn standings(&self, _conference: Option<&str>) -> Result<Vec<TeamStanding>, StatsError> {
        Ok(Vec::new())
    }

    async fn team_record(&self, team_name: &str) -> Result<TeamStanding, StatsError> {
        Err(StatsError::NotFound(format!(
            "Could not find an NBA team matching '{team_name}'."
        )))
    }
}

/// Returns the same outcome for every spec.
pub struct FixedRenderer(pub Result<Vec<u8>, ChartError>);

impl ChartRenderer for FixedRenderer {
    fn render(&self, _spec: &ChartSpec) -> Result<Vec<u8>, ChartError> {
        match &self.0 {
            Ok(bytes) => Ok(bytes.clone()),
            Err(e) => Err(ChartError::RenderFailed(e.to_string())),
        }
    }
}
