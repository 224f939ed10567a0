//! Player stat tools: season averages, recent games, comparison, advanced.

use std::sync::Arc;

use async_trait::async_trait;
use legm_core::error::ToolError;
use legm_core::stats::StatsBackend;
use legm_core::tool::Tool;

use crate::{opt_str, req_str, to_json};

const DEFAULT_LAST_N: usize = 10;

pub struct SeasonAveragesTool {
    stats: Arc<dyn StatsBackend>,
}

impl SeasonAveragesTool {
    pub fn new(stats: Arc<dyn StatsBackend>) -> Self {
        Self { stats }
    }
}

#[async_trait]
impl Tool for SeasonAveragesTool {
    fn name(&self) -> &str {
        "get_player_season_averages"
    }

    fn description(&self) -> &str {
        "Get a player's per-game averages for a given season. \
         Returns points, rebounds, assists, shooting percentages, etc."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "player_name": {
                    "type": "string",
                    "description": "Full name of the NBA player (e.g. 'LeBron James')"
                },
                "season": {
                    "type": "string",
                    "description": "Season string like '2024-25'. Omit for current."
                }
            },
            "required": ["player_name"]
        })
    }

    async fn execute(&self, arguments: &serde_json::Value) -> Result<serde_json::Value, ToolError> {
        let player_name = req_str(arguments, "player_name")?;
        let season = opt_str(arguments, "season")?;
        let stats = self.stats.season_averages(player_name, season).await?;
        to_json(&stats)
    }
}

pub struct RecentGamesTool {
    stats: Arc<dyn StatsBackend>,
}

impl RecentGamesTool {
    pub fn new(stats: Arc<dyn StatsBackend>) -> Self {
        Self { stats }
    }
}

#[async_trait]
impl Tool for RecentGamesTool {
    fn name(&self) -> &str {
        "get_player_recent_games"
    }

    fn description(&self) -> &str {
        "Get a player's most recent game logs. \
         Returns date, matchup, points, rebounds, assists, etc. for each game."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "player_name": {
                    "type": "string",
                    "description": "Full name of the NBA player"
                },
                "last_n": {
                    "type": "integer",
                    "description": "Number of recent games to fetch (default 10)"
                }
            },
            "required": ["player_name"]
        })
    }

    async fn execute(&self, arguments: &serde_json::Value) -> Result<serde_json::Value, ToolError> {
        let player_name = req_str(arguments, "player_name")?;
        let last_n = match arguments.get("last_n") {
            None | Some(serde_json::Value::Null) => DEFAULT_LAST_N,
            Some(v) => v.as_u64().map(|n| n as usize).ok_or_else(|| {
                ToolError::InvalidArguments(format!("'last_n' must be a non-negative integer, got {v}"))
            })?,
        };
        let games = self.stats.recent_games(player_name, last_n).await?;
        to_json(&games)
    }
}

pub struct ComparisonTool {
    stats: Arc<dyn StatsBackend>,
}

impl ComparisonTool {
    pub fn new(stats: Arc<dyn StatsBackend>) -> Self {
        Self { stats }
    }
}

#[async_trait]
impl Tool for ComparisonTool {
    fn name(&self) -> &str {
        "get_player_comparison"
    }

    fn description(&self) -> &str {
        "Compare two players' season averages side-by-side. \
         Useful for 'Player A vs Player B' takes."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "player_a": {
                    "type": "string",
                    "description": "Full name of the first player"
                },
                "player_b": {
                    "type": "string",
                    "description": "Full name of the second player"
                }
            },
            "required": ["player_a", "player_b"]
        })
    }

    async fn execute(&self, arguments: &serde_json::Value) -> Result<serde_json::Value, ToolError> {
        let player_a = req_str(arguments, "player_a")?;
        let player_b = req_str(arguments, "player_b")?;
        let comparison = self.stats.comparison(player_a, player_b).await?;
        to_json(&comparison)
    }
}

pub struct AdvancedStatsTool {
    stats: Arc<dyn StatsBackend>,
}

impl AdvancedStatsTool {
    pub fn new(stats: Arc<dyn StatsBackend>) -> Self {
        Self { stats }
    }
}

#[async_trait]
impl Tool for AdvancedStatsTool {
    fn name(&self) -> &str {
        "get_player_advanced_stats"
    }

    fn description(&self) -> &str {
        "Get a player's advanced metrics: true shooting % (TS%), usage rate, \
         offensive/defensive/net rating, assist ratio, turnover %, pace, and PIE. \
         Use TS% over FG% for shooting arguments, net rating for impact, usage for volume."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "player_name": {
                    "type": "string",
                    "description": "Full name of the NBA player (e.g. 'LeBron James')"
                },
                "season": {
                    "type": "string",
                    "description": "Season string like '2024-25'. Omit for current."
                }
            },
            "required": ["player_name"]
        })
    }

    async fn execute(&self, arguments: &serde_json::Value) -> Result<serde_json::Value, ToolError> {
        let player_name = req_str(arguments, "player_name")?;
        let season = opt_str(arguments, "season")?;
        let stats = self.stats.advanced_stats(player_name, season).await?;
        to_json(&stats)
    }
}
