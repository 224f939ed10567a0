//! Stats tools for the LeGM analysis loop.
//!
//! Six read-only tools over a [`StatsBackend`]. The registry hands their
//! definitions to the model and dispatches the model's tool calls, always
//! answering with a JSON string: the result on success, `{"error": …}`
//! otherwise. Dispatch never fails.

pub mod player;
pub mod team;

use std::sync::Arc;

use legm_core::error::{StatsError, ToolError};
use legm_core::provider::ToolDefinition;
use legm_core::stats::StatsBackend;
use legm_core::tool::{Tool, ToolCall};
use tracing::{debug, warn};

/// An ordered set of tools, looked up by name.
///
/// Registration order is the order of [`definitions`](Self::definitions).
pub struct ToolRegistry {
    tools: Vec<Box<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self { tools: Vec::new() }
    }

    /// Register a tool. Replaces any existing tool with the same name in place.
    pub fn register(&mut self, tool: Box<dyn Tool>) {
        match self.tools.iter_mut().find(|t| t.name() == tool.name()) {
            Some(slot) => *slot = tool,
            None => self.tools.push(tool),
        }
    }

    pub fn get(&self, name: &str) -> Option<&dyn Tool> {
        self.tools.iter().find(|t| t.name() == name).map(|t| t.as_ref())
    }

    /// All tool definitions (for sending to the LLM), in stable order.
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.iter().map(|t| t.to_definition()).collect()
    }

    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Execute a tool call and render the outcome as a JSON string.
    ///
    /// - unknown tool: `{"error": "Unknown tool: <name>"}`
    /// - name resolution failure: `{"error": "<message>"}`
    /// - anything else: `{"error": "Stats API error: <message>"}`
    pub async fn dispatch(&self, call: &ToolCall) -> String {
        let Some(tool) = self.get(&call.name) else {
            warn!(tool = %call.name, "Model requested unknown tool");
            return error_payload(&ToolError::NotFound(call.name.clone()).to_string());
        };

        debug!(tool = %call.name, call_id = %call.id, arguments = %call.arguments, "Dispatching tool call");

        match tool.execute(&call.arguments).await {
            Ok(value) => value.to_string(),
            Err(ToolError::Stats(StatsError::NotFound(message))) => {
                debug!(tool = %call.name, %message, "Stats lookup found nothing");
                error_payload(&message)
            }
            Err(e) => {
                warn!(tool = %call.name, error = %e, "Tool execution failed");
                error_payload(&format!("Stats API error: {e}"))
            }
        }
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Registry with all six stats tools bound to `stats`.
pub fn stats_registry(stats: Arc<dyn StatsBackend>) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(Box::new(player::SeasonAveragesTool::new(stats.clone())));
    registry.register(Box::new(player::RecentGamesTool::new(stats.clone())));
    registry.register(Box::new(player::ComparisonTool::new(stats.clone())));
    registry.register(Box::new(player::AdvancedStatsTool::new(stats.clone())));
    registry.register(Box::new(team::StandingsTool::new(stats.clone())));
    registry.register(Box::new(team::TeamRecordTool::new(stats)));
    registry
}

fn error_payload(message: &str) -> String {
    serde_json::json!({ "error": message }).to_string()
}

/// Required string argument.
pub(crate) fn req_str<'a>(args: &'a serde_json::Value, key: &str) -> Result<&'a str, ToolError> {
    args.get(key)
        .and_then(|v| v.as_str())
        .ok_or_else(|| ToolError::InvalidArguments(format!("missing string argument '{key}'")))
}

/// Optional string argument; absent and null both mean `None`.
pub(crate) fn opt_str<'a>(
    args: &'a serde_json::Value,
    key: &str,
) -> Result<Option<&'a str>, ToolError> {
    match args.get(key) {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(v) => v
            .as_str()
            .map(Some)
            .ok_or_else(|| ToolError::InvalidArguments(format!("'{key}' must be a string"))),
    }
}

pub(crate) fn to_json<T: serde::Serialize>(value: &T) -> Result<serde_json::Value, ToolError> {
    serde_json::to_value(value).map_err(|e| StatsError::InvalidData(e.to_string()).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use legm_core::stats::*;
    use std::sync::Mutex;

    /// Records every call; resolves only "LeBron James" and "Lakers".
    #[derive(Default)]
    struct MockStats {
        calls: Mutex<Vec<String>>,
    }

    impl MockStats {
        fn record(&self, call: String) {
            self.calls.lock().unwrap().push(call);
        }
    }

    fn lebron(season: &str) -> PlayerSeasonStats {
        PlayerSeasonStats {
            player_name: "LeBron James".into(),
            player_id: 2544,
            season: season.into(),
            team: "LAL".into(),
            games_played: 71,
            mpg: 35.3,
            ppg: 25.7,
            rpg: 7.3,
            apg: 8.3,
            spg: 1.3,
            bpg: 0.5,
            fg_pct: 0.540,
            fg3_pct: 0.410,
            ft_pct: 0.750,
            turnovers: 3.5,
            plus_minus: 2.1,
        }
    }

    fn lakers() -> TeamStanding {
        TeamStanding {
            team_name: "Los Angeles Lakers".into(),
            team_id: 1610612747,
            conference: "West".into(),
            wins: 47,
            losses: 35,
            win_pct: 0.573,
            conference_rank: 8,
            streak: "W1".into(),
            last_10: "6-4".into(),
        }
    }

    fn not_found(name: &str) -> StatsError {
        StatsError::NotFound(format!("Could not find an NBA player matching '{name}'."))
    }

    #[async_trait]
    impl StatsBackend for MockStats {
        async fn season_averages(
            &self,
            player_name: &str,
            season: Option<&str>,
        ) -> Result<PlayerSeasonStats, StatsError> {
            self.record(format!("season_averages:{player_name}:{season:?}"));
            match player_name {
                "LeBron James" => Ok(lebron(season.unwrap_or("2024-25"))),
                "Timeout Guy" => Err(StatsError::Transport("read timed out".into())),
                other => Err(not_found(other)),
            }
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
            last_n: usize,
        ) -> Result<Vec<PlayerGameLog>, StatsError> {
            self.record(format!("recent_games:{player_name}:{last_n}"));
            Ok(vec![])
        }

        async fn standings(
            &self,
            conference: Option<&str>,
        ) -> Result<Vec<TeamStanding>, StatsError> {
            self.record(format!("standings:{conference:?}"));
            Ok(vec![lakers()])
        }

        async fn team_record(&self, team_name: &str) -> Result<TeamStanding, StatsError> {
            if team_name == "Lakers" {
                Ok(lakers())
            } else {
                Err(StatsError::NotFound(format!(
                    "Could not find a team matching '{team_name}'."
                )))
            }
        }
    }

    fn setup() -> (Arc<MockStats>, ToolRegistry) {
        let stats = Arc::new(MockStats::default());
        let registry = stats_registry(stats.clone());
        (stats, registry)
    }

    fn call(name: &str, args: serde_json::Value) -> ToolCall {
        ToolCall::new("call_1", name, args)
    }

    fn parse(payload: &str) -> serde_json::Value {
        serde_json::from_str(payload).expect("dispatch must return valid JSON")
    }

    #[test]
    fn definitions_are_stable_and_complete() {
        let (_, registry) = setup();
        let names: Vec<String> = registry.definitions().into_iter().map(|d| d.name).collect();
        assert_eq!(
            names,
            vec![
                "get_player_season_averages",
                "get_player_recent_games",
                "get_player_comparison",
                "get_player_advanced_stats",
                "get_team_standings",
                "get_team_record",
            ]
        );
        for def in registry.definitions() {
            assert_eq!(def.parameters["type"], "object");
            assert!(!def.description.is_empty());
        }
    }

    #[test]
    fn register_replaces_in_place() {
        let (stats, mut registry) = setup();
        registry.register(Box::new(player::SeasonAveragesTool::new(stats)));
        assert_eq!(registry.len(), 6);
        assert_eq!(registry.names()[0], "get_player_season_averages");
    }

    #[tokio::test]
    async fn season_averages_success() {
        let (stats, registry) = setup();
        let out = registry
            .dispatch(&call(
                "get_player_season_averages",
                serde_json::json!({"player_name": "LeBron James", "season": "2023-24"}),
            ))
            .await;
        let value = parse(&out);
        assert_eq!(value["ppg"], 25.7);
        assert_eq!(value["season"], "2023-24");
        assert_eq!(
            stats.calls.lock().unwrap()[0],
            "season_averages:LeBron James:Some(\"2023-24\")"
        );
    }

    #[tokio::test]
    async fn season_omitted_means_none() {
        let (stats, registry) = setup();
        registry
            .dispatch(&call(
                "get_player_season_averages",
                serde_json::json!({"player_name": "LeBron James"}),
            ))
            .await;
        assert_eq!(stats.calls.lock().unwrap()[0], "season_averages:LeBron James:None");
    }

    #[tokio::test]
    async fn recent_games_defaults_to_ten() {
        let (stats, registry) = setup();
        let out = registry
            .dispatch(&call(
                "get_player_recent_games",
                serde_json::json!({"player_name": "LeBron James"}),
            ))
            .await;
        assert_eq!(parse(&out), serde_json::json!([]));
        assert_eq!(stats.calls.lock().unwrap()[0], "recent_games:LeBron James:10");
    }

    #[tokio::test]
    async fn list_results_are_arrays() {
        let (stats, registry) = setup();
        let out = registry
            .dispatch(&call(
                "get_team_standings",
                serde_json::json!({"conference": "West"}),
            ))
            .await;
        let value = parse(&out);
        assert!(value.is_array());
        assert_eq!(value[0]["team_name"], "Los Angeles Lakers");
        assert_eq!(stats.calls.lock().unwrap()[0], "standings:Some(\"West\")");
    }

    #[tokio::test]
    async fn comparison_returns_both_players() {
        let (_, registry) = setup();
        let out = registry
            .dispatch(&call(
                "get_player_comparison",
                serde_json::json!({"player_a": "LeBron James", "player_b": "LeBron James"}),
            ))
            .await;
        let value = parse(&out);
        assert_eq!(value["player_a"]["player_id"], 2544);
        assert_eq!(value["player_b"]["player_id"], 2544);
    }

    #[tokio::test]
    async fn unknown_tool_is_reported() {
        let (_, registry) = setup();
        let out = registry
            .dispatch(&call("get_weather", serde_json::json!({})))
            .await;
        assert_eq!(parse(&out), serde_json::json!({"error": "Unknown tool: get_weather"}));
    }

    #[tokio::test]
    async fn resolution_error_passes_message_through() {
        let (_, registry) = setup();
        let out = registry
            .dispatch(&call(
                "get_team_record",
                serde_json::json!({"team_name": "Sonics"}),
            ))
            .await;
        assert_eq!(
            parse(&out),
            serde_json::json!({"error": "Could not find a team matching 'Sonics'."})
        );
    }

    #[tokio::test]
    async fn transport_error_is_wrapped() {
        let (_, registry) = setup();
        let out = registry
            .dispatch(&call(
                "get_player_season_averages",
                serde_json::json!({"player_name": "Timeout Guy"}),
            ))
            .await;
        let value = parse(&out);
        let message = value["error"].as_str().unwrap();
        assert!(message.starts_with("Stats API error: "));
        assert!(message.contains("read timed out"));
    }

    #[tokio::test]
    async fn missing_argument_is_stats_api_error() {
        let (stats, registry) = setup();
        let out = registry
            .dispatch(&call("get_player_comparison", serde_json::json!({"player_a": "x"})))
            .await;
        let message = parse(&out)["error"].as_str().unwrap().to_string();
        assert!(message.starts_with("Stats API error: "));
        assert!(message.contains("player_b"));
        assert!(stats.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn ill_typed_argument_is_stats_api_error() {
        let (_, registry) = setup();
        let out = registry
            .dispatch(&call(
                "get_player_recent_games",
                serde_json::json!({"player_name": "LeBron James", "last_n": "five"}),
            ))
            .await;
        assert!(parse(&out)["error"]
            .as_str()
            .unwrap()
            .starts_with("Stats API error: "));
    }

    #[tokio::test]
    async fn null_arguments_are_tolerated_for_optional_only() {
        let (_, registry) = setup();
        let out = registry
            .dispatch(&call("get_team_standings", serde_json::Value::Null))
            .await;
        assert!(parse(&out).is_array());

        let out = registry
            .dispatch(&call("get_team_record", serde_json::Value::Null))
            .await;
        assert!(parse(&out)["error"].is_string());
    }
}
