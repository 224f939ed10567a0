//! Team tools: standings and a single team's record.

use std::sync::Arc;

use async_trait::async_trait;
use legm_core::error::ToolError;
use legm_core::stats::StatsBackend;
use legm_core::tool::Tool;

use crate::{opt_str, req_str, to_json};

pub struct StandingsTool {
    stats: Arc<dyn StatsBackend>,
}

impl StandingsTool {
    pub fn new(stats: Arc<dyn StatsBackend>) -> Self {
        Self { stats }
    }
}

#[async_trait]
impl Tool for StandingsTool {
    fn name(&self) -> &str {
        "get_team_standings"
    }

    fn description(&self) -> &str {
        "Get current NBA standings. Optionally filter by conference. \
         Returns wins, losses, win%, rank, streak."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "conference": {
                    "type": "string",
                    "description": "Filter by 'East' or 'West'. Omit for both."
                }
            },
            "required": []
        })
    }

    async fn execute(&self, arguments: &serde_json::Value) -> Result<serde_json::Value, ToolError> {
        let conference = opt_str(arguments, "conference")?;
        let standings = self.stats.standings(conference).await?;
        to_json(&standings)
    }
}

pub struct TeamRecordTool {
    stats: Arc<dyn StatsBackend>,
}

impl TeamRecordTool {
    pub fn new(stats: Arc<dyn StatsBackend>) -> Self {
        Self { stats }
    }
}

#[async_trait]
impl Tool for TeamRecordTool {
    fn name(&self) -> &str {
        "get_team_record"
    }

    fn description(&self) -> &str {
        "Get a single team's record and standing. \
         Use substring matching (e.g. 'Lakers', 'Celtics')."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "team_name": {
                    "type": "string",
                    "description": "Team name or partial name (e.g. 'Lakers')"
                }
            },
            "required": ["team_name"]
        })
    }

    async fn execute(&self, arguments: &serde_json::Value) -> Result<serde_json::Value, ToolError> {
        let team_name = req_str(arguments, "team_name")?;
        let record = self.stats.team_record(team_name).await?;
        to_json(&record)
    }
}
