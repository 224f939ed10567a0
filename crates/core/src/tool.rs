//! Tool trait and the tool calls requested by the model.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ToolError;
use crate::provider::ToolDefinition;

/// A model-requested tool invocation.
///
/// Produced by a [`Provider`](crate::provider::Provider) from its native
/// response and consumed exactly once by the tool registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Opaque, provider-assigned call ID
    pub id: String,

    /// Name of the tool to execute
    pub name: String,

    /// Arguments as a JSON object
    #[serde(default)]
    pub arguments: serde_json::Value,
}

impl ToolCall {
    pub fn new(id: impl Into<String>, name: impl Into<String>, arguments: serde_json::Value) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            arguments,
        }
    }
}

/// A capability the model can invoke.
///
/// Tools are read-only and idempotent; a failed execution is reported back
/// to the model, never to the caller of the analysis.
#[async_trait]
pub trait Tool: Send + Sync {
    /// The wire name the model sees (e.g. "get_team_record").
    fn name(&self) -> &str;

    /// A description of what this tool does (sent to the LLM).
    fn description(&self) -> &str;

    /// JSON Schema describing this tool's parameters.
    fn parameters_schema(&self) -> serde_json::Value;

    /// Execute with the model-supplied arguments.
    async fn execute(&self, arguments: &serde_json::Value) -> Result<serde_json::Value, ToolError>;

    /// Convert this tool into a ToolDefinition for sending to the LLM.
    fn to_definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name().to_string(),
            description: self.description().to_string(),
            parameters: self.parameters_schema(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_arguments_default_to_null() {
        let call: ToolCall = serde_json::from_str(r#"{"id":"1","name":"x"}"#).unwrap();
        assert!(call.arguments.is_null());
    }

    struct EchoTool;

    #[async_trait]
    impl Tool for EchoTool {
        fn name(&self) -> &str {
            "echo"
        }
        fn description(&self) -> &str {
            "Echoes back the input"
        }
        fn parameters_schema(&self) -> serde_json::Value {
            serde_json::json!({"type": "object", "properties": {"text": {"type": "string"}}})
        }
        async fn execute(
            &self,
            arguments: &serde_json::Value,
        ) -> Result<serde_json::Value, ToolError> {
            Ok(arguments.clone())
        }
    }

    #[test]
    fn tool_to_definition() {
        let def = EchoTool.to_definition();
        assert_eq!(def.name, "echo");
        assert_eq!(def.description, "Echoes back the input");
        assert_eq!(def.parameters["type"], "object");
    }

    #[tokio::test]
    async fn tool_execute_echoes() {
        let out = EchoTool
            .execute(&serde_json::json!({"text": "hi"}))
            .await
            .unwrap();
        assert_eq!(out["text"], "hi");
    }
}
