//! Provider trait: the model gateway abstraction over LLM backends.
//!
//! A Provider takes a conversation, an optional system prompt and the tool
//! declarations, and returns one unified [`ProviderResponse`] regardless of
//! the backend's native wire shape.
//!
//! Implementations: Anthropic Messages API, OpenAI-compatible chat completions.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ProviderError;
use crate::message::Message;
use crate::tool::ToolCall;

/// Configuration for a provider request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderRequest {
    /// The model to use (e.g., "claude-sonnet-4-6", "gpt-4o")
    pub model: String,

    /// The conversation messages
    pub messages: Vec<Message>,

    /// System prompt, sent in whatever position the backend expects
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,

    /// Temperature (0.0 = deterministic, 1.0 = creative)
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum tokens to generate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,

    /// Available tools the model can call
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<ToolDefinition>,
}

fn default_temperature() -> f32 {
    0.7
}

impl ProviderRequest {
    pub fn new(model: impl Into<String>, messages: Vec<Message>) -> Self {
        Self {
            model: model.into(),
            messages,
            system: None,
            temperature: default_temperature(),
            max_tokens: None,
            tools: Vec::new(),
        }
    }
}

/// A tool definition sent to the LLM so it knows what tools it can call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// The tool name
    pub name: String,

    /// Description of what the tool does
    pub description: String,

    /// JSON Schema describing the tool's parameters
    pub parameters: serde_json::Value,
}

/// Why the model stopped generating.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// The model is done; `content` is the final answer.
    EndTurn,
    /// The model wants tools executed before continuing.
    ToolUse,
    /// Any other backend-specific signal (max_tokens, length, content_filter…).
    Other(String),
}

impl StopReason {
    /// Map a backend's native stop signal onto the unified vocabulary.
    ///
    /// `ToolUse` always wins when the response carries at least one tool
    /// call, whatever the native signal said.
    pub fn resolve(native: Option<&str>, has_tool_calls: bool) -> Self {
        if has_tool_calls {
            return StopReason::ToolUse;
        }
        match native {
            None | Some("end_turn") | Some("stop") | Some("stop_sequence") => StopReason::EndTurn,
            Some("tool_use") | Some("tool_calls") => StopReason::ToolUse,
            Some(other) => StopReason::Other(other.to_string()),
        }
    }
}

/// The unified response from any provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderResponse {
    /// Concatenated free-text segments
    pub content: String,

    /// Requested tool invocations, in emission order
    #[serde(default)]
    pub tool_calls: Vec<ToolCall>,

    pub stop_reason: StopReason,

    /// Token usage statistics
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,

    /// Which model actually responded (may differ from requested)
    #[serde(default)]
    pub model: String,
}

impl ProviderResponse {
    /// A final text answer with no tool calls.
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            tool_calls: Vec::new(),
            stop_reason: StopReason::EndTurn,
            usage: None,
            model: String::new(),
        }
    }

    /// A turn requesting tool execution.
    pub fn tool_use(content: impl Into<String>, tool_calls: Vec<ToolCall>) -> Self {
        Self {
            content: content.into(),
            tool_calls,
            stop_reason: StopReason::ToolUse,
            usage: None,
            model: String::new(),
        }
    }

    /// Whether the loop must execute tools before the next round.
    pub fn wants_tools(&self) -> bool {
        !self.tool_calls.is_empty()
    }
}

/// Token usage information.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// The core Provider trait.
///
/// The analysis loop calls `complete()` without knowing which backend is
/// configured. Transport and authentication failures are returned as-is;
/// providers do not retry.
#[async_trait]
pub trait Provider: Send + Sync {
    /// A human-readable name for this provider (e.g., "anthropic", "openai").
    fn name(&self) -> &str;

    /// Send a request and get a complete response.
    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError>;

    /// Health check: can we reach the provider?
    async fn health_check(&self) -> Result<bool, ProviderError> {
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_request_defaults() {
        let req = ProviderRequest::new("gpt-4o", vec![]);
        assert!((req.temperature - 0.7).abs() < f32::EPSILON);
        assert!(req.system.is_none());
        assert!(req.tools.is_empty());
    }

    #[test]
    fn tool_use_takes_precedence_over_native_signal() {
        assert_eq!(StopReason::resolve(Some("end_turn"), true), StopReason::ToolUse);
        assert_eq!(StopReason::resolve(Some("stop"), true), StopReason::ToolUse);
        assert_eq!(StopReason::resolve(None, true), StopReason::ToolUse);
    }

    #[test]
    fn native_signals_map_to_unified_vocabulary() {
        assert_eq!(StopReason::resolve(Some("end_turn"), false), StopReason::EndTurn);
        assert_eq!(StopReason::resolve(Some("stop"), false), StopReason::EndTurn);
        assert_eq!(StopReason::resolve(None, false), StopReason::EndTurn);
        assert_eq!(
            StopReason::resolve(Some("max_tokens"), false),
            StopReason::Other("max_tokens".into())
        );
    }

    #[test]
    fn tool_definition_serialization() {
        let tool = ToolDefinition {
            name: "get_team_record".into(),
            description: "Get a team's record".into(),
            parameters: serde_json::json!({
                "type": "object",
                "properties": {
                    "team_name": { "type": "string" }
                },
                "required": ["team_name"]
            }),
        };
        let json = serde_json::to_string(&tool).unwrap();
        assert!(json.contains("get_team_record"));
        assert!(json.contains("team_name"));
    }

    #[test]
    fn response_constructors() {
        assert!(!ProviderResponse::text("done").wants_tools());
        let call = ToolCall::new("1", "get_team_standings", serde_json::json!({}));
        let resp = ProviderResponse::tool_use("", vec![call]);
        assert!(resp.wants_tools());
        assert_eq!(resp.stop_reason, StopReason::ToolUse);
    }
}
