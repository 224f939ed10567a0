//! The take analysis loop.
//!
//! Sends the take to the model together with the stats tools, executes
//! whatever tools the model asks for, feeds the results back, and parses the
//! final answer:
//!
//! ```text
//! AWAITING_MODEL ──tool calls──▶ TOOLS_EXECUTING ──results──▶ AWAITING_MODEL
//!        │
//!        └──final text──▶ parse ──▶ (render chart) ──▶ DONE
//! ```
//!
//! The number of model rounds is bounded. Model failures propagate to the
//! caller; tool failures are reported to the model as error payloads.

use std::sync::Arc;
use std::time::Duration;

use legm_config::AppConfig;
use legm_core::analysis::TakeAnalysis;
use legm_core::chart::ChartRenderer;
use legm_core::error::ProviderError;
use legm_core::message::{Conversation, Message};
use legm_core::provider::{Provider, ProviderRequest, ProviderResponse};
use legm_tools::ToolRegistry;
use tracing::{debug, info, warn};

use crate::parser::parse_analysis;
use crate::prompt::SYSTEM_PROMPT;

/// Rounds per analysis unless configured otherwise.
pub const DEFAULT_MAX_ROUNDS: u32 = 4;
/// One tool round plus one answer round.
const MIN_ROUNDS: u32 = 2;
const DEFAULT_MAX_TOKENS: u32 = 1024;
const DEFAULT_TEMPERATURE: f32 = 0.7;

pub struct TakeAnalyzer {
    provider: Arc<dyn Provider>,
    tools: Arc<ToolRegistry>,
    model: String,
    max_tokens: u32,
    temperature: f32,
    max_rounds: u32,
    call_timeout: Option<Duration>,
    chart_renderer: Option<Arc<dyn ChartRenderer>>,
}

impl TakeAnalyzer {
    pub fn new(
        provider: Arc<dyn Provider>,
        tools: Arc<ToolRegistry>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            tools,
            model: model.into(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            max_rounds: DEFAULT_MAX_ROUNDS,
            call_timeout: None,
            chart_renderer: None,
        }
    }

    /// Model, sampling and round settings from the application config.
    pub fn from_config(
        provider: Arc<dyn Provider>,
        tools: Arc<ToolRegistry>,
        config: &AppConfig,
    ) -> Self {
        Self::new(provider, tools, &config.llm.model)
            .with_max_tokens(config.llm.max_tokens)
            .with_temperature(config.llm.temperature)
            .with_max_rounds(config.agent.max_rounds)
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Bound the number of model calls. Values below 2 are raised to 2.
    pub fn with_max_rounds(mut self, max_rounds: u32) -> Self {
        self.max_rounds = max_rounds.max(MIN_ROUNDS);
        self
    }

    /// Fail a model call with [`ProviderError::Timeout`] after `timeout`.
    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = Some(timeout);
        self
    }

    pub fn with_chart_renderer(mut self, renderer: Arc<dyn ChartRenderer>) -> Self {
        self.chart_renderer = Some(renderer);
        self
    }

    pub fn max_rounds(&self) -> u32 {
        self.max_rounds
    }

    /// Analyze one take.
    pub async fn analyze(&self, take_text: &str) -> Result<TakeAnalysis, ProviderError> {
        let mut conversation = Conversation::new();
        conversation.push(Message::user(take_text));
        let tool_definitions = self.tools.definitions();

        info!(conversation_id = %conversation.id, model = %self.model, "Analyzing take");

        let mut round = 0;
        let final_content = loop {
            round += 1;
            debug!(conversation_id = %conversation.id, round, "Calling model");

            let mut request = ProviderRequest::new(&self.model, conversation.messages.clone());
            request.system = Some(SYSTEM_PROMPT.to_string());
            request.tools = tool_definitions.clone();
            request.max_tokens = Some(self.max_tokens);
            request.temperature = self.temperature;

            let response = self.call_model(request).await?;

            if !response.wants_tools() {
                break response.content;
            }

            if round >= self.max_rounds {
                warn!(
                    conversation_id = %conversation.id,
                    rounds = round,
                    pending_tools = response.tool_calls.len(),
                    "Round limit reached while the model still wants tools"
                );
                break response.content;
            }

            debug!(
                conversation_id = %conversation.id,
                tool_count = response.tool_calls.len(),
                "Executing tool calls"
            );

            let ProviderResponse {
                content, tool_calls, ..
            } = response;
            conversation.push(Message::assistant_with_tools(content, tool_calls.clone()));

            for call in &tool_calls {
                let payload = self.tools.dispatch(call).await;
                conversation.push(Message::tool_result(&call.id, payload));
            }
        };

        let mut analysis = parse_analysis(&final_content);

        if let (Some(spec), Some(renderer)) = (&analysis.chart_data, &self.chart_renderer) {
            match renderer.render(spec) {
                Ok(png) => analysis.chart_png = Some(png),
                Err(e) => warn!(error = %e, title = %spec.title, "Chart render failed"),
            }
        }

        info!(
            conversation_id = %conversation.id,
            rounds = round,
            verdict = %analysis.verdict,
            confidence = analysis.confidence,
            has_chart = analysis.chart_png.is_some(),
            "Take analyzed"
        );

        Ok(analysis)
    }

    async fn call_model(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        match self.call_timeout {
            Some(limit) => tokio::time::timeout(limit, self.provider.complete(request))
                .await
                .map_err(|_| {
                    ProviderError::Timeout(format!("model call exceeded {}s", limit.as_secs_f64()))
                })?,
            None => self.provider.complete(request).await,
        }
    }
}
