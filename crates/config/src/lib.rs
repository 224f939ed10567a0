//! Configuration loading, validation, and management for LeGM.
//!
//! Loads configuration from `~/.legm/config.toml` with environment
//! variable overrides. Validates all settings at startup.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Which model backend to talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LlmProviderKind {
    /// Anthropic Messages API
    Claude,
    /// api.openai.com
    Openai,
    /// Any OpenAI-compatible endpoint (DeepSeek, Groq, vLLM…)
    OpenaiCompat,
}

impl std::str::FromStr for LlmProviderKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "claude" | "anthropic" => Ok(Self::Claude),
            "openai" => Ok(Self::Openai),
            "openai_compat" | "openai-compat" => Ok(Self::OpenaiCompat),
            other => Err(ConfigError::ValidationError(format!(
                "Unknown LLM provider: {other:?}"
            ))),
        }
    }
}

/// The root configuration structure.
///
/// Maps directly to `~/.legm/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub llm: LlmConfig,

    #[serde(default)]
    pub agent: AgentConfig,

    #[serde(default)]
    pub bot: BotConfig,

    #[serde(default)]
    pub stats: StatsConfig,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default = "default_llm_provider")]
    pub provider: LlmProviderKind,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anthropic_api_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub openai_api_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub openai_compat_api_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub openai_compat_base_url: Option<String>,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Per-request HTTP timeout for model calls
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_llm_provider() -> LlmProviderKind {
    LlmProviderKind::Claude
}
fn default_model() -> String {
    "claude-sonnet-4-6".into()
}
fn default_max_tokens() -> u32 {
    1024
}
fn default_temperature() -> f32 {
    0.7
}
fn default_request_timeout() -> u64 {
    120
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: default_llm_provider(),
            model: default_model(),
            anthropic_api_key: None,
            openai_api_key: None,
            openai_compat_api_key: None,
            openai_compat_base_url: None,
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl LlmConfig {
    /// The API key for the selected provider, if any.
    pub fn active_api_key(&self) -> Option<&str> {
        match self.provider {
            LlmProviderKind::Claude => self.anthropic_api_key.as_deref(),
            LlmProviderKind::Openai => self.openai_api_key.as_deref(),
            LlmProviderKind::OpenaiCompat => self.openai_compat_api_key.as_deref(),
        }
    }
}

/// Redact a secret string for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmConfig")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("anthropic_api_key", &redact(&self.anthropic_api_key))
            .field("openai_api_key", &redact(&self.openai_api_key))
            .field("openai_compat_api_key", &redact(&self.openai_compat_api_key))
            .field("openai_compat_base_url", &self.openai_compat_base_url)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Model rounds per analysis, tool rounds included
    #[serde(default = "default_max_rounds")]
    pub max_rounds: u32,
}

fn default_max_rounds() -> u32 {
    4
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_rounds: default_max_rounds(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotConfig {
    /// Platform user ID of the bot account
    #[serde(default)]
    pub user_id: String,

    /// Seconds between mention polls
    #[serde(default = "default_mention_poll")]
    pub mention_poll_interval_secs: u64,

    /// Seconds between search polls
    #[serde(default = "default_search_poll")]
    pub search_poll_interval_secs: u64,

    #[serde(default = "default_max_daily_proactive")]
    pub max_daily_proactive: u32,

    #[serde(default = "default_monthly_budget")]
    pub monthly_budget: u32,

    /// Posts allowed per sliding window
    #[serde(default = "default_max_per_window")]
    pub max_per_window: u32,

    #[serde(default = "default_window_secs")]
    pub window_secs: u64,

    /// Log actions without posting
    #[serde(default)]
    pub dry_run: bool,

    #[serde(default)]
    pub proactive_enabled: bool,

    #[serde(default = "default_search_query")]
    pub search_query: String,

    #[serde(default)]
    pub blocked_accounts: Vec<String>,
}

fn default_mention_poll() -> u64 {
    60
}
fn default_search_poll() -> u64 {
    300
}
fn default_max_daily_proactive() -> u32 {
    20
}
fn default_monthly_budget() -> u32 {
    450
}
fn default_max_per_window() -> u32 {
    15
}
fn default_window_secs() -> u64 {
    900
}
fn default_search_query() -> String {
    "NBA take -is:retweet -is:reply lang:en".into()
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            user_id: String::new(),
            mention_poll_interval_secs: default_mention_poll(),
            search_poll_interval_secs: default_search_poll(),
            max_daily_proactive: default_max_daily_proactive(),
            monthly_budget: default_monthly_budget(),
            max_per_window: default_max_per_window(),
            window_secs: default_window_secs(),
            dry_run: false,
            proactive_enabled: false,
            search_query: default_search_query(),
            blocked_accounts: vec![],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsConfig {
    /// Time-to-live for cached stats lookups
    #[serde(default = "default_cache_ttl")]
    pub cache_ttl_secs: u64,

    /// Attempts per stats request, first try included
    #[serde(default = "default_retry_attempts")]
    pub retry_attempts: u32,

    /// Delay schedule between attempts, in milliseconds
    #[serde(default = "default_retry_delays")]
    pub retry_delays_ms: Vec<u64>,

    /// JSON fixture for the offline stats backend
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixture_path: Option<String>,
}

fn default_cache_ttl() -> u64 {
    3600
}
fn default_retry_attempts() -> u32 {
    2
}
fn default_retry_delays() -> Vec<u64> {
    vec![1000, 3000]
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            cache_ttl_secs: default_cache_ttl(),
            retry_attempts: default_retry_attempts(),
            retry_delays_ms: default_retry_delays(),
            fixture_path: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from the default path (~/.legm/config.toml),
    /// then apply environment overrides:
    /// - `LEGM_LLM_PROVIDER`, `LEGM_LLM_MODEL`
    /// - `ANTHROPIC_API_KEY`, `OPENAI_API_KEY`
    /// - `OPENAI_COMPAT_API_KEY`, `OPENAI_COMPAT_BASE_URL`
    /// - `LEGM_DRY_RUN`
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        let mut config = Self::load_from(&config_path)?;
        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from an environment lookup. Env values win over the file.
    pub fn apply_env(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(provider) = lookup("LEGM_LLM_PROVIDER") {
            self.llm.provider = provider.parse()?;
        }
        if let Some(model) = lookup("LEGM_LLM_MODEL") {
            self.llm.model = model;
        }
        if let Some(key) = lookup("ANTHROPIC_API_KEY") {
            self.llm.anthropic_api_key = Some(key);
        }
        if let Some(key) = lookup("OPENAI_API_KEY") {
            self.llm.openai_api_key = Some(key);
        }
        if let Some(key) = lookup("OPENAI_COMPAT_API_KEY") {
            self.llm.openai_compat_api_key = Some(key);
        }
        if let Some(url) = lookup("OPENAI_COMPAT_BASE_URL") {
            self.llm.openai_compat_base_url = Some(url);
        }
        if let Some(flag) = lookup("LEGM_DRY_RUN") {
            self.bot.dry_run = matches!(flag.to_ascii_lowercase().as_str(), "1" | "true" | "yes");
        }
        Ok(())
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".legm")
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.llm.temperature < 0.0 || self.llm.temperature > 2.0 {
            return Err(ConfigError::ValidationError(
                "llm.temperature must be between 0.0 and 2.0".into(),
            ));
        }

        if self.llm.request_timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "llm.request_timeout_secs must be > 0".into(),
            ));
        }

        if self.agent.max_rounds < 2 {
            return Err(ConfigError::ValidationError(
                "agent.max_rounds must be at least 2".into(),
            ));
        }

        if self.bot.max_per_window == 0 || self.bot.window_secs == 0 {
            return Err(ConfigError::ValidationError(
                "bot.max_per_window and bot.window_secs must be > 0".into(),
            ));
        }

        if self.stats.retry_attempts == 0 {
            return Err(ConfigError::ValidationError(
                "stats.retry_attempts must be at least 1".into(),
            ));
        }

        Ok(())
    }

    /// Generate a default config TOML string (for the `config` command).
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),

    #[error("Missing API key for provider {0:?}")]
    MissingApiKey(LlmProviderKind),
}
