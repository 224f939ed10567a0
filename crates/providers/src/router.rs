//! Provider factory: selects the model backend named in the config.

use std::sync::Arc;
use std::time::Duration;

use legm_config::{AppConfig, ConfigError, LlmProviderKind};
use legm_core::provider::Provider;
use tracing::info;

use crate::anthropic::AnthropicProvider;
use crate::openai_compat::{OPENAI_BASE_URL, OpenAiCompatProvider};

/// Build the configured provider.
///
/// Fails when the selected provider has no API key, or when
/// `openai_compat` has no base URL.
pub fn build_from_config(config: &AppConfig) -> Result<Arc<dyn Provider>, ConfigError> {
    let llm = &config.llm;
    let api_key = llm
        .active_api_key()
        .filter(|k| !k.trim().is_empty())
        .ok_or(ConfigError::MissingApiKey(llm.provider))?;
    let timeout = Duration::from_secs(llm.request_timeout_secs);

    let provider: Arc<dyn Provider> = match llm.provider {
        LlmProviderKind::Claude => Arc::new(AnthropicProvider::with_timeout(api_key, timeout)),
        LlmProviderKind::Openai => Arc::new(OpenAiCompatProvider::with_timeout(
            "openai",
            OPENAI_BASE_URL,
            api_key,
            timeout,
        )),
        LlmProviderKind::OpenaiCompat => {
            let base_url = llm
                .openai_compat_base_url
                .as_deref()
                .filter(|u| !u.trim().is_empty())
                .ok_or_else(|| {
                    ConfigError::ValidationError(
                        "llm.openai_compat_base_url is required for provider openai_compat"
                            .into(),
                    )
                })?;
            Arc::new(OpenAiCompatProvider::with_timeout(
                "openai_compat",
                base_url,
                api_key,
                timeout,
            ))
        }
    };

    info!(provider = provider.name(), model = %llm.model, "Model provider ready");
    Ok(provider)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn claude_needs_anthropic_key() {
        let config = AppConfig::default();
        let err = build_from_config(&config).err().unwrap();
        assert!(matches!(
            err,
            ConfigError::MissingApiKey(LlmProviderKind::Claude)
        ));
    }

    #[test]
    fn builds_claude() {
        let mut config = AppConfig::default();
        config.llm.anthropic_api_key = Some("sk-ant-test".into());
        let provider = build_from_config(&config).unwrap();
        assert_eq!(provider.name(), "anthropic");
    }

    #[test]
    fn builds_openai() {
        let mut config = AppConfig::default();
        config.llm.provider = LlmProviderKind::Openai;
        config.llm.openai_api_key = Some("sk-test".into());
        let provider = build_from_config(&config).unwrap();
        assert_eq!(provider.name(), "openai");
    }

    #[test]
    fn openai_compat_requires_base_url() {
        let mut config = AppConfig::default();
        config.llm.provider = LlmProviderKind::OpenaiCompat;
        config.llm.openai_compat_api_key = Some("sk-test".into());
        assert!(matches!(
            build_from_config(&config).err().unwrap(),
            ConfigError::ValidationError(_)
        ));

        config.llm.openai_compat_base_url = Some("https://api.deepseek.com/v1".into());
        let provider = build_from_config(&config).unwrap();
        assert_eq!(provider.name(), "openai_compat");
    }

    #[test]
    fn blank_key_counts_as_missing() {
        let mut config = AppConfig::default();
        config.llm.anthropic_api_key = Some("  ".into());
        assert!(build_from_config(&config).is_err());
    }
}
