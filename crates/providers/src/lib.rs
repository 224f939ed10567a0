//! Model gateway backends for LeGM.
//!
//! Both providers implement `legm_core::Provider` and map their native
//! responses into the unified `ProviderResponse`. The factory picks one
//! based on configuration.

pub mod anthropic;
pub mod openai_compat;
pub mod router;

pub use anthropic::AnthropicProvider;
pub use openai_compat::OpenAiCompatProvider;
pub use router::build_from_config;

use legm_core::error::ProviderError;

/// Map a reqwest send failure, keeping timeouts distinct.
pub(crate) fn map_send_error(e: reqwest::Error) -> ProviderError {
    if e.is_timeout() {
        ProviderError::Timeout(e.to_string())
    } else {
        ProviderError::Network(e.to_string())
    }
}
