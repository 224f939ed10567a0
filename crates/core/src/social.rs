//! SocialClient trait: the abstraction over the posting platform.
//!
//! The bot reads mentions and search results through it and posts replies,
//! optionally with a chart image. Rate limiting on the platform side is the
//! implementation's concern; the bot's own cadence lives in `legm-bot`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::SocialError;

/// A post read from the platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocialPost {
    /// Platform post ID (numeric string on X/Twitter)
    pub id: String,

    pub text: String,

    /// Author identifier
    #[serde(default)]
    pub author_id: String,
}

impl SocialPost {
    pub fn new(id: impl Into<String>, text: impl Into<String>, author_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            author_id: author_id.into(),
        }
    }
}

#[async_trait]
pub trait SocialClient: Send + Sync {
    /// Mentions of the account `user_id` newer than `since_id`.
    async fn get_mentions(
        &self,
        user_id: &str,
        since_id: Option<&str>,
    ) -> Result<Vec<SocialPost>, SocialError>;

    /// Recent posts matching `query`.
    async fn search_recent(
        &self,
        query: &str,
        max_results: u32,
    ) -> Result<Vec<SocialPost>, SocialError>;

    /// Reply with text only. Returns the new post's ID.
    async fn reply(&self, text: &str, in_reply_to: &str) -> Result<String, SocialError>;

    /// Reply with text and an attached image. Returns the new post's ID.
    async fn reply_with_media(
        &self,
        text: &str,
        image: &[u8],
        in_reply_to: &str,
    ) -> Result<String, SocialError>;
}
