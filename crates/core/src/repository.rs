//! TakeRepository trait: persistence of analyzed takes and posted replies.
//!
//! Append-only: takes and tweets are created, never updated. A small
//! key-value store holds bot state such as the last seen mention ID.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::analysis::TakeAnalysis;
use crate::error::RepositoryError;

/// A stored take analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TakeRecord {
    pub id: String,
    pub take_text: String,
    pub verdict: String,
    pub confidence: f64,
    pub roast: String,
    pub reasoning: String,
    pub stats_used: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_tweet_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A reply the bot posted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TweetRecord {
    pub take_id: String,
    pub tweet_id: String,
    /// "reply" for now
    pub tweet_type: String,
    pub content: String,
    pub posted_at: DateTime<Utc>,
}

#[async_trait]
pub trait TakeRepository: Send + Sync {
    /// Store a completed analysis. Returns the stored record with its ID.
    async fn create_take(
        &self,
        take_text: &str,
        analysis: &TakeAnalysis,
        source_tweet_id: Option<&str>,
    ) -> Result<TakeRecord, RepositoryError>;

    async fn record_tweet(&self, tweet: TweetRecord) -> Result<(), RepositoryError>;

    /// Number of tweets posted in the current calendar month (UTC).
    async fn count_tweets_this_month(&self) -> Result<u32, RepositoryError>;

    async fn get_config(&self, key: &str) -> Result<Option<String>, RepositoryError>;

    async fn set_config(&self, key: &str, value: &str) -> Result<(), RepositoryError>;
}
