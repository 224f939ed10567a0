//! In-memory take repository, for tests and throwaway runs.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{Datelike, Utc};
use legm_core::analysis::TakeAnalysis;
use legm_core::error::RepositoryError;
use legm_core::repository::{TakeRecord, TakeRepository, TweetRecord};
use tokio::sync::RwLock;
use uuid::Uuid;

/// Build a new take record with a fresh ID.
pub(crate) fn new_take_record(
    take_text: &str,
    analysis: &TakeAnalysis,
    source_tweet_id: Option<&str>,
) -> TakeRecord {
    TakeRecord {
        id: Uuid::new_v4().to_string(),
        take_text: take_text.to_string(),
        verdict: analysis.verdict.clone(),
        confidence: analysis.confidence,
        roast: analysis.roast.clone(),
        reasoning: analysis.reasoning.clone(),
        stats_used: analysis.stats_used.clone(),
        source_tweet_id: source_tweet_id.map(str::to_string),
        created_at: Utc::now(),
    }
}

/// Replies posted in the current UTC calendar month.
pub(crate) fn count_this_month(tweets: &[TweetRecord]) -> u32 {
    let now = Utc::now();
    tweets
        .iter()
        .filter(|t| t.posted_at.year() == now.year() && t.posted_at.month() == now.month())
        .count() as u32
}

/// Keeps takes, posted replies and bot state in process memory.
pub struct InMemoryTakeRepository {
    takes: RwLock<Vec<TakeRecord>>,
    tweets: RwLock<Vec<TweetRecord>>,
    config: RwLock<HashMap<String, String>>,
}

impl InMemoryTakeRepository {
    pub fn new() -> Self {
        Self {
            takes: RwLock::new(Vec::new()),
            tweets: RwLock::new(Vec::new()),
            config: RwLock::new(HashMap::new()),
        }
    }

    /// All stored takes, oldest first.
    pub async fn takes(&self) -> Vec<TakeRecord> {
        self.takes.read().await.clone()
    }

    /// All recorded replies, oldest first.
    pub async fn tweets(&self) -> Vec<TweetRecord> {
        self.tweets.read().await.clone()
    }
}

impl Default for InMemoryTakeRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TakeRepository for InMemoryTakeRepository {
    async fn create_take(
        &self,
        take_text: &str,
        analysis: &TakeAnalysis,
        source_tweet_id: Option<&str>,
    ) -> Result<TakeRecord, RepositoryError> {
        let record = new_take_record(take_text, analysis, source_tweet_id);
        self.takes.write().await.push(record.clone());
        Ok(record)
    }

    async fn record_tweet(&self, tweet: TweetRecord) -> Result<(), RepositoryError> {
        self.tweets.write().await.push(tweet);
        Ok(())
    }

    async fn count_tweets_this_month(&self) -> Result<u32, RepositoryError> {
        Ok(count_this_month(&self.tweets.read().await))
    }

    async fn get_config(&self, key: &str) -> Result<Option<String>, RepositoryError> {
        Ok(self.config.read().await.get(key).cloned())
    }

    async fn set_config(&self, key: &str, value: &str) -> Result<(), RepositoryError> {
        self.config
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}
