//! File-backed take repository: one JSON document on disk.
//!
//! The whole store is loaded on open and rewritten after every mutation, so
//! the monthly post count and the mention cursor survive restarts.
//!
//! Storage location: `~/.legm/data/legm.json`

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use legm_config::AppConfig;
use legm_core::analysis::TakeAnalysis;
use legm_core::error::RepositoryError;
use legm_core::repository::{TakeRecord, TakeRepository, TweetRecord};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::debug;

use crate::repository::{count_this_month, new_take_record};

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreDocument {
    #[serde(default)]
    takes: Vec<TakeRecord>,
    #[serde(default)]
    tweets: Vec<TweetRecord>,
    #[serde(default)]
    config: BTreeMap<String, String>,
}

pub struct FileTakeRepository {
    path: PathBuf,
    document: RwLock<StoreDocument>,
}

impl FileTakeRepository {
    /// Open the store at `path`. A missing file starts empty and is created
    /// on the first write; an unreadable or corrupt one is an error.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, RepositoryError> {
        let path = path.into();
        let document = Self::load_from_disk(&path)?;
        debug!(
            path = %path.display(),
            takes = document.takes.len(),
            tweets = document.tweets.len(),
            "Take store loaded"
        );
        Ok(Self {
            path,
            document: RwLock::new(document),
        })
    }

    /// Default path: `~/.legm/data/legm.json`
    pub fn default_path() -> PathBuf {
        AppConfig::config_dir().join("data").join("legm.json")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All stored takes, oldest first.
    pub async fn takes(&self) -> Vec<TakeRecord> {
        self.document.read().await.takes.clone()
    }

    /// All recorded replies, oldest first.
    pub async fn tweets(&self) -> Vec<TweetRecord> {
        self.document.read().await.tweets.clone()
    }

    fn load_from_disk(path: &Path) -> Result<StoreDocument, RepositoryError> {
        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(StoreDocument::default());
            }
            Err(e) => {
                return Err(RepositoryError::Storage(format!(
                    "Failed to read take store {}: {e}",
                    path.display()
                )));
            }
        };

        if content.trim().is_empty() {
            return Ok(StoreDocument::default());
        }

        serde_json::from_str(&content).map_err(|e| {
            RepositoryError::Storage(format!("Corrupt take store {}: {e}", path.display()))
        })
    }

    /// Write the document to disk. Callers hold the write lock, so flushes
    /// never interleave.
    fn flush(&self, document: &StoreDocument) -> Result<(), RepositoryError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                RepositoryError::Storage(format!("Failed to create data directory: {e}"))
            })?;
        }

        let content = serde_json::to_string_pretty(document).map_err(|e| {
            RepositoryError::Storage(format!("Failed to serialize take store: {e}"))
        })?;

        // Write then rename so a crash never leaves a half-written store
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, content)
            .map_err(|e| RepositoryError::Storage(format!("Failed to write take store: {e}")))?;
        std::fs::rename(&tmp, &self.path)
            .map_err(|e| RepositoryError::Storage(format!("Failed to replace take store: {e}")))
    }
}

#[async_trait]
impl TakeRepository for FileTakeRepository {
    async fn create_take(
        &self,
        take_text: &str,
        analysis: &TakeAnalysis,
        source_tweet_id: Option<&str>,
    ) -> Result<TakeRecord, RepositoryError> {
        let record = new_take_record(take_text, analysis, source_tweet_id);
        let mut document = self.document.write().await;
        document.takes.push(record.clone());
        self.flush(&document)?;
        Ok(record)
    }

    async fn record_tweet(&self, tweet: TweetRecord) -> Result<(), RepositoryError> {
        let mut document = self.document.write().await;
        document.tweets.push(tweet);
        self.flush(&document)
    }

    async fn count_tweets_this_month(&self) -> Result<u32, RepositoryError> {
        Ok(count_this_month(&self.document.read().await.tweets))
    }

    async fn get_config(&self, key: &str) -> Result<Option<String>, RepositoryError> {
        Ok(self.document.read().await.config.get(key).cloned())
    }

    async fn set_config(&self, key: &str, value: &str) -> Result<(), RepositoryError> {
        let mut document = self.document.write().await;
        document.config.insert(key.to_string(), value.to_string());
        self.flush(&document)
    }
}
