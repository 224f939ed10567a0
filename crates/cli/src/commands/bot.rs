//! `legm bot`: Run the bot loops against a replay file.
//!
//! The replay client serves the file's posts once as mentions and on every
//! search, and prints replies instead of publishing them.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use legm_bot::{FileTakeRepository, LegmBot, RateLimiter};
use legm_core::error::SocialError;
use legm_core::social::{SocialClient, SocialPost};
use tracing::info;

use super::CmdResult;

pub struct ReplaySocial {
    pending_mentions: Mutex<Vec<SocialPost>>,
    pool: Vec<SocialPost>,
    next_reply: AtomicU64,
}

impl ReplaySocial {
    pub fn new(posts: Vec<SocialPost>) -> Self {
        Self {
            pending_mentions: Mutex::new(posts.clone()),
            pool: posts,
            next_reply: AtomicU64::new(1),
        }
    }

    pub fn from_path(path: &Path) -> CmdResult<Self> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| format!("Cannot read replay file {}: {e}", path.display()))?;
        let posts: Vec<SocialPost> = serde_json::from_str(&json)?;
        Ok(Self::new(posts))
    }

    fn reply_id(&self) -> String {
        format!("replay-{}", self.next_reply.fetch_add(1, Ordering::Relaxed))
    }
}

#[async_trait]
impl SocialClient for ReplaySocial {
    async fn get_mentions(
        &self,
        _user_id: &str,
        _since_id: Option<&str>,
    ) -> Result<Vec<SocialPost>, SocialError> {
        let mut pending = self
            .pending_mentions
            .lock()
            .map_err(|_| SocialError::RequestFailed("replay state poisoned".into()))?;
        Ok(std::mem::take(&mut *pending))
    }

    async fn search_recent(
        &self,
        _query: &str,
        max_results: u32,
    ) -> Result<Vec<SocialPost>, SocialError> {
        Ok(self.pool.iter().take(max_results as usize).cloned().collect())
    }

    async fn reply(&self, text: &str, in_reply_to: &str) -> Result<String, SocialError> {
        println!("  ↳ @{in_reply_to}: {text}");
        Ok(self.reply_id())
    }

    async fn reply_with_media(
        &self,
        text: &str,
        image: &[u8],
        in_reply_to: &str,
    ) -> Result<String, SocialError> {
        println!("  ↳ @{in_reply_to}: {text} [chart, {} bytes]", image.len());
        Ok(self.reply_id())
    }
}

pub async fn run(
    replay: PathBuf,
    stats_fixture: Option<PathBuf>,
    store: Option<PathBuf>,
    dry_run: bool,
) -> CmdResult {
    let mut config = super::load_config()?;
    if dry_run {
        config.bot.dry_run = true;
    }

    let social = Arc::new(ReplaySocial::from_path(&replay)?);
    info!(path = %replay.display(), posts = social.pool.len(), "Replay loaded");
    let stats = super::build_stats(&config, stats_fixture.as_deref())?;
    let analyzer = Arc::new(super::build_analyzer(&config, stats)?);
    let repository = Arc::new(FileTakeRepository::open(
        store.unwrap_or_else(FileTakeRepository::default_path),
    )?);
    let limiter = Arc::new(RateLimiter::from_config(&config.bot));

    let bot = Arc::new(LegmBot::new(
        social,
        analyzer,
        repository.clone(),
        limiter.clone(),
        config.bot.clone(),
    ));

    println!();
    println!("  LeGM bot running on {}", replay.display());
    println!("  Store:     {}", repository.path().display());
    println!("  Model:     {}", config.llm.model);
    println!("  Dry run:   {}", config.bot.dry_run);
    println!("  Proactive: {}", config.bot.proactive_enabled);
    println!("  Press Ctrl+C to stop.");
    println!();

    bot.start().await?;
    tokio::signal::ctrl_c().await?;
    bot.stop().await;

    println!();
    println!("  Takes stored:   {}", repository.takes().await.len());
    println!("  Replies stored: {}", repository.tweets().await.len());
    println!("  Month to date:  {}", limiter.monthly_count());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn posts() -> Vec<SocialPost> {
        vec![
            SocialPost::new("1", "LeBron is washed", "a"),
            SocialPost::new("2", "Steph is the GOAT shooter", "b"),
        ]
    }

    #[tokio::test]
    async fn mentions_are_served_once() {
        let social = ReplaySocial::new(posts());
        assert_eq!(social.get_mentions("bot", None).await.unwrap().len(), 2);
        assert!(social.get_mentions("bot", Some("2")).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn search_respects_max_results() {
        let social = ReplaySocial::new(posts());
        assert_eq!(social.search_recent("nba", 1).await.unwrap().len(), 1);
        assert_eq!(social.search_recent("nba", 20).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn reply_ids_are_sequential() {
        let social = ReplaySocial::new(posts());
        assert_eq!(social.reply("r", "1").await.unwrap(), "replay-1");
        assert_eq!(
            social.reply_with_media("r", &[1, 2, 3], "2").await.unwrap(),
            "replay-2"
        );
    }

    #[test]
    fn replay_file_parses() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("posts.json");
        std::fs::write(
            &path,
            r#"[{"id": "9", "text": "Jokic is the best player alive", "author_id": "7"}]"#,
        )
        .unwrap();
        let social = ReplaySocial::from_path(&path).unwrap();
        assert_eq!(social.pool[0].author_id, "7");
    }
}
