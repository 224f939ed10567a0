//! Bot orchestrator: a reactive loop answering mentions and an optional
//! proactive loop replying to takes found by search.
//!
//! Each loop iteration is independent. A failure is logged and the loop
//! carries on at the next tick.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::{NaiveDate, Utc};
use legm_agent::TakeAnalyzer;
use legm_config::BotConfig;
use legm_core::analysis::TakeAnalysis;
use legm_core::error::Result;
use legm_core::repository::{TakeRepository, TweetRecord};
use legm_core::social::{SocialClient, SocialPost};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

use crate::cadence::RateLimiter;
use crate::filter::TweetFilter;

/// Repository key holding the newest mention ID seen.
pub const MENTIONS_SINCE_KEY: &str = "mentions_since_id";
const SEARCH_MAX_RESULTS: u32 = 20;
const TWEET_TYPE_REPLY: &str = "reply";

/// Whether `candidate` is a newer post ID than `current`.
///
/// IDs are compared numerically when both parse, otherwise longer wins and
/// equal lengths compare lexically.
fn is_newer(candidate: &str, current: Option<&str>) -> bool {
    let Some(current) = current else {
        return true;
    };
    match (candidate.parse::<u64>(), current.parse::<u64>()) {
        (Ok(a), Ok(b)) => a > b,
        _ => (candidate.len(), candidate) > (current.len(), current),
    }
}

fn preview(text: &str) -> String {
    text.chars().take(80).collect()
}

/// Proactive replies made today (UTC).
struct DailyCount {
    day: NaiveDate,
    count: u32,
}

impl DailyCount {
    fn today(&mut self) -> &mut u32 {
        let today = Utc::now().date_naive();
        if self.day != today {
            self.day = today;
            self.count = 0;
        }
        &mut self.count
    }
}

pub struct LegmBot {
    social: Arc<dyn SocialClient>,
    analyzer: Arc<TakeAnalyzer>,
    repository: Arc<dyn TakeRepository>,
    limiter: Arc<RateLimiter>,
    filter: TweetFilter,
    settings: BotConfig,
    since_id: Mutex<Option<String>>,
    daily: Mutex<DailyCount>,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl LegmBot {
    pub fn new(
        social: Arc<dyn SocialClient>,
        analyzer: Arc<TakeAnalyzer>,
        repository: Arc<dyn TakeRepository>,
        limiter: Arc<RateLimiter>,
        settings: BotConfig,
    ) -> Self {
        Self {
            social,
            analyzer,
            repository,
            limiter,
            filter: TweetFilter::with_blocked(settings.blocked_accounts.iter().cloned()),
            settings,
            since_id: Mutex::new(None),
            daily: Mutex::new(DailyCount {
                day: Utc::now().date_naive(),
                count: 0,
            }),
            tasks: Mutex::new(Vec::new()),
        }
    }

    /// Restore the monthly post count and the mention cursor from the repository.
    pub async fn hydrate(&self) -> Result<()> {
        let posted = self.repository.count_tweets_this_month().await?;
        self.limiter.set_monthly_count(posted);

        if let Some(stored) = self.repository.get_config(MENTIONS_SINCE_KEY).await? {
            info!(since_id = %stored, "Resuming mentions");
            *lock(&self.since_id) = Some(stored);
        }
        Ok(())
    }

    pub fn since_id(&self) -> Option<String> {
        lock(&self.since_id).clone()
    }

    pub fn daily_proactive_count(&self) -> u32 {
        *lock(&self.daily).today()
    }

    pub fn is_running(&self) -> bool {
        !lock(&self.tasks).is_empty()
    }

    /// Hydrate state, then spawn the mentions loop and, if enabled, the
    /// search loop.
    pub async fn start(self: &Arc<Self>) -> Result<()> {
        if self.is_running() {
            warn!("Bot is already running");
            return Ok(());
        }

        self.hydrate().await?;

        let mut handles = Vec::new();

        let bot = Arc::clone(self);
        let period = Duration::from_secs(self.settings.mention_poll_interval_secs.max(1));
        handles.push(tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if let Err(e) = bot.process_mentions().await {
                    error!(error = %e, "Mention poll failed");
                }
            }
        }));

        if self.settings.proactive_enabled {
            let bot = Arc::clone(self);
            let period = Duration::from_secs(self.settings.search_poll_interval_secs.max(1));
            handles.push(tokio::spawn(async move {
                let mut interval = tokio::time::interval(period);
                interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
                loop {
                    interval.tick().await;
                    if let Err(e) = bot.search_and_engage().await {
                        error!(error = %e, "Search cycle failed");
                    }
                }
            }));
        }

        *lock(&self.tasks) = handles;
        info!(
            dry_run = self.settings.dry_run,
            proactive = self.settings.proactive_enabled,
            "Bot started"
        );
        Ok(())
    }

    /// Abort the running loops and wait for them to wind down.
    pub async fn stop(&self) {
        let handles: Vec<_> = lock(&self.tasks).drain(..).collect();
        for handle in handles {
            handle.abort();
            let _ = handle.await;
        }
        info!("Bot stopped");
    }

    /// Fetch new mentions and answer each one. Returns how many were analyzed.
    ///
    /// A failure on one mention is logged and does not stop the others. The
    /// cursor advances past every mention regardless of outcome.
    pub async fn process_mentions(&self) -> Result<usize> {
        let since = self.since_id();
        let mentions = self
            .social
            .get_mentions(&self.settings.user_id, since.as_deref())
            .await?;
        if mentions.is_empty() {
            return Ok(0);
        }

        info!(count = mentions.len(), "Processing mentions");

        let mut analyzed = 0;
        for mention in &mentions {
            match self.handle_mention(mention).await {
                Ok(true) => analyzed += 1,
                Ok(false) => {}
                Err(e) => error!(mention_id = %mention.id, error = %e, "Failed to handle mention"),
            }

            if mention.id.is_empty() {
                continue;
            }
            let advanced = {
                let mut since_id = lock(&self.since_id);
                if is_newer(&mention.id, since_id.as_deref()) {
                    *since_id = Some(mention.id.clone());
                    true
                } else {
                    false
                }
            };
            if advanced {
                self.repository
                    .set_config(MENTIONS_SINCE_KEY, &mention.id)
                    .await?;
            }
        }

        Ok(analyzed)
    }

    async fn handle_mention(&self, mention: &SocialPost) -> Result<bool> {
        if self.filter.should_skip(mention, true) {
            return Ok(false);
        }

        if !self.limiter.can_post() {
            warn!(mention_id = %mention.id, "Posting cadence exceeded, skipping mention");
            return Ok(false);
        }

        let analysis = self.analyzer.analyze(&mention.text).await?;
        self.respond(mention, &analysis).await?;
        Ok(true)
    }

    /// One proactive cycle: search, pick the shortest eligible take, reply.
    /// Returns whether a take was analyzed.
    pub async fn search_and_engage(&self) -> Result<bool> {
        let today = self.daily_proactive_count();
        if today >= self.settings.max_daily_proactive {
            debug!(
                count = today,
                max = self.settings.max_daily_proactive,
                "Daily proactive limit reached"
            );
            return Ok(false);
        }

        if !self.limiter.can_post() {
            debug!("Posting cadence prevents proactive reply");
            return Ok(false);
        }

        let posts = self
            .social
            .search_recent(&self.settings.search_query, SEARCH_MAX_RESULTS)
            .await?;

        let Some(target) = posts
            .iter()
            .filter(|p| !self.filter.should_skip(p, false))
            .min_by_key(|p| p.text.chars().count())
        else {
            debug!(results = posts.len(), "No viable candidates in search");
            return Ok(false);
        };

        info!(post_id = %target.id, text = %preview(&target.text), "Selected proactive target");

        let analysis = self.analyzer.analyze(&target.text).await?;
        if self.respond(target, &analysis).await?.is_some() {
            let count = {
                let mut daily = lock(&self.daily);
                let count = daily.today();
                *count += 1;
                *count
            };
            info!(
                post_id = %target.id,
                daily = count,
                max = self.settings.max_daily_proactive,
                "Proactive reply posted"
            );
        }
        Ok(true)
    }

    /// Persist the take and reply to `source`. Returns the reply ID, or
    /// `None` in dry-run mode.
    async fn respond(&self, source: &SocialPost, analysis: &TakeAnalysis) -> Result<Option<String>> {
        let take = self
            .repository
            .create_take(&source.text, analysis, Some(&source.id))
            .await?;

        if self.settings.dry_run {
            info!(
                post_id = %source.id,
                verdict = %analysis.verdict,
                roast = %analysis.roast,
                "[DRY RUN] Would reply"
            );
            return Ok(None);
        }

        let reply_id = match &analysis.chart_png {
            Some(png) => {
                self.social
                    .reply_with_media(&analysis.roast, png, &source.id)
                    .await?
            }
            None => self.social.reply(&analysis.roast, &source.id).await?,
        };

        self.limiter.record_post();

        self.repository
            .record_tweet(TweetRecord {
                take_id: take.id,
                tweet_id: reply_id.clone(),
                tweet_type: TWEET_TYPE_REPLY.into(),
                content: analysis.roast.clone(),
                posted_at: Utc::now(),
            })
            .await?;

        info!(post_id = %source.id, reply_id = %reply_id, "Replied");
        Ok(Some(reply_id))
    }
}
