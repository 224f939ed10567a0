//! Posting cadence: a sliding window of recent posts plus a monthly budget.
//!
//! Both limits must admit a post. The window uses the monotonic clock; the
//! monthly counter is scoped to the UTC calendar month and rolls over to zero
//! when the month changes.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::{Datelike, Utc};
use legm_config::BotConfig;
use tokio::time::Instant;
use tracing::{debug, info, warn};

pub const DEFAULT_MAX_PER_WINDOW: u32 = 15;
pub const DEFAULT_WINDOW: Duration = Duration::from_secs(900);
pub const DEFAULT_MONTHLY_BUDGET: u32 = 450;

/// (year, month) in UTC.
type Month = (i32, u32);

fn current_month() -> Month {
    let now = Utc::now();
    (now.year(), now.month())
}

struct CadenceState {
    posts: VecDeque<Instant>,
    monthly_count: u32,
    month: Month,
}

impl CadenceState {
    /// Reset the monthly counter if `month` is not the tracked one.
    fn roll_to(&mut self, month: Month) {
        if self.month != month {
            info!(
                previous = self.monthly_count,
                year = month.0,
                month = month.1,
                "New month, resetting post count"
            );
            self.month = month;
            self.monthly_count = 0;
        }
    }

    fn purge_before(&mut self, cutoff: Option<Instant>) {
        let Some(cutoff) = cutoff else { return };
        while self.posts.front().is_some_and(|t| *t < cutoff) {
            self.posts.pop_front();
        }
    }
}

/// Admission controller for outbound posts, shared between bot loops.
pub struct RateLimiter {
    max_per_window: u32,
    window: Duration,
    monthly_budget: u32,
    state: Mutex<CadenceState>,
}

impl RateLimiter {
    pub fn new(max_per_window: u32, window: Duration, monthly_budget: u32) -> Self {
        Self {
            max_per_window,
            window,
            monthly_budget,
            state: Mutex::new(CadenceState {
                posts: VecDeque::new(),
                monthly_count: 0,
                month: current_month(),
            }),
        }
    }

    pub fn from_config(config: &BotConfig) -> Self {
        Self::new(
            config.max_per_window,
            Duration::from_secs(config.window_secs),
            config.monthly_budget,
        )
    }

    fn lock(&self) -> MutexGuard<'_, CadenceState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Whether a post is admitted right now. Does not record anything.
    pub fn can_post(&self) -> bool {
        self.can_post_in(current_month())
    }

    fn can_post_in(&self, month: Month) -> bool {
        let mut state = self.lock();
        state.roll_to(month);
        let cutoff = Instant::now().checked_sub(self.window);
        state.purge_before(cutoff);

        if state.monthly_count >= self.monthly_budget {
            warn!(
                count = state.monthly_count,
                budget = self.monthly_budget,
                "Monthly budget exhausted"
            );
            return false;
        }

        if state.posts.len() >= self.max_per_window as usize {
            debug!(
                in_window = state.posts.len(),
                max = self.max_per_window,
                "Sliding window full"
            );
            return false;
        }

        true
    }

    /// Record a post made now. Callers check [`can_post`](Self::can_post) first.
    pub fn record_post(&self) {
        self.record_post_in(current_month());
    }

    fn record_post_in(&self, month: Month) {
        let mut state = self.lock();
        state.roll_to(month);
        state.posts.push_back(Instant::now());
        state.monthly_count = state.monthly_count.saturating_add(1);
        debug!(
            in_window = state.posts.len(),
            max = self.max_per_window,
            month_count = state.monthly_count,
            budget = self.monthly_budget,
            "Recorded post"
        );
    }

    /// Overwrite the monthly counter, e.g. from persisted history at startup.
    pub fn set_monthly_count(&self, count: u32) {
        let mut state = self.lock();
        state.month = current_month();
        state.monthly_count = count;
        info!(count, "Monthly post count initialized");
    }

    pub fn monthly_count(&self) -> u32 {
        let mut state = self.lock();
        state.roll_to(current_month());
        state.monthly_count
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_PER_WINDOW, DEFAULT_WINDOW, DEFAULT_MONTHLY_BUDGET)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn allows_under_window_limit() {
        let limiter = RateLimiter::new(3, Duration::from_secs(60), 100);
        assert!(limiter.can_post());
        limiter.record_post();
        limiter.record_post();
        assert!(limiter.can_post());
    }

    #[tokio::test(start_paused = true)]
    async fn blocks_when_window_full() {
        let limiter = RateLimiter::new(2, Duration::from_secs(60), 100);
        limiter.record_post();
        limiter.record_post();
        assert!(!limiter.can_post());
    }

    #[tokio::test(start_paused = true)]
    async fn window_slides() {
        let limiter = RateLimiter::new(2, Duration::from_secs(60), 100);
        limiter.record_post();
        tokio::time::advance(Duration::from_secs(30)).await;
        limiter.record_post();
        assert!(!limiter.can_post());

        // First post leaves the window
        tokio::time::advance(Duration::from_secs(31)).await;
        assert!(limiter.can_post());
        limiter.record_post();
        assert!(!limiter.can_post());

        tokio::time::advance(Duration::from_secs(61)).await;
        assert!(limiter.can_post());
    }

    #[tokio::test(start_paused = true)]
    async fn blocks_when_monthly_budget_exhausted() {
        let limiter = RateLimiter::new(100, Duration::from_secs(60), 2);
        limiter.record_post();
        limiter.record_post();
        assert!(!limiter.can_post());

        // Window expiry does not restore monthly budget
        tokio::time::advance(Duration::from_secs(120)).await;
        assert!(!limiter.can_post());
    }

    #[tokio::test(start_paused = true)]
    async fn set_monthly_count_only_touches_counter() {
        let limiter = RateLimiter::new(1, Duration::from_secs(60), 450);
        limiter.record_post();
        limiter.set_monthly_count(449);
        assert_eq!(limiter.monthly_count(), 449);
        // Window still holds the earlier post
        assert!(!limiter.can_post());

        tokio::time::advance(Duration::from_secs(61)).await;
        assert!(limiter.can_post());
        limiter.set_monthly_count(450);
        assert!(!limiter.can_post());
    }

    #[tokio::test(start_paused = true)]
    async fn record_post_does_not_check() {
        let limiter = RateLimiter::new(1, Duration::from_secs(60), 1);
        limiter.record_post();
        limiter.record_post();
        assert_eq!(limiter.monthly_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn counter_saturates_at_max() {
        let limiter = RateLimiter::new(15, Duration::from_secs(900), u32::MAX);
        limiter.set_monthly_count(u32::MAX);
        limiter.record_post();
        assert_eq!(limiter.monthly_count(), u32::MAX);
        assert!(!limiter.can_post());
    }

    #[tokio::test(start_paused = true)]
    async fn month_change_resets_counter() {
        let limiter = RateLimiter::new(10, Duration::from_secs(60), 2);
        limiter.record_post_in((2025, 1));
        limiter.record_post_in((2025, 1));
        assert!(!limiter.can_post_in((2025, 1)));

        tokio::time::advance(Duration::from_secs(61)).await;
        assert!(limiter.can_post_in((2025, 2)));
        assert_eq!(limiter.lock().monthly_count, 0);
    }

    #[test]
    fn defaults() {
        let limiter = RateLimiter::default();
        assert_eq!(limiter.max_per_window, 15);
        assert_eq!(limiter.window, Duration::from_secs(900));
        assert_eq!(limiter.monthly_budget, 450);
        assert_eq!(limiter.monthly_count(), 0);
    }

    #[test]
    fn from_config_uses_bot_settings() {
        let config = BotConfig {
            max_per_window: 5,
            window_secs: 300,
            monthly_budget: 100,
            ..BotConfig::default()
        };
        let limiter = RateLimiter::from_config(&config);
        assert_eq!(limiter.max_per_window, 5);
        assert_eq!(limiter.window, Duration::from_secs(300));
        assert_eq!(limiter.monthly_budget, 100);
    }
}
