//! Stats-layer plumbing for LeGM.
//!
//! - [`TtlCache`]: per-key expiring cache shared via `Arc`
//! - [`with_retry`]: retries transient backend failures on a delay schedule
//! - [`CachedStats`]: a `StatsBackend` decorator combining both
//! - [`FixtureStats`]: a JSON-backed backend for offline runs and tests
//! - name and season helpers

pub mod cache;
pub mod cached;
pub mod fixture;
pub mod names;
pub mod retry;

pub use cache::TtlCache;
pub use cached::CachedStats;
pub use fixture::{FixtureData, FixturePlayer, FixtureStats};
pub use names::{current_season, normalize_name, season_for};
pub use retry::{RetryPolicy, with_retry};
