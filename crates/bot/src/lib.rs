//! The LeGM bot: posting cadence, post filtering, take persistence and the
//! mention/search loops that drive the analyzer.

pub mod bot;
pub mod cadence;
pub mod file_repository;
pub mod filter;
pub mod repository;

pub use bot::{LegmBot, MENTIONS_SINCE_KEY};
pub use cadence::RateLimiter;
pub use file_repository::FileTakeRepository;
pub use filter::TweetFilter;
pub use repository::InMemoryTakeRepository;
