//! Decides which posts the bot engages with.

use std::collections::HashSet;

use legm_core::social::SocialPost;
use tracing::debug;

pub const DEFAULT_MIN_LENGTH: usize = 15;
pub const DEFAULT_MAX_LENGTH: usize = 300;

/// Lower-case substrings that mark a post as basketball talk.
const NBA_KEYWORDS: &[&str] = &[
    // League
    "nba", "basketball", "hoops", "playoffs", "finals", "all-star", "all star",
    "triple double", "double double", "free throw", "three pointer", "dunk",
    "buzzer beater", "draft",
    // Slang
    "washed", "goat", "mvp", "dpoy", "6moy", "roty", "clutch", "carried", "choke",
    "ring", "ringz", "bus rider", "bus driver", "supermax", "trade", "cooked", "fraud",
    // Teams
    "celtics", "nets", "knicks", "76ers", "sixers", "raptors", "bulls", "cavaliers",
    "cavs", "pistons", "pacers", "bucks", "hawks", "hornets", "heat", "magic",
    "wizards", "nuggets", "timberwolves", "wolves", "thunder", "trail blazers",
    "blazers", "jazz", "warriors", "clippers", "lakers", "suns", "kings",
    "mavericks", "mavs", "rockets", "grizzlies", "pelicans", "spurs",
    // Players
    "lebron", "james", "curry", "steph", "durant", "giannis", "antetokounmpo",
    "jokic", "luka", "doncic", "tatum", "embiid", "morant", "booker", "edwards",
    "wemby", "wembanyama", "brunson", "haliburton", "shai", "gilgeous-alexander",
    "davis", "kawhi", "leonard", "lillard", "mitchell", "towns", "bam", "adebayo",
    "ingram", "zion", "williamson", "fox", "maxey",
];

fn is_link(token: &str) -> bool {
    token.starts_with("http://") || token.starts_with("https://")
}

pub struct TweetFilter {
    min_length: usize,
    max_length: usize,
    blocked_accounts: HashSet<String>,
}

impl TweetFilter {
    pub fn new(min_length: usize, max_length: usize, blocked_accounts: HashSet<String>) -> Self {
        Self {
            min_length,
            max_length,
            blocked_accounts,
        }
    }

    pub fn with_blocked(blocked_accounts: impl IntoIterator<Item = String>) -> Self {
        Self::new(
            DEFAULT_MIN_LENGTH,
            DEFAULT_MAX_LENGTH,
            blocked_accounts.into_iter().collect(),
        )
    }

    /// Length within bounds and at least one NBA keyword.
    pub fn is_relevant(&self, text: &str) -> bool {
        let len = text.chars().count();
        if len < self.min_length || len > self.max_length {
            return false;
        }
        let lower = text.to_lowercase();
        NBA_KEYWORDS.iter().any(|keyword| lower.contains(keyword))
    }

    /// Whether to ignore `post`. Mentions skip the relevance check.
    pub fn should_skip(&self, post: &SocialPost, is_mention: bool) -> bool {
        let text = post.text.as_str();
        let preview: String = text.chars().take(60).collect();

        if text.starts_with("RT ") {
            debug!(text = %preview, "Skipping retweet");
            return true;
        }

        if text.split_whitespace().all(is_link) {
            debug!(text = %preview, "Skipping link-only post");
            return true;
        }

        if self.blocked_accounts.contains(&post.author_id) {
            debug!(author_id = %post.author_id, "Skipping blocked author");
            return true;
        }

        if is_mention {
            return false;
        }

        if !self.is_relevant(text) {
            debug!(text = %preview, "Skipping irrelevant post");
            return true;
        }

        false
    }
}

impl Default for TweetFilter {
    fn default() -> Self {
        Self::with_blocked(Vec::new())
    }
}
