//! In-memory TTL cache.
//!
//! Entries carry their own expiry and are purged lazily on `get`; there is
//! no background sweeper. Concurrent writers race with last-write-wins.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};
use std::time::Duration;

use tokio::time::Instant;

pub struct TtlCache<V> {
    default_ttl: Duration,
    entries: RwLock<HashMap<String, (Instant, V)>>,
}

impl<V: Clone> TtlCache<V> {
    pub fn new(default_ttl: Duration) -> Self {
        Self {
            default_ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// The cached value, if present and not yet expired.
    pub fn get(&self, key: &str) -> Option<V> {
        {
            let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
            match entries.get(key) {
                None => return None,
                Some((expiry, value)) if Instant::now() <= *expiry => return Some(value.clone()),
                Some(_) => {}
            }
        }

        self.purge_expired(key)
    }

    /// Remove `key` if it is still expired once the write lock is held. A
    /// fresh value stored in the meantime is kept and returned.
    fn purge_expired(&self, key: &str) -> Option<V> {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        match entries.get(key) {
            Some((expiry, value)) if Instant::now() <= *expiry => Some(value.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    /// Store `value`, expiring after `ttl` or the cache default.
    pub fn set(&self, key: impl Into<String>, value: V, ttl: Option<Duration>) {
        let expiry = Instant::now() + ttl.unwrap_or(self.default_ttl);
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.into(), (expiry, value));
    }

    pub fn clear(&self) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Number of stored entries, expired ones included until touched.
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn set_then_get() {
        let cache = TtlCache::new(Duration::from_secs(60));
        cache.set("player_season:2544:2024-25", 27.1_f64, None);
        assert_eq!(cache.get("player_season:2544:2024-25"), Some(27.1));
        assert_eq!(cache.get("missing"), None);
    }

    #[tokio::test(start_paused = true)]
    async fn expired_entry_is_purged_on_get() {
        let cache = TtlCache::new(Duration::from_secs(1));
        cache.set("k", "v".to_string(), None);
        tokio::time::advance(Duration::from_secs(2)).await;

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("k"), None);
        assert!(cache.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn purge_keeps_value_refreshed_after_expiry_was_seen() {
        let cache = TtlCache::new(Duration::from_secs(1));
        cache.set("k", 1, None);
        tokio::time::advance(Duration::from_secs(2)).await;

        // A writer lands between the expired read and the purge
        cache.set("k", 2, None);
        assert_eq!(cache.purge_expired("k"), Some(2));
        assert_eq!(cache.get("k"), Some(2));
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn per_key_ttl_override() {
        let cache = TtlCache::new(Duration::from_secs(3600));
        cache.set("short", 1, Some(Duration::from_secs(5)));
        cache.set("long", 2, None);
        tokio::time::advance(Duration::from_secs(10)).await;

        assert_eq!(cache.get("short"), None);
        assert_eq!(cache.get("long"), Some(2));
    }

    #[tokio::test(start_paused = true)]
    async fn last_write_wins() {
        let cache = TtlCache::new(Duration::from_secs(60));
        cache.set("k", 1, None);
        cache.set("k", 2, None);
        assert_eq!(cache.get("k"), Some(2));
    }

    #[tokio::test(start_paused = true)]
    async fn clear_removes_everything() {
        let cache = TtlCache::new(Duration::from_secs(60));
        cache.set("a", 1, None);
        cache.set("b", 2, None);
        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.get("a"), None);
    }
}
