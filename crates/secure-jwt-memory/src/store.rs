use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use secure_jwt::JwtResult;
use secure_jwt::storage::{BlacklistStorage, NonceStorage, blacklist_key, nonce_key};
use time::OffsetDateTime;

/// Entry count at which inserts first sweep expired entries.
pub const DEFAULT_SWEEP_THRESHOLD: usize = 10_000;

/// In-memory key-presence-with-expiry store.
///
/// Each key maps to the instant it expires. Lookups treat expired entries as
/// absent and drop them lazily. Inserts sweep all expired entries once the
/// map reaches the sweep threshold; if most entries are still live the next
/// sweep waits until the map doubles. Inserts are never refused.
///
/// Check-and-insert goes through the map's entry API, which holds the shard
/// lock for the duration, so [`NonceStorage::claim`] is atomic.
#[derive(Debug)]
pub struct InMemoryStore {
    entries: DashMap<String, OffsetDateTime>,
    sweep_threshold: usize,
    next_sweep: AtomicUsize,
}

impl InMemoryStore {
    /// Creates an empty store with the default sweep threshold.
    #[must_use]
    pub fn new() -> Self {
        Self::with_sweep_threshold(DEFAULT_SWEEP_THRESHOLD)
    }

    /// Creates an empty store that sweeps expired entries on insert once it
    /// holds `threshold` entries.
    #[must_use]
    pub fn with_sweep_threshold(threshold: usize) -> Self {
        let threshold = threshold.max(1);
        Self {
            entries: DashMap::new(),
            sweep_threshold: threshold,
            next_sweep: AtomicUsize::new(threshold),
        }
    }

    /// Inserts or refreshes `key` for `ttl`.
    pub fn put(&self, key: impl Into<String>, ttl: Duration) {
        self.sweep_if_full();
        self.entries.insert(key.into(), expires_at(ttl));
    }

    /// Inserts `key` for `ttl` unless a live entry exists.
    ///
    /// Returns `true` if the key was inserted.
    pub fn put_if_absent(&self, key: impl Into<String>, ttl: Duration) -> bool {
        self.sweep_if_full();
        let now = OffsetDateTime::now_utc();
        match self.entries.entry(key.into()) {
            Entry::Occupied(mut entry) => {
                if *entry.get() > now {
                    false
                } else {
                    entry.insert(expires_at(ttl));
                    true
                }
            }
            Entry::Vacant(entry) => {
                entry.insert(expires_at(ttl));
                true
            }
        }
    }

    /// Returns `true` if `key` is present and not expired.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        let now = OffsetDateTime::now_utc();
        // The read guard must be released before remove_if locks the shard.
        let live = match self.entries.get(key) {
            Some(expires) => *expires > now,
            None => return false,
        };
        if !live {
            self.entries.remove_if(key, |_, expires| *expires <= now);
        }
        live
    }

    /// Removes `key`. Returns `true` if an entry was removed.
    pub fn remove(&self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    /// Drops every expired entry and returns how many were removed.
    pub fn cleanup_expired(&self) -> usize {
        let now = OffsetDateTime::now_utc();
        let mut removed = 0;
        self.entries.retain(|_, expires| {
            let live = *expires > now;
            if !live {
                removed += 1;
            }
            live
        });
        if removed > 0 {
            tracing::debug!(removed, "Expired store entries cleaned up");
        }
        removed
    }

    // Must run before any shard guard is taken: retain locks every shard.
    fn sweep_if_full(&self) {
        if self.entries.len() < self.next_sweep.load(Ordering::Relaxed) {
            return;
        }
        self.cleanup_expired();
        let live = self.entries.len();
        self.next_sweep.store(
            self.sweep_threshold.max(live.saturating_mul(2)),
            Ordering::Relaxed,
        );
    }

    /// Number of entries, including expired ones not yet cleaned up.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn expires_at(ttl: Duration) -> OffsetDateTime {
    let ttl = time::Duration::try_from(ttl).unwrap_or(time::Duration::MAX);
    OffsetDateTime::now_utc().saturating_add(ttl)
}

#[async_trait]
impl BlacklistStorage for InMemoryStore {
    async fn add(&self, jti: &str, ttl: Duration) -> JwtResult<()> {
        self.put(blacklist_key(jti), ttl);
        Ok(())
    }

    async fn is_blacklisted(&self, jti: &str) -> JwtResult<bool> {
        Ok(self.contains(&blacklist_key(jti)))
    }

    async fn remove(&self, jti: &str) -> JwtResult<()> {
        InMemoryStore::remove(self, &blacklist_key(jti));
        Ok(())
    }
}

#[async_trait]
impl NonceStorage for InMemoryStore {
    async fn add(&self, nonce: &str, ttl: Duration) -> JwtResult<()> {
        self.put(nonce_key(nonce), ttl);
        Ok(())
    }

    async fn is_used(&self, nonce: &str) -> JwtResult<bool> {
        Ok(self.contains(&nonce_key(nonce)))
    }

    async fn claim(&self, nonce: &str, ttl: Duration) -> JwtResult<bool> {
        Ok(self.put_if_absent(nonce_key(nonce), ttl))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tokio_test::block_on;

    const HOUR: Duration = Duration::from_secs(3600);

    #[test]
    fn test_put_and_contains() {
        let store = InMemoryStore::new();
        assert!(!store.contains("a"));

        store.put("a", HOUR);
        assert!(store.contains("a"));
        assert!(!store.contains("b"));
    }

    #[test]
    fn test_zero_ttl_is_immediately_absent() {
        let store = InMemoryStore::new();
        store.put("a", Duration::ZERO);
        assert!(!store.contains("a"));
        // The expired entry was dropped by the lookup.
        assert!(store.is_empty());
    }

    #[test]
    fn test_put_if_absent() {
        let store = InMemoryStore::new();
        assert!(store.put_if_absent("a", HOUR));
        assert!(!store.put_if_absent("a", HOUR));
        assert!(store.contains("a"));
    }

    #[test]
    fn test_put_if_absent_replaces_expired_entry() {
        let store = InMemoryStore::new();
        store.put("a", Duration::ZERO);
        assert!(store.put_if_absent("a", HOUR));
        assert!(store.contains("a"));
    }

    #[test]
    fn test_remove() {
        let store = InMemoryStore::new();
        store.put("a", HOUR);
        assert!(store.remove("a"));
        assert!(!store.remove("a"));
        assert!(!store.contains("a"));
    }

    #[test]
    fn test_cleanup_expired() {
        let store = InMemoryStore::new();
        store.put("live", HOUR);
        store.put("dead-1", Duration::ZERO);
        store.put("dead-2", Duration::ZERO);

        assert_eq!(store.len(), 3);
        assert_eq!(store.cleanup_expired(), 2);
        assert_eq!(store.len(), 1);
        assert!(store.contains("live"));
    }

    #[test]
    fn test_huge_ttl_does_not_overflow() {
        let store = InMemoryStore::new();
        store.put("a", Duration::MAX);
        assert!(store.contains("a"));
    }

    #[test]
    fn test_insert_sweeps_expired_entries_at_threshold() {
        let store = InMemoryStore::with_sweep_threshold(4);
        for i in 0..4 {
            store.put(format!("dead-{i}"), Duration::ZERO);
        }
        assert_eq!(store.len(), 4);

        // No lookup of the dead keys and no explicit cleanup.
        assert!(store.put_if_absent("live", HOUR));
        assert_eq!(store.len(), 1);
        assert!(store.contains("live"));
    }

    #[test]
    fn test_live_entries_are_never_refused() {
        let store = InMemoryStore::with_sweep_threshold(2);
        for i in 0..10 {
            assert!(store.put_if_absent(format!("live-{i}"), HOUR));
        }
        assert_eq!(store.len(), 10);
        assert!(!store.put_if_absent("live-3", HOUR));
    }

    #[tokio::test]
    async fn test_expired_nonces_are_reclaimed_by_later_claims() {
        let store = InMemoryStore::with_sweep_threshold(8);
        for i in 0..8 {
            assert!(store.claim(&format!("old-{i}"), Duration::ZERO).await.unwrap());
        }

        assert!(store.claim("fresh", HOUR).await.unwrap());
        assert_eq!(store.len(), 1);
        assert!(store.is_used("fresh").await.unwrap());
    }

    #[tokio::test]
    async fn test_blacklist_contract() {
        let store = InMemoryStore::new();

        assert!(!store.is_blacklisted("jti-1").await.unwrap());
        BlacklistStorage::add(&store, "jti-1", HOUR).await.unwrap();
        assert!(store.is_blacklisted("jti-1").await.unwrap());
        assert!(store.contains("jwt:jti-blacklist:jti-1"));
        assert!(!store.contains("jti-1"));

        BlacklistStorage::remove(&store, "jti-1").await.unwrap();
        assert!(!store.is_blacklisted("jti-1").await.unwrap());
        // Removing twice is fine.
        BlacklistStorage::remove(&store, "jti-1").await.unwrap();
    }

    #[test]
    fn test_nonce_contract() {
        let store = InMemoryStore::new();

        block_on(async {
            assert!(!store.is_used("n-1").await.unwrap());
            NonceStorage::add(&store, "n-1", HOUR).await.unwrap();
            assert!(store.is_used("n-1").await.unwrap());
        });
        assert!(store.contains("jwt:nonce:n-1"));
    }

    #[tokio::test]
    async fn test_nonce_claim_is_single_use() {
        let store = InMemoryStore::new();

        assert!(store.claim("n-1", HOUR).await.unwrap());
        assert!(!store.claim("n-1", HOUR).await.unwrap());
        assert!(store.is_used("n-1").await.unwrap());
    }

    #[tokio::test]
    async fn test_namespaces_are_separate() {
        let store = InMemoryStore::new();
        BlacklistStorage::add(&store, "same", HOUR).await.unwrap();

        assert!(!store.is_used("same").await.unwrap());
        assert!(store.claim("same", HOUR).await.unwrap());
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn test_concurrent_claims_have_one_winner() {
        let store = Arc::new(InMemoryStore::new());

        let handles: Vec<_> = (0..32)
            .map(|_| {
                let store = store.clone();
                tokio::spawn(async move { store.claim("contended", HOUR).await.unwrap() })
            })
            .collect();

        let mut winners = 0;
        for handle in handles {
            if handle.await.unwrap() {
                winners += 1;
            }
        }
        assert_eq!(winners, 1);
    }
}
