//! Score cache
//!
//! Raw factor scores of one model depend only on the participating agents and
//! their labels, the settings, the model and the data snapshot. The cache memoizes them for a short
//! TTL so rapid repeated runs skip the scoring pass. It is never required for
//! correctness: a miss recomputes the same values.
//!
//! Concurrent writers race with last-writer-wins; an entry older than its TTL is
//! treated as absent.

use crate::constants::cache::KEY_SEPARATOR;
use crate::error::{AllotError, AllotResult};
use allot_types::{AssignmentSettings, FactorScore};
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::time::Duration;
use tracing::{debug, warn};

/// Color name → raw scores of every agent, ordered by agent id
pub type ColorScores = BTreeMap<String, Vec<FactorScore>>;

/// Source of "now" for expiry decisions
pub trait Clock: Send + Sync + fmt::Debug {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to
#[derive(Debug)]
pub struct ManualClock {
    millis: AtomicI64,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self { millis: AtomicI64::new(start.timestamp_millis()) }
    }

    pub fn advance(&self, by: Duration) {
        let delta = i64::try_from(by.as_millis()).unwrap_or(i64::MAX);
        self.millis.fetch_add(delta, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.millis.load(Ordering::SeqCst)).unwrap_or_default()
    }
}

/// Cache counters
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
    pub hit_rate: f64,
}

impl CacheStats {
    fn new(entries: usize, hits: u64, misses: u64) -> Self {
        let hit_rate = if hits + misses > 0 { hits as f64 / (hits + misses) as f64 } else { 0.0 };
        Self { entries, hits, misses, hit_rate }
    }
}

/// Injectable score memo
pub trait ScoreCache: Send + Sync + fmt::Debug {
    fn get(&self, key: &str) -> Option<Arc<ColorScores>>;

    fn set(&self, key: String, scores: Arc<ColorScores>, ttl: Duration);

    fn stats(&self) -> CacheStats;

    fn clear(&self);
}

/// Remembers nothing
#[derive(Debug, Default)]
pub struct NoopScoreCache {
    misses: AtomicU64,
}

impl ScoreCache for NoopScoreCache {
    fn get(&self, _key: &str) -> Option<Arc<ColorScores>> {
        self.misses.fetch_add(1, Ordering::Relaxed);
        None
    }

    fn set(&self, _key: String, _scores: Arc<ColorScores>, _ttl: Duration) {}

    fn stats(&self) -> CacheStats {
        CacheStats::new(0, 0, self.misses.load(Ordering::Relaxed))
    }

    fn clear(&self) {}
}

#[derive(Debug, Clone)]
struct CacheEntry {
    scores: Arc<ColorScores>,
    inserted_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

/// Thread-safe TTL cache with a bound on live entries
#[derive(Debug)]
pub struct TtlScoreCache {
    entries: DashMap<String, CacheEntry>,
    clock: Arc<dyn Clock>,
    hits: AtomicU64,
    misses: AtomicU64,
    max_entries: usize,
}

impl TtlScoreCache {
    pub fn new(max_entries: usize) -> Self {
        Self::with_clock(max_entries, Arc::new(SystemClock))
    }

    pub fn with_clock(max_entries: usize, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: DashMap::new(),
            clock,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            max_entries: max_entries.max(1),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every expired entry, returning how many were removed
    pub fn cleanup_expired(&self) -> usize {
        let now = self.clock.now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.expires_at > now);
        let removed = before.saturating_sub(self.entries.len());
        if removed > 0 {
            debug!(removed, live = self.entries.len(), "Cleaned up expired score sets");
        }
        removed
    }

    /// Make room for one more entry: expired ones first, then the oldest
    fn evict_if_needed(&self, incoming: &str) {
        if self.entries.len() < self.max_entries || self.entries.contains_key(incoming) {
            return;
        }
        if self.cleanup_expired() > 0 && self.entries.len() < self.max_entries {
            return;
        }

        let oldest = self
            .entries
            .iter()
            .min_by_key(|entry| entry.inserted_at)
            .map(|entry| entry.key().clone());
        if let Some(key) = oldest {
            self.entries.remove(&key);
            warn!(evicted = %key, live = self.entries.len(), "Evicted oldest score set");
        }
    }
}

impl ScoreCache for TtlScoreCache {
    fn get(&self, key: &str) -> Option<Arc<ColorScores>> {
        let now = self.clock.now();
        let found = match self.entries.get(key) {
            Some(entry) if entry.expires_at > now => Some(Arc::clone(&entry.scores)),
            Some(entry) => {
                // Release the shard lock before removing
                drop(entry);
                self.entries.remove_if(key, |_, e| e.expires_at <= now);
                None
            }
            None => None,
        };

        match found {
            Some(scores) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(scores)
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    fn set(&self, key: String, scores: Arc<ColorScores>, ttl: Duration) {
        self.evict_if_needed(&key);

        let now = self.clock.now();
        let expires_at = chrono::Duration::from_std(ttl)
            .ok()
            .and_then(|ttl| now.checked_add_signed(ttl))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        self.entries.insert(key, CacheEntry { scores, inserted_at: now, expires_at });
    }

    fn stats(&self) -> CacheStats {
        CacheStats::new(
            self.entries.len(),
            self.hits.load(Ordering::Relaxed),
            self.misses.load(Ordering::Relaxed),
        )
    }

    fn clear(&self) {
        self.entries.clear();
    }
}

/// Cache key of one model's scores: md5 over the sorted `(agent id, display name)`
/// pairs, the settings, the model name and the snapshot's data tag
pub fn fingerprint<'a>(
    agents: impl IntoIterator<Item = (&'a str, &'a str)>,
    settings: &AssignmentSettings,
    model_name: &str,
    data_tag: &str,
) -> AllotResult<String> {
    let mut agents: Vec<(&str, &str)> = agents.into_iter().collect();
    agents.sort_unstable();

    let agents = serde_json::to_string(&agents)
        .map_err(|e| AllotError::internal("score_cache", format!("cannot serialize agents: {e}")))?;
    let settings = serde_json::to_string(settings)
        .map_err(|e| AllotError::internal("score_cache", format!("cannot serialize settings: {e}")))?;

    let mut material = String::new();
    for part in [agents, settings, model_name.to_string(), data_tag.to_string()] {
        material.push_str(&part);
        material.push(KEY_SEPARATOR);
    }

    Ok(format!("{:x}", md5::compute(material.as_bytes())))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scores(agent: &str) -> Arc<ColorScores> {
        let mut map = ColorScores::new();
        map.insert(
            "Black".into(),
            vec![FactorScore {
                agent_id: agent.into(),
                sales_volume: 1,
                remaining_inventory: 0,
                turnover_rate: 100.0,
                store_count: 1,
                inventory_score: 1,
                data_sparse: false,
            }],
        );
        Arc::new(map)
    }

    fn start() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    #[test]
    fn test_entries_expire_after_ttl() {
        let clock = Arc::new(ManualClock::new(start()));
        let cache = TtlScoreCache::with_clock(8, clock.clone());
        cache.set("k".into(), scores("a1"), Duration::from_secs(300));

        clock.advance(Duration::from_secs(299));
        assert!(cache.get("k").is_some());

        clock.advance(Duration::from_secs(1));
        assert!(cache.get("k").is_none());
        assert!(cache.is_empty());

        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert!((stats.hit_rate - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_last_writer_wins() {
        let cache = TtlScoreCache::new(8);
        cache.set("k".into(), scores("a1"), Duration::from_secs(60));
        cache.set("k".into(), scores("a2"), Duration::from_secs(60));
        let hit = cache.get("k").unwrap();
        assert_eq!(hit["Black"][0].agent_id, "a2");
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_oldest_entry_is_evicted_at_capacity() {
        let clock = Arc::new(ManualClock::new(start()));
        let cache = TtlScoreCache::with_clock(2, clock.clone());
        cache.set("first".into(), scores("a1"), Duration::from_secs(60));
        clock.advance(Duration::from_secs(1));
        cache.set("second".into(), scores("a2"), Duration::from_secs(60));
        clock.advance(Duration::from_secs(1));
        cache.set("third".into(), scores("a3"), Duration::from_secs(60));

        assert_eq!(cache.len(), 2);
        assert!(cache.get("first").is_none());
        assert!(cache.get("third").is_some());
    }

    #[test]
    fn test_expired_entries_are_evicted_before_live_ones() {
        let clock = Arc::new(ManualClock::new(start()));
        let cache = TtlScoreCache::with_clock(2, clock.clone());
        cache.set("short".into(), scores("a1"), Duration::from_secs(5));
        cache.set("long".into(), scores("a2"), Duration::from_secs(600));
        clock.advance(Duration::from_secs(10));
        cache.set("new".into(), scores("a3"), Duration::from_secs(600));

        assert!(cache.get("long").is_some());
        assert!(cache.get("new").is_some());
    }

    #[test]
    fn test_noop_cache_never_hits() {
        let cache = NoopScoreCache::default();
        cache.set("k".into(), scores("a1"), Duration::from_secs(60));
        assert!(cache.get("k").is_none());
        assert_eq!(cache.stats().misses, 1);
        assert_eq!(cache.stats().entries, 0);
    }

    #[test]
    fn test_fingerprint_ignores_agent_order_but_not_inputs() {
        let settings = AssignmentSettings::default();
        let pair = [("a1", "Kim"), ("a2", "Lee")];
        let a = fingerprint([("a2", "Lee"), ("a1", "Kim")], &settings, "X1", "r1").unwrap();
        let b = fingerprint(pair, &settings, "X1", "r1").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 32);

        assert_ne!(a, fingerprint(pair, &settings, "X2", "r1").unwrap());
        assert_ne!(a, fingerprint([("a1", "Kim")], &settings, "X1", "r1").unwrap());
        assert_ne!(a, fingerprint(pair, &settings, "X1", "r2").unwrap());

        // Renaming an agent changes which stores it owns
        assert_ne!(a, fingerprint([("a1", "Kim"), ("a2", "Park")], &settings, "X1", "r1").unwrap());

        let mut changed = settings.clone();
        changed.ratios.sales_volume = 70.0;
        assert_ne!(a, fingerprint(pair, &changed, "X1", "r1").unwrap());
    }
}
