//! Process-wide exchange-rate cache with TTL refresh and degraded fallback
//!
//! Owns the mapping from currency code to rate against the storage currency.
//! Refreshing is TTL-gated and single-flight: any number of UI triggers may
//! call [`RateCache::refresh`] concurrently, at most one outbound request is
//! in flight, and late arrivals resolve once that request settles.
//!
//! State machine: `Idle -> Loading -> {Fresh | Degraded}`. `Fresh` only
//! reloads after the TTL expires. `Degraded` (fallback rates, no fetch
//! timestamp) reloads on the very next refresh, so an outage is never hidden
//! behind the TTL.

use super::fallback::fallback_table;
use super::source::RateSource;
use crate::currency::BASE_CURRENCY;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

/// Cached rate table lifetime: one hour.
pub const TTL_SECONDS: i64 = 3600;

/// Observable cache state
///
/// `rates` maps a 3-letter code to units of that currency per 1 unit of the
/// storage currency. `last_fetched_at` is only set by a successful fetch;
/// fallback rates deliberately leave it unset.
#[derive(Debug, Clone, Default)]
pub struct CacheState {
    pub rates: HashMap<String, f64>,
    pub last_fetched_at: Option<DateTime<Utc>>,
    pub is_loading: bool,
    pub last_error: Option<String>,
}

/// Shared exchange-rate cache
///
/// Single writer (`refresh`), many readers (`get_rate`, `snapshot`); readers
/// never block on the network.
#[derive(Clone)]
pub struct RateCache {
    state: Arc<RwLock<CacheState>>,
    source: Arc<dyn RateSource>,
    /// Serializes outbound fetches; holders of the gate are "the" refresh.
    gate: Arc<tokio::sync::Mutex<()>>,
    /// Bumped whenever a refresh attempt settles (success or failure).
    /// Waiters that queued behind an attempt use it to skip their own fetch.
    settled: Arc<AtomicU64>,
    ttl: Duration,
}

impl RateCache {
    /// Create a cache over the given source with the default one-hour TTL
    pub fn new(source: Arc<dyn RateSource>) -> Self {
        Self::with_ttl(source, Duration::seconds(TTL_SECONDS))
    }

    /// Create a cache with a custom TTL
    pub fn with_ttl(source: Arc<dyn RateSource>, ttl: Duration) -> Self {
        Self {
            state: Arc::new(RwLock::new(CacheState::default())),
            source,
            gate: Arc::new(tokio::sync::Mutex::new(())),
            settled: Arc::new(AtomicU64::new(0)),
            ttl,
        }
    }

    /// Seed the cache from persisted state, before any refresh is attempted.
    ///
    /// Lets a cold start render converted values immediately from the
    /// last-known table while a background refresh runs.
    pub fn restore(&self, rates: HashMap<String, f64>, last_fetched_at: Option<DateTime<Utc>>) {
        let mut state = self.state.write().unwrap();
        state.rates = rates;
        state.last_fetched_at = last_fetched_at;
    }

    /// Whether the current table is within its TTL
    pub fn is_fresh(&self) -> bool {
        let state = self.state.read().unwrap();
        state
            .last_fetched_at
            .map(|fetched| Utc::now() - fetched < self.ttl)
            .unwrap_or(false)
    }

    /// Get the rate for a currency code, if the current table has one.
    /// Pure read, never triggers network I/O.
    pub fn get_rate(&self, code: &str) -> Option<f64> {
        let state = self.state.read().unwrap();
        state.rates.get(code).copied()
    }

    /// Clone the observable state for rendering loading/error affordances
    pub fn snapshot(&self) -> CacheState {
        self.state.read().unwrap().clone()
    }

    /// Refresh the rate table if the TTL has expired.
    ///
    /// Within the TTL this returns immediately with no side effects. On a
    /// fetch failure the existing table is kept (or the fallback installed
    /// if there is none), `last_error` is set, and `last_fetched_at` stays
    /// unset so the next call retries the network. Source failures never
    /// propagate out of this method.
    pub async fn refresh(&self) {
        if self.is_fresh() {
            return;
        }

        let seen = self.settled.load(Ordering::Acquire);
        let _guard = self.gate.lock().await;

        // Another refresh settled while we waited for the gate; its outcome
        // is ours too.
        if self.settled.load(Ordering::Acquire) != seen {
            return;
        }
        // Restored state may have become fresh between check and lock.
        if self.is_fresh() {
            return;
        }

        {
            let mut state = self.state.write().unwrap();
            state.is_loading = true;
            state.last_error = None;
        }

        let outcome = self.source.fetch_rates(BASE_CURRENCY).await;

        {
            let mut state = self.state.write().unwrap();
            match outcome {
                Ok(rates) => {
                    state.rates = rates;
                    state.last_fetched_at = Some(Utc::now());
                    state.last_error = None;
                }
                Err(e) => {
                    log::error!("Failed to fetch exchange rates: {}", e);
                    if state.rates.is_empty() {
                        log::warn!("No cached rates available, installing fallback table");
                        state.rates = fallback_table();
                    }
                    state.last_error = Some(e.to_string());
                    // last_fetched_at untouched: degraded state must retry
                    // on the next refresh instead of hiding behind the TTL.
                }
            }
            state.is_loading = false;
        }

        self.settled.fetch_add(1, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CurrencyError, Result};
    use async_trait::async_trait;
    use std::sync::atomic::AtomicUsize;

    /// Scripted source: counts calls, optionally fails.
    struct MockSource {
        calls: AtomicUsize,
        fail: bool,
    }

    impl MockSource {
        fn ok() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail: false,
            }
        }

        fn failing() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail: true,
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl RateSource for MockSource {
        async fn fetch_rates(&self, _base: &str) -> Result<HashMap<String, f64>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(CurrencyError::SourceUnreachable(
                    "mock source down".to_string(),
                ));
            }
            let mut rates = HashMap::new();
            rates.insert("NGN".to_string(), 1.0);
            rates.insert("USD".to_string(), 0.0012);
            Ok(rates)
        }

        fn name(&self) -> &str {
            "mock"
        }
    }

    #[tokio::test]
    async fn test_refresh_within_ttl_is_cached() {
        let source = Arc::new(MockSource::ok());
        let cache = RateCache::new(source.clone());

        cache.refresh().await;
        cache.refresh().await;

        assert_eq!(source.call_count(), 1);
        assert!(cache.is_fresh());
        assert_eq!(cache.get_rate("USD"), Some(0.0012));
    }

    #[tokio::test]
    async fn test_refresh_after_ttl_refetches() {
        let source = Arc::new(MockSource::ok());
        // Zero TTL: every refresh is an expiry
        let cache = RateCache::with_ttl(source.clone(), Duration::seconds(0));

        cache.refresh().await;
        cache.refresh().await;

        assert_eq!(source.call_count(), 2);
    }

    #[tokio::test]
    async fn test_failure_installs_fallback_and_retries() {
        let source = Arc::new(MockSource::failing());
        let cache = RateCache::new(source.clone());

        cache.refresh().await;

        let snapshot = cache.snapshot();
        assert!(!snapshot.rates.is_empty());
        assert!(snapshot.last_error.is_some());
        assert!(!snapshot.is_loading);
        assert!(snapshot.last_fetched_at.is_none());
        assert_eq!(cache.get_rate("NGN"), Some(1.0));

        // Degraded state bypasses the TTL: the next refresh hits the source
        cache.refresh().await;
        assert_eq!(source.call_count(), 2);
    }

    #[tokio::test]
    async fn test_failure_keeps_existing_rates() {
        let source = Arc::new(MockSource::failing());
        let cache = RateCache::new(source.clone());

        let mut restored = HashMap::new();
        restored.insert("NGN".to_string(), 1.0);
        restored.insert("USD".to_string(), 0.0015);
        cache.restore(restored, None);

        cache.refresh().await;

        // Stale rates beat fallback rates
        assert_eq!(cache.get_rate("USD"), Some(0.0015));
        assert!(cache.snapshot().last_error.is_some());
    }

    #[tokio::test]
    async fn test_restore_fresh_state_skips_fetch() {
        let source = Arc::new(MockSource::ok());
        let cache = RateCache::new(source.clone());

        let mut rates = HashMap::new();
        rates.insert("USD".to_string(), 0.0013);
        cache.restore(rates, Some(Utc::now()));

        cache.refresh().await;

        assert_eq!(source.call_count(), 0);
        assert_eq!(cache.get_rate("USD"), Some(0.0013));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_refresh_single_flight() {
        let source = Arc::new(MockSource::ok());
        let cache = RateCache::new(source.clone());

        let mut handles = Vec::new();
        for _ in 0..8 {
            let cache = cache.clone();
            handles.push(tokio::spawn(async move { cache.refresh().await }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(source.call_count(), 1);
        assert_eq!(cache.get_rate("USD"), Some(0.0012));
    }

    #[test]
    fn test_get_rate_on_empty_cache() {
        let cache = RateCache::new(Arc::new(MockSource::ok()));
        assert_eq!(cache.get_rate("USD"), None);
        assert!(!cache.is_fresh());
    }
}
