//! Caching layer for congestion lookups.
//!
//! Congestion levels change slowly relative to search traffic, so lookups are
//! cached per (station, line, hour) for a short TTL. Concurrent misses on the
//! same key may both hit the provider and overwrite each other; the worst
//! outcome is a slightly stale level.
//!
//! Failures are remembered too. A key with no data answers `Normal` until its
//! failure entry expires, and an outage (transport error, timeout, 5xx)
//! suspends all calls to the provider for the same period, so a dead
//! service costs one timeout rather than one per edge.

use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

use moka::sync::Cache as MokaCache;
use tracing::{debug, warn};

use super::error::CongestionError;
use super::provider::CongestionProvider;
use crate::domain::{CongestionLevel, LineId, StationId};

/// Cache key: (station, line, hour of day).
type LevelKey = (StationId, LineId, u8);

/// Configuration for the cache.
#[derive(Debug, Clone)]
pub struct CongestionCacheConfig {
    /// TTL for cached entries.
    pub ttl: Duration,

    /// Maximum number of cached entries.
    pub max_capacity: u64,

    /// How long a failed lookup (or a provider outage) is answered with
    /// `Normal` before the provider is asked again.
    pub failure_ttl: Duration,
}

impl Default for CongestionCacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(5 * 60),
            max_capacity: 10_000,
            failure_ttl: Duration::from_secs(60),
        }
    }
}

/// Congestion provider with caching.
///
/// Wraps any provider. Successful lookups are cached for `ttl`; failed ones
/// fall back to `Normal` for `failure_ttl`.
pub struct CachedCongestion<P> {
    inner: P,
    levels: MokaCache<LevelKey, CongestionLevel>,
    fallbacks: MokaCache<LevelKey, CongestionLevel>,
    failure_ttl: Duration,
    suspended_until: Mutex<Option<Instant>>,
}

impl<P: CongestionProvider> CachedCongestion<P> {
    /// Create a new cached provider with the given configuration.
    pub fn new(inner: P, config: &CongestionCacheConfig) -> Self {
        let levels = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();
        let fallbacks = MokaCache::builder()
            .time_to_live(config.failure_ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self {
            inner,
            levels,
            fallbacks,
            failure_ttl: config.failure_ttl,
            suspended_until: Mutex::new(None),
        }
    }

    /// Access the underlying provider for lookups that bypass the cache.
    pub fn inner(&self) -> &P {
        &self.inner
    }

    /// Get cache statistics.
    pub fn entry_count(&self) -> u64 {
        self.levels.run_pending_tasks();
        self.levels.entry_count()
    }

    /// Invalidate all cached entries, including remembered failures.
    pub fn invalidate_all(&self) {
        self.levels.invalidate_all();
        self.fallbacks.invalidate_all();
        *self.suspended_until.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// Whether provider calls are currently suspended after an outage.
    pub fn is_suspended(&self) -> bool {
        self.suspended_until
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some_and(|until| Instant::now() < until)
    }

    fn suspend(&self) {
        *self.suspended_until.lock().unwrap_or_else(PoisonError::into_inner) =
            Some(Instant::now() + self.failure_ttl);
    }
}

impl<P: CongestionProvider> CongestionProvider for CachedCongestion<P> {
    fn lookup(
        &self,
        station: &StationId,
        line: &LineId,
        hour: u8,
    ) -> Result<CongestionLevel, CongestionError> {
        let key = (station.clone(), line.clone(), hour % 24);

        if let Some(level) = self.levels.get(&key) {
            return Ok(level);
        }
        if let Some(level) = self.fallbacks.get(&key) {
            return Ok(level);
        }
        if self.is_suspended() {
            return Ok(CongestionLevel::Normal);
        }

        match self.inner.lookup(station, line, hour % 24) {
            Ok(level) => {
                self.levels.insert(key, level);
                Ok(level)
            }
            Err(e) => {
                if e.is_outage() {
                    warn!(
                        error = %e,
                        retry_after_secs = self.failure_ttl.as_secs(),
                        "Congestion provider unavailable, using normal levels"
                    );
                    self.suspend();
                } else {
                    debug!(station = %station, line = %line, hour, error = %e, "No congestion data, caching normal");
                    self.fallbacks.insert(key, CongestionLevel::Normal);
                }
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn sid(s: &str) -> StationId {
        StationId::parse(s).unwrap()
    }

    fn lid(s: &str) -> LineId {
        LineId::parse(s).unwrap()
    }

    /// Counts calls; "BAD" has no data and "DOWN" behaves like a dead service.
    struct Counting {
        calls: AtomicUsize,
    }

    impl Counting {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl CongestionProvider for Counting {
        fn lookup(
            &self,
            station: &StationId,
            line: &LineId,
            hour: u8,
        ) -> Result<CongestionLevel, CongestionError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if station.as_str() == "DOWN" {
                return Err(CongestionError::Api {
                    status: 503,
                    message: "unavailable".into(),
                });
            }
            if station.as_str() == "BAD" {
                return Err(CongestionError::NoData {
                    station: station.to_string(),
                    line: line.to_string(),
                    hour,
                });
            }
            Ok(CongestionLevel::Busy)
        }
    }

    #[test]
    fn default_config() {
        let config = CongestionCacheConfig::default();
        assert_eq!(config.ttl, Duration::from_secs(300));
        assert_eq!(config.max_capacity, 10_000);
        assert_eq!(config.failure_ttl, Duration::from_secs(60));
    }

    #[test]
    fn second_lookup_hits_cache() {
        let cached = CachedCongestion::new(Counting::new(), &CongestionCacheConfig::default());

        let first = cached.lookup(&sid("S1"), &lid("A"), 8).unwrap();
        let second = cached.lookup(&sid("S1"), &lid("A"), 8).unwrap();

        assert_eq!(first, CongestionLevel::Busy);
        assert_eq!(second, CongestionLevel::Busy);
        assert_eq!(cached.inner().calls(), 1);
        assert_eq!(cached.entry_count(), 1);
    }

    #[test]
    fn keys_distinguish_hour_and_line() {
        let cached = CachedCongestion::new(Counting::new(), &CongestionCacheConfig::default());

        cached.lookup(&sid("S1"), &lid("A"), 8).unwrap();
        cached.lookup(&sid("S1"), &lid("A"), 9).unwrap();
        cached.lookup(&sid("S1"), &lid("B"), 8).unwrap();
        // 32 wraps to hour 8
        cached.lookup(&sid("S1"), &lid("A"), 32).unwrap();

        assert_eq!(cached.inner().calls(), 3);
    }

    #[test]
    fn missing_data_answered_normal_until_expiry() {
        let config = CongestionCacheConfig {
            failure_ttl: Duration::from_millis(50),
            ..CongestionCacheConfig::default()
        };
        let cached = CachedCongestion::new(Counting::new(), &config);

        assert!(cached.lookup(&sid("BAD"), &lid("A"), 8).is_err());
        assert_eq!(cached.lookup(&sid("BAD"), &lid("A"), 8).unwrap(), CongestionLevel::Normal);
        assert_eq!(cached.inner().calls(), 1);
        assert_eq!(cached.entry_count(), 0);
        assert!(!cached.is_suspended());

        // Other keys still reach the provider
        assert!(cached.lookup(&sid("BAD"), &lid("A"), 9).is_err());
        assert_eq!(cached.inner().calls(), 2);

        std::thread::sleep(Duration::from_millis(100));
        assert!(cached.lookup(&sid("BAD"), &lid("A"), 8).is_err());
        assert_eq!(cached.inner().calls(), 3);
    }

    #[test]
    fn outage_suspends_provider_calls() {
        let config = CongestionCacheConfig {
            failure_ttl: Duration::from_millis(50),
            ..CongestionCacheConfig::default()
        };
        let cached = CachedCongestion::new(Counting::new(), &config);

        assert!(cached.lookup(&sid("DOWN"), &lid("A"), 8).is_err());
        assert!(cached.is_suspended());
        // Any key, including healthy ones, is answered without a call
        assert_eq!(cached.lookup(&sid("S1"), &lid("A"), 8).unwrap(), CongestionLevel::Normal);
        assert_eq!(cached.lookup(&sid("S2"), &lid("B"), 9).unwrap(), CongestionLevel::Normal);
        assert_eq!(cached.inner().calls(), 1);

        std::thread::sleep(Duration::from_millis(100));
        assert!(!cached.is_suspended());
        assert_eq!(cached.lookup(&sid("S1"), &lid("A"), 8).unwrap(), CongestionLevel::Busy);
        assert_eq!(cached.inner().calls(), 2);
    }

    #[test]
    fn invalidate_clears_suspension() {
        let cached = CachedCongestion::new(Counting::new(), &CongestionCacheConfig::default());

        assert!(cached.lookup(&sid("DOWN"), &lid("A"), 8).is_err());
        assert!(cached.is_suspended());
        cached.invalidate_all();
        assert!(!cached.is_suspended());
        assert_eq!(cached.lookup(&sid("S1"), &lid("A"), 8).unwrap(), CongestionLevel::Busy);
    }

    #[test]
    fn invalidate_forces_refetch() {
        let cached = CachedCongestion::new(Counting::new(), &CongestionCacheConfig::default());

        cached.lookup(&sid("S1"), &lid("A"), 8).unwrap();
        cached.invalidate_all();
        cached.lookup(&sid("S1"), &lid("A"), 8).unwrap();

        assert_eq!(cached.inner().calls(), 2);
    }
}
