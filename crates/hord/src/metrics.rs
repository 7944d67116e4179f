//! Cache effectiveness metrics for the look-aside driver.
//!
//! [`CacheMetrics`] counts how reads and writes through a
//! [`Lookaside`](crate::cache::lookaside::Lookaside) resolved: cache hits,
//! misses served by the durable store, cache failures that aborted a read,
//! failed cache refills and failed post-commit cache writes.
//!
//! # Memory Ordering
//!
//! All counters are independent and monotonically increasing, so every atomic
//! operation uses `Ordering::Relaxed`. A [`snapshot`](CacheMetrics::snapshot)
//! reads the counters one after another and may be slightly inconsistent
//! relative to concurrent updates.
//!
//! # Usage
//!
//! ```
//! use hord::metrics::CacheMetrics;
//!
//! let metrics = CacheMetrics::new();
//! metrics.record_hit();
//! metrics.record_miss();
//!
//! let snapshot = metrics.snapshot();
//! assert_eq!(snapshot.hits, 1);
//! assert_eq!(snapshot.hit_rate(), 0.5);
//! ```

use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

use tracing::{info, warn};

/// Cache error rate above which [`CacheMetrics::log_metrics`] warns.
const CACHE_ERROR_RATE_WARN_THRESHOLD: f64 = 0.05;

/// Point-in-time copy of [`CacheMetrics`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheMetricsSnapshot {
    /// Reads answered by the cache.
    pub hits: u64,
    /// Reads that fell through to the durable store.
    pub misses: u64,
    /// Reads aborted because the cache returned a non-absence error.
    pub cache_errors: u64,
    /// Durable reads whose cache refill failed.
    pub refill_failures: u64,
    /// Durable writes whose follow-up cache write failed.
    pub cache_write_failures: u64,
}

impl CacheMetricsSnapshot {
    /// Returns the total number of reads observed.
    pub fn total_reads(&self) -> u64 {
        self.hits + self.misses + self.cache_errors
    }

    /// Returns the fraction of reads served from the cache (0.0 when idle).
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 { 0.0 } else { self.hits as f64 / total as f64 }
    }

    /// Returns the fraction of reads that failed on the cache side.
    pub fn cache_error_rate(&self) -> f64 {
        let total = self.total_reads();
        if total == 0 {
            0.0
        } else {
            (self.cache_errors + self.refill_failures) as f64 / total as f64
        }
    }
}

/// Lock-free counters describing cache behavior.
///
/// Cloning shares the counters.
#[derive(Clone, Default)]
pub struct CacheMetrics {
    inner: Arc<CacheMetricsInner>,
}

#[derive(Default)]
struct CacheMetricsInner {
    hits: AtomicU64,
    misses: AtomicU64,
    cache_errors: AtomicU64,
    refill_failures: AtomicU64,
    cache_write_failures: AtomicU64,
}

impl CacheMetrics {
    /// Creates a zeroed metrics collector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a read answered by the cache.
    pub fn record_hit(&self) {
        self.inner.hits.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a read that fell through to the durable store.
    pub fn record_miss(&self) {
        self.inner.misses.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a read aborted by a cache error.
    pub fn record_cache_error(&self) {
        self.inner.cache_errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a failed cache refill after a durable read.
    pub fn record_refill_failure(&self) {
        self.inner.refill_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a failed cache write after a durable write.
    pub fn record_cache_write_failure(&self) {
        self.inner.cache_write_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Returns the current counter values.
    #[must_use]
    pub fn snapshot(&self) -> CacheMetricsSnapshot {
        CacheMetricsSnapshot {
            hits: self.inner.hits.load(Ordering::Relaxed),
            misses: self.inner.misses.load(Ordering::Relaxed),
            cache_errors: self.inner.cache_errors.load(Ordering::Relaxed),
            refill_failures: self.inner.refill_failures.load(Ordering::Relaxed),
            cache_write_failures: self.inner.cache_write_failures.load(Ordering::Relaxed),
        }
    }

    /// Resets all counters to zero.
    pub fn reset(&self) {
        self.inner.hits.store(0, Ordering::Relaxed);
        self.inner.misses.store(0, Ordering::Relaxed);
        self.inner.cache_errors.store(0, Ordering::Relaxed);
        self.inner.refill_failures.store(0, Ordering::Relaxed);
        self.inner.cache_write_failures.store(0, Ordering::Relaxed);
    }

    /// Logs the current counters at INFO level.
    pub fn log_metrics(&self) {
        let snapshot = self.snapshot();

        if snapshot.total_reads() == 0 && snapshot.cache_write_failures == 0 {
            return;
        }

        info!(
            hits = snapshot.hits,
            misses = snapshot.misses,
            cache_errors = snapshot.cache_errors,
            refill_failures = snapshot.refill_failures,
            cache_write_failures = snapshot.cache_write_failures,
            hit_rate = snapshot.hit_rate(),
            "Look-aside cache metrics snapshot"
        );

        if snapshot.cache_error_rate() > CACHE_ERROR_RATE_WARN_THRESHOLD {
            warn!(
                cache_error_rate = snapshot.cache_error_rate(),
                cache_errors = snapshot.cache_errors,
                refill_failures = snapshot.refill_failures,
                "High cache error rate detected"
            );
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn idle_rates_are_zero() {
        let snapshot = CacheMetrics::new().snapshot();
        assert_eq!(snapshot, CacheMetricsSnapshot::default());
        assert_eq!(snapshot.hit_rate(), 0.0);
        assert_eq!(snapshot.cache_error_rate(), 0.0);
    }

    #[test]
    fn counters_accumulate_and_reset() {
        let metrics = CacheMetrics::new();
        metrics.record_hit();
        metrics.record_hit();
        metrics.record_hit();
        metrics.record_miss();
        metrics.record_cache_error();
        metrics.record_refill_failure();
        metrics.record_cache_write_failure();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.hits, 3);
        assert_eq!(snapshot.misses, 1);
        assert_eq!(snapshot.total_reads(), 5);
        assert_eq!(snapshot.hit_rate(), 0.75);
        assert_eq!(snapshot.cache_error_rate(), 0.4);
        assert_eq!(snapshot.cache_write_failures, 1);

        metrics.reset();
        assert_eq!(metrics.snapshot(), CacheMetricsSnapshot::default());
    }

    #[test]
    fn clones_share_counters() {
        let metrics = CacheMetrics::new();
        let other = metrics.clone();
        other.record_miss();
        assert_eq!(metrics.snapshot().misses, 1);
    }
}
