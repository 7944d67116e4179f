//! Partial failure tests for the look-aside driver.
//!
//! Uses real backends with switchable fault injection to check how the
//! durable store and the cache diverge when only one side fails, and how that
//! divergence heals.

#![allow(clippy::expect_used, clippy::panic, clippy::unwrap_used)]

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use async_trait::async_trait;
use bytes::Bytes;
use hord::{
    Database, DatabaseError, DatabaseResult, ErrorKind, HashMapDatabase, assert_kind,
    assert_not_found,
    cache::lookaside::{self, Config, Lookaside},
};

// ---------------------------------------------------------------------------
// FailingDatabase: switchable failure injection per operation
// ---------------------------------------------------------------------------

/// A wrapper around `HashMapDatabase` whose operations can be made to fail
/// with `DatabaseError::Connection` at runtime.
#[derive(Clone, Default)]
struct FailingDatabase {
    label: &'static str,
    inner: HashMapDatabase,
    fail_get: Arc<AtomicBool>,
    fail_set: Arc<AtomicBool>,
    fail_delete: Arc<AtomicBool>,
    fail_health: Arc<AtomicBool>,
}

impl FailingDatabase {
    fn named(label: &'static str) -> Self {
        Self { label, ..Self::default() }
    }

    fn check(&self, flag: &AtomicBool, op: &str) -> DatabaseResult<()> {
        if flag.load(Ordering::SeqCst) {
            let label = self.label;
            return Err(DatabaseError::connection(format!("simulated {label} {op} failure")));
        }
        Ok(())
    }

    fn fail_all(&self) {
        for flag in [&self.fail_get, &self.fail_set, &self.fail_delete, &self.fail_health] {
            flag.store(true, Ordering::SeqCst);
        }
    }
}

#[async_trait]
impl Database for FailingDatabase {
    async fn setup(&self) -> DatabaseResult<()> {
        self.inner.setup().await
    }

    async fn health_check(&self) -> DatabaseResult<()> {
        self.check(&self.fail_health, "health_check")?;
        self.inner.health_check().await
    }

    async fn get(&self, key: &str) -> DatabaseResult<Bytes> {
        self.check(&self.fail_get, "get")?;
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: Bytes) -> DatabaseResult<()> {
        self.check(&self.fail_set, "set")?;
        self.inner.set(key, value).await
    }

    async fn delete(&self, key: &str) -> DatabaseResult<()> {
        self.check(&self.fail_delete, "delete")?;
        self.inner.delete(key).await
    }

    async fn keys(&self) -> DatabaseResult<Vec<String>> {
        self.inner.keys().await
    }

    async fn close(&self) {
        self.inner.close().await;
    }
}

struct Harness {
    db: Lookaside,
    durable: FailingDatabase,
    cache: FailingDatabase,
}

fn harness() -> Harness {
    let durable = FailingDatabase::named("durable");
    let cache = FailingDatabase::named("cache");
    let db = lookaside::dial(Config {
        database: Some(Arc::new(durable.clone())),
        cache: Some(Arc::new(cache.clone())),
    })
    .expect("dial look-aside");
    Harness { db, durable, cache }
}

fn is_connection(err: &DatabaseError) -> bool {
    matches!(err, DatabaseError::Connection { .. })
}

// ---------------------------------------------------------------------------
// Read path
// ---------------------------------------------------------------------------

#[tokio::test]
async fn cache_outage_aborts_read_without_fallback() {
    let h = harness();
    h.durable.inner.set("k", Bytes::from("v")).await.unwrap();
    h.cache.fail_get.store(true, Ordering::SeqCst);

    let err = h.db.get("k").await.unwrap_err();
    assert!(is_connection(&err), "cache error must be returned as-is, got {err:?}");
    assert!(!err.is_cache_side());

    h.cache.fail_get.store(false, Ordering::SeqCst);
    assert_eq!(h.db.get("k").await.unwrap(), Bytes::from("v"));
}

#[tokio::test]
async fn refill_failure_carries_value_and_heals_on_next_read() {
    let h = harness();
    h.durable.inner.set("k", Bytes::from("v")).await.unwrap();
    h.cache.fail_set.store(true, Ordering::SeqCst);

    let err = h.db.get("k").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Cache);
    assert_eq!(err.refilled_value(), Some(&Bytes::from("v")));
    assert!(is_connection(err.cache_source().expect("cache source")));
    assert_not_found!(h.cache.inner.get("k").await, "failed refill must not populate cache");

    h.cache.fail_set.store(false, Ordering::SeqCst);
    assert_eq!(h.db.get("k").await.unwrap(), Bytes::from("v"));
    assert_eq!(h.cache.inner.get("k").await.unwrap(), Bytes::from("v"), "next miss refills");
}

#[tokio::test]
async fn durable_outage_on_miss_is_returned_verbatim() {
    let h = harness();
    h.durable.fail_get.store(true, Ordering::SeqCst);

    let err = h.db.get("k").await.unwrap_err();
    assert!(is_connection(&err), "got {err:?}");
    assert!(!err.is_cache_side());
}

#[tokio::test]
async fn cache_hit_survives_durable_outage() {
    let h = harness();
    h.db.set("k", Bytes::from("v")).await.unwrap();
    h.durable.fail_all();

    assert_eq!(h.db.get("k").await.unwrap(), Bytes::from("v"));
}

// ---------------------------------------------------------------------------
// Write path
// ---------------------------------------------------------------------------

#[tokio::test]
async fn durable_write_failure_leaves_cache_untouched() {
    let h = harness();
    h.durable.fail_set.store(true, Ordering::SeqCst);

    let err = h.db.set("k", Bytes::from("v")).await.unwrap_err();
    assert!(is_connection(&err), "got {err:?}");
    assert!(h.cache.inner.is_empty(), "cache must not see a write the durable store rejected");
}

#[tokio::test]
async fn cache_write_failure_leaves_stale_entry_until_removed() {
    let h = harness();
    h.db.set("k", Bytes::from("old")).await.unwrap();

    h.cache.fail_set.store(true, Ordering::SeqCst);
    let err = h.db.set("k", Bytes::from("new")).await.unwrap_err();
    assert!(matches!(err, DatabaseError::CacheWrite { .. }), "got {err:?}");
    assert_eq!(h.durable.inner.get("k").await.unwrap(), Bytes::from("new"), "durable committed");
    h.cache.fail_set.store(false, Ordering::SeqCst);

    // No rollback: reads are served from the stale cache entry.
    assert_eq!(h.db.get("k").await.unwrap(), Bytes::from("old"));

    // Removing the cache entry lets the next miss refill from the durable store.
    h.cache.inner.delete("k").await.unwrap();
    assert_eq!(h.db.get("k").await.unwrap(), Bytes::from("new"));
}

#[tokio::test]
async fn cache_delete_failure_reports_error_after_durable_delete() {
    let h = harness();
    h.db.set("k", Bytes::from("v")).await.unwrap();
    h.cache.fail_delete.store(true, Ordering::SeqCst);

    let err = h.db.delete("k").await.unwrap_err();
    assert!(is_connection(&err), "got {err:?}");
    assert_not_found!(h.durable.inner.get("k").await, "durable delete must still run");
    assert_eq!(h.cache.inner.get("k").await.unwrap(), Bytes::from("v"), "cache keeps stale entry");
}

#[tokio::test]
async fn both_deletes_fail_reports_durable_error() {
    let h = harness();
    h.durable.fail_delete.store(true, Ordering::SeqCst);
    h.cache.fail_delete.store(true, Ordering::SeqCst);

    let err = h.db.delete("k").await.unwrap_err();
    assert!(err.to_string().contains("simulated durable delete failure"), "got {err:?}");

    h.durable.fail_delete.store(false, Ordering::SeqCst);
    let err = h.db.delete("k").await.unwrap_err();
    assert!(err.to_string().contains("simulated cache delete failure"), "got {err:?}");
}

// ---------------------------------------------------------------------------
// Health, listing and metrics
// ---------------------------------------------------------------------------

#[tokio::test]
async fn health_check_surfaces_cache_outage() {
    let h = harness();
    h.db.health_check().await.unwrap();

    h.cache.fail_health.store(true, Ordering::SeqCst);
    assert!(is_connection(&h.db.health_check().await.unwrap_err()));
}

#[tokio::test]
async fn keys_ignore_cache_contents() {
    let h = harness();
    h.cache.inner.set("cache-only", Bytes::from("v")).await.unwrap();
    h.durable.inner.set("durable", Bytes::from("v")).await.unwrap();

    assert_eq!(h.db.keys().await.unwrap(), vec!["durable"]);
    assert_eq!(h.db.cache_keys().await.unwrap(), vec!["cache-only"]);
}

#[tokio::test]
async fn metrics_track_each_outcome() {
    let h = harness();
    h.durable.inner.set("k", Bytes::from("v")).await.unwrap();

    h.db.get("k").await.unwrap(); // miss + refill
    h.db.get("k").await.unwrap(); // hit

    h.cache.inner.delete("k").await.unwrap();
    h.cache.fail_set.store(true, Ordering::SeqCst);
    let _ = h.db.get("k").await; // miss + failed refill
    let _ = h.db.set("k", Bytes::from("v2")).await; // failed cache write
    h.cache.fail_set.store(false, Ordering::SeqCst);

    h.cache.fail_get.store(true, Ordering::SeqCst);
    let _ = h.db.get("k").await; // cache error

    let snapshot = h.db.metrics().snapshot();
    assert_eq!(snapshot.hits, 1);
    assert_eq!(snapshot.misses, 2);
    assert_eq!(snapshot.cache_errors, 1);
    assert_eq!(snapshot.refill_failures, 1);
    assert_eq!(snapshot.cache_write_failures, 1);
    assert_eq!(snapshot.total_reads(), 4);
    h.db.metrics().log_metrics();
}

#[tokio::test]
async fn invalid_input_never_reaches_either_store() {
    let h = harness();
    h.durable.fail_all();
    h.cache.fail_all();

    assert_kind!(h.db.get("").await, ErrorKind::InvalidKey);
    assert_kind!(h.db.set("k", Bytes::new()).await, ErrorKind::InvalidData);
    assert_kind!(h.db.delete("").await, ErrorKind::InvalidKey);
}
