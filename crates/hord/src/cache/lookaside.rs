//! Look-aside cache driver.
//!
//! [`Lookaside`] composes two [`Database`] handles, a durable `data` store and
//! a fast but lossy `cache` store, behind a single [`Database`] façade.
//!
//! # Protocol
//!
//! - **`get`**: cache first. A hit returns immediately. A miss (`NotFound`) falls back to the
//!   durable store, and a durable hit is written back into the cache. Any other cache error is
//!   returned as-is and the durable store is not consulted, so a broken cache never floods the
//!   durable store.
//! - **`set`**: durable store first; the cache is written only after the durable write succeeded.
//!   There is no rollback: a failed cache write leaves the cache stale until the next miss refills
//!   it.
//! - **`delete`**, **`health_check`**: both stores are always called; the durable store's error
//!   wins.
//! - **`setup`**: durable store, then cache; stops at the first error.
//! - **`keys`**: durable store only. The cache may hold any subset of keys.
//! - **`close`**: closes both stores.
//!
//! Cache-side failures that happen after the durable store succeeded are
//! reported as [`DatabaseError::CacheRefill`] (from `get`, carrying the value)
//! or [`DatabaseError::CacheWrite`] (from `set`).
//!
//! # Concurrency
//!
//! The driver holds no locks of its own. Each call performs at most two
//! sequential calls into the inner handles; concurrent callers may interleave
//! at the inner-store level.
//!
//! # Usage
//!
//! ```
//! use std::sync::Arc;
//!
//! use bytes::Bytes;
//! use hord::{
//!     Database, HashMapDatabase, MokaConfig, MokaDatabase,
//!     cache::lookaside::{self, Config},
//! };
//!
//! # tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap().block_on(async {
//! let db = lookaside::dial(Config {
//!     database: Some(Arc::new(HashMapDatabase::new())),
//!     cache: Some(Arc::new(MokaDatabase::new(MokaConfig::default()))),
//! })
//! .unwrap();
//!
//! db.setup().await.unwrap();
//! db.set("key", Bytes::from("value")).await.unwrap();
//! assert_eq!(db.get("key").await.unwrap(), Bytes::from("value"));
//! # });
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use tracing::{debug, trace, warn};

use crate::{
    database::Database,
    error::{DatabaseError, DatabaseResult},
    metrics::CacheMetrics,
    validation::{valid_data, valid_key},
};

/// Configuration for [`dial`].
///
/// Both handles must already be dialed; `dial` does not call `setup`.
#[derive(Clone, Default)]
pub struct Config {
    /// The durable store, authoritative for every key.
    pub database: Option<Arc<dyn Database>>,
    /// The cache store.
    pub cache: Option<Arc<dyn Database>>,
}

/// Creates a [`Lookaside`] driver from `config`.
///
/// # Errors
///
/// [`DatabaseError::InvalidDatabase`] if either `config.database` or
/// `config.cache` is `None`.
pub fn dial(config: Config) -> DatabaseResult<Lookaside> {
    let data = config.database.ok_or(DatabaseError::InvalidDatabase)?;
    let cache = config.cache.ok_or(DatabaseError::InvalidDatabase)?;
    debug!("dialed look-aside cache");
    Ok(Lookaside::new(data, cache))
}

/// A [`Database`] that caches a durable store with the look-aside pattern.
///
/// Cloning shares both inner handles and the metrics.
#[derive(Clone)]
pub struct Lookaside {
    data: Arc<dyn Database>,
    cache: Arc<dyn Database>,
    metrics: CacheMetrics,
}

impl Lookaside {
    /// Wraps `data` with `cache`.
    pub fn new(data: Arc<dyn Database>, cache: Arc<dyn Database>) -> Self {
        Self { data, cache, metrics: CacheMetrics::new() }
    }

    /// Lists the keys currently held by the cache store.
    ///
    /// This reflects cache-only state and is not a view of the full keyspace.
    pub async fn cache_keys(&self) -> DatabaseResult<Vec<String>> {
        self.cache.keys().await
    }

    /// Returns the durable store.
    ///
    /// Closing it while a call through this driver is in flight has whatever
    /// effect the store's own `close` has on in-flight calls.
    pub fn database(&self) -> &Arc<dyn Database> {
        &self.data
    }

    /// Returns the cache store.
    ///
    /// The same caveat as [`database`](Self::database) applies to closing it.
    pub fn cache(&self) -> &Arc<dyn Database> {
        &self.cache
    }

    /// Returns the hit/miss counters for this driver.
    pub fn metrics(&self) -> &CacheMetrics {
        &self.metrics
    }
}

/// Returns the durable side's error if there is one, otherwise the cache side's.
fn prefer_data_error(data: DatabaseResult<()>, cache: DatabaseResult<()>) -> DatabaseResult<()> {
    data?;
    cache
}

#[async_trait]
impl Database for Lookaside {
    #[tracing::instrument(skip(self))]
    async fn setup(&self) -> DatabaseResult<()> {
        self.data.setup().await?;
        self.cache.setup().await
    }

    #[tracing::instrument(skip(self))]
    async fn health_check(&self) -> DatabaseResult<()> {
        let data = self.data.health_check().await;
        let cache = self.cache.health_check().await;
        prefer_data_error(data, cache)
    }

    #[tracing::instrument(skip(self))]
    async fn get(&self, key: &str) -> DatabaseResult<Bytes> {
        valid_key(key)?;

        match self.cache.get(key).await {
            Ok(value) => {
                self.metrics.record_hit();
                trace!("cache hit");
                return Ok(value);
            },
            Err(err) if err.is_not_found() => {
                self.metrics.record_miss();
                trace!("cache miss");
            },
            Err(err) => {
                self.metrics.record_cache_error();
                return Err(err);
            },
        }

        let value = self.data.get(key).await?;

        if let Err(err) = self.cache.set(key, value.clone()).await {
            self.metrics.record_refill_failure();
            warn!(error = %err, "cache refill failed");
            return Err(DatabaseError::CacheRefill {
                key: key.to_owned(),
                value,
                source: Box::new(err),
            });
        }

        Ok(value)
    }

    #[tracing::instrument(skip(self, value), fields(value_len = value.len()))]
    async fn set(&self, key: &str, value: Bytes) -> DatabaseResult<()> {
        valid_key(key)?;
        valid_data(&value)?;

        self.data.set(key, value.clone()).await?;

        self.cache.set(key, value).await.map_err(|err| {
            self.metrics.record_cache_write_failure();
            warn!(error = %err, "cache write failed after durable commit");
            DatabaseError::CacheWrite { key: key.to_owned(), source: Box::new(err) }
        })
    }

    #[tracing::instrument(skip(self))]
    async fn delete(&self, key: &str) -> DatabaseResult<()> {
        valid_key(key)?;

        let data = self.data.delete(key).await;
        let cache = self.cache.delete(key).await;
        prefer_data_error(data, cache)
    }

    #[tracing::instrument(skip(self))]
    async fn keys(&self) -> DatabaseResult<Vec<String>> {
        self.data.keys().await
    }

    #[tracing::instrument(skip(self))]
    async fn close(&self) {
        self.data.close().await;
        self.cache.close().await;
    }
}
