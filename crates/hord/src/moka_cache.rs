//! Bounded in-memory cache database.
//!
//! [`MokaDatabase`] implements [`Database`] on top of a [`moka`] cache, so
//! entries may be evicted by capacity or expire by TTL at any time. That makes
//! it a natural fit for the `cache` side of a
//! [`Lookaside`](crate::cache::lookaside::Lookaside) driver: the composite
//! never relies on the cache holding the full keyspace.
//!
//! # Usage
//!
//! ```no_run
//! # use std::time::Duration;
//! # use hord::{Database, MokaConfig, MokaDatabase};
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = MokaConfig::builder()
//!     .max_entries(10_000)
//!     .ttl(Duration::from_secs(60))
//!     .build()?;
//! let cache = MokaDatabase::new(config);
//!
//! cache.setup().await?;
//! cache.set("key", "value".into()).await?;
//! # Ok(())
//! # }
//! ```

use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};

use async_trait::async_trait;
use bytes::Bytes;
use moka::future::Cache;
use serde::{Deserialize, Serialize};

use crate::{
    database::Database,
    error::{ConfigError, DatabaseError, DatabaseResult},
    validation::{valid_data, valid_key},
};

// ───────────────────────────────────────────────────────────────────────────
// MokaConfig
// ───────────────────────────────────────────────────────────────────────────

/// Default maximum number of cache entries.
const DEFAULT_MAX_ENTRIES: u64 = 10_000;

/// Default entry TTL.
const DEFAULT_TTL: Duration = Duration::from_secs(60);

/// Minimum allowed entry TTL.
const MIN_TTL: Duration = Duration::from_secs(1);

/// Configuration for [`MokaDatabase`].
///
/// # Validation
///
/// - `max_entries` must be >= 1
/// - `ttl` must be >= 1 second
///
/// Every construction path validates: [`MokaConfigBuilder::build`] returns a
/// [`ConfigError`], and deserialization fails with the same error. A
/// `MokaConfig` value is therefore always usable by [`MokaDatabase::new`].
///
/// # Examples
///
/// ```
/// # use std::time::Duration;
/// # use hord::MokaConfig;
/// let config = MokaConfig::builder()
///     .max_entries(5_000)
///     .ttl(Duration::from_secs(120))
///     .build()
///     .expect("valid config");
/// assert_eq!(config.max_entries(), 5_000);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "MokaConfigFields")]
pub struct MokaConfig {
    /// Maximum number of entries held before eviction.
    max_entries: u64,

    /// Time-to-live of each entry.
    #[serde(with = "humantime_serde")]
    ttl: Duration,
}

/// Unvalidated wire form of [`MokaConfig`].
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct MokaConfigFields {
    #[serde(default = "default_max_entries")]
    max_entries: u64,

    #[serde(with = "humantime_serde", default = "default_ttl")]
    ttl: Duration,
}

impl TryFrom<MokaConfigFields> for MokaConfig {
    type Error = ConfigError;

    fn try_from(fields: MokaConfigFields) -> Result<Self, Self::Error> {
        let config = MokaConfig { max_entries: fields.max_entries, ttl: fields.ttl };
        config.validate()?;
        Ok(config)
    }
}

fn default_max_entries() -> u64 {
    DEFAULT_MAX_ENTRIES
}

fn default_ttl() -> Duration {
    DEFAULT_TTL
}

impl Default for MokaConfig {
    fn default() -> Self {
        Self { max_entries: DEFAULT_MAX_ENTRIES, ttl: DEFAULT_TTL }
    }
}

impl MokaConfig {
    /// Starts building a configuration from the defaults.
    pub fn builder() -> MokaConfigBuilder {
        MokaConfigBuilder { max_entries: DEFAULT_MAX_ENTRIES, ttl: DEFAULT_TTL }
    }

    /// Returns the maximum number of cache entries.
    pub fn max_entries(&self) -> u64 {
        self.max_entries
    }

    /// Returns the entry TTL.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Checks the configured values against their minimums.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::BelowMinimum`] if `max_entries` is 0 or `ttl` is
    /// less than 1 second.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_entries == 0 {
            return Err(ConfigError::BelowMinimum {
                field: "max_entries",
                value: self.max_entries.to_string(),
                min: "1".to_owned(),
            });
        }
        if self.ttl < MIN_TTL {
            return Err(ConfigError::BelowMinimum {
                field: "ttl",
                value: format!("{}ms", self.ttl.as_millis()),
                min: "1s".to_owned(),
            });
        }
        Ok(())
    }
}

/// Builder for [`MokaConfig`].
pub struct MokaConfigBuilder {
    max_entries: u64,
    ttl: Duration,
}

impl MokaConfigBuilder {
    /// Sets the maximum number of entries in the cache.
    pub fn max_entries(mut self, max_entries: u64) -> Self {
        self.max_entries = max_entries;
        self
    }

    /// Sets the TTL for cache entries.
    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Builds the [`MokaConfig`], validating all fields.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if:
    /// - `max_entries` is 0
    /// - `ttl` is less than 1 second
    pub fn build(self) -> Result<MokaConfig, ConfigError> {
        let config = MokaConfig { max_entries: self.max_entries, ttl: self.ttl };
        config.validate()?;
        Ok(config)
    }
}

// ───────────────────────────────────────────────────────────────────────────
// MokaDatabase
// ───────────────────────────────────────────────────────────────────────────

/// A bounded, expiring in-memory [`Database`].
///
/// Cloning is cheap and shares the underlying cache and closed flag.
#[derive(Clone)]
pub struct MokaDatabase {
    cache: Cache<String, Bytes>,
    closed: Arc<AtomicBool>,
    config: MokaConfig,
}

impl MokaDatabase {
    /// Creates a new cache database.
    ///
    /// `config` has already been validated by whichever path built it.
    pub fn new(config: MokaConfig) -> Self {
        let cache =
            Cache::builder().max_capacity(config.max_entries).time_to_live(config.ttl).build();
        Self { cache, closed: Arc::new(AtomicBool::new(false)), config }
    }

    /// Returns the configuration this database was built with.
    pub fn config(&self) -> &MokaConfig {
        &self.config
    }

    /// Returns cache statistics: `(current_entries, max_entries)`.
    ///
    /// The entry count is maintained lazily by moka and may lag recent writes.
    pub fn cache_stats(&self) -> (u64, u64) {
        (self.cache.entry_count(), self.config.max_entries)
    }

    fn ensure_open(&self) -> DatabaseResult<()> {
        if self.closed.load(Ordering::Acquire) {
            return Err(DatabaseError::NoConnection);
        }
        Ok(())
    }
}

#[async_trait]
impl Database for MokaDatabase {
    #[tracing::instrument(skip(self))]
    async fn setup(&self) -> DatabaseResult<()> {
        self.ensure_open()
    }

    #[tracing::instrument(skip(self))]
    async fn health_check(&self) -> DatabaseResult<()> {
        self.ensure_open()
    }

    #[tracing::instrument(skip(self))]
    async fn get(&self, key: &str) -> DatabaseResult<Bytes> {
        valid_key(key)?;
        self.ensure_open()?;

        self.cache.get(key).await.ok_or_else(|| DatabaseError::not_found(key))
    }

    #[tracing::instrument(skip(self, value), fields(value_len = value.len()))]
    async fn set(&self, key: &str, value: Bytes) -> DatabaseResult<()> {
        valid_key(key)?;
        valid_data(&value)?;
        self.ensure_open()?;

        self.cache.insert(key.to_owned(), value).await;
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn delete(&self, key: &str) -> DatabaseResult<()> {
        valid_key(key)?;
        self.ensure_open()?;

        self.cache.invalidate(key).await;
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn keys(&self) -> DatabaseResult<Vec<String>> {
        self.ensure_open()?;

        Ok(self.cache.iter().map(|(key, _)| key.as_ref().clone()).collect())
    }

    #[tracing::instrument(skip(self))]
    async fn close(&self) {
        self.closed.store(true, Ordering::Release);
        self.cache.invalidate_all();
    }
}
