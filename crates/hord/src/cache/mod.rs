//! Cache strategy selection.
//!
//! [`dial`] turns a [`Config`] naming a durable store, a cache store and a
//! [`CacheType`] into a single [`Database`] handle:
//!
//! | `cache_type` | Result |
//! |--------------|--------|
//! | `Some(CacheType::Lookaside)` | a [`Lookaside`] over both handles |
//! | `Some(CacheType::None)` | the durable handle itself; the cache is ignored |
//! | `None` | [`DatabaseError::NoType`] |
//!
//! Both handles are required regardless of the strategy. Use
//! [`NilCache`] as the cache when a `None` strategy has no real cache.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use hord::{
//!     HashMapDatabase, MokaConfig, MokaDatabase,
//!     cache::{self, CacheType, Config},
//! };
//!
//! let db = cache::dial(Config {
//!     database: Some(Arc::new(HashMapDatabase::new())),
//!     cache: Some(Arc::new(MokaDatabase::new(MokaConfig::default()))),
//!     cache_type: Some("lookaside".parse().unwrap()),
//! })
//! .unwrap();
//! # let _ = db;
//! ```

pub mod lookaside;
mod nil;

use std::{fmt, str::FromStr, sync::Arc};

pub use lookaside::Lookaside;
pub use nil::NilCache;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    database::Database,
    error::{DatabaseError, DatabaseResult},
};

/// The caching strategy applied by [`dial`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheType {
    /// Wrap the durable store with a look-aside cache.
    Lookaside,
    /// Use the durable store directly.
    None,
}

impl CacheType {
    /// Returns the lowercase configuration name.
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheType::Lookaside => "lookaside",
            CacheType::None => "none",
        }
    }
}

impl fmt::Display for CacheType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CacheType {
    type Err = DatabaseError;

    /// Parses `"lookaside"` or `"none"`, ignoring ASCII case.
    ///
    /// Any other name is [`DatabaseError::NoType`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("lookaside") {
            Ok(CacheType::Lookaside)
        } else if s.eq_ignore_ascii_case("none") {
            Ok(CacheType::None)
        } else {
            Err(DatabaseError::NoType)
        }
    }
}

/// Configuration for [`dial`].
#[derive(Clone, Default)]
pub struct Config {
    /// The durable store.
    pub database: Option<Arc<dyn Database>>,
    /// The cache store.
    pub cache: Option<Arc<dyn Database>>,
    /// The strategy to apply; unset is an error.
    pub cache_type: Option<CacheType>,
}

/// Builds a database handle from `config`.
///
/// # Errors
///
/// Checked in order:
///
/// - [`DatabaseError::InvalidDatabase`] if `config.database` or `config.cache` is `None`
/// - [`DatabaseError::NoType`] if `config.cache_type` is `None`
pub fn dial(config: Config) -> DatabaseResult<Arc<dyn Database>> {
    let database = config.database.ok_or(DatabaseError::InvalidDatabase)?;
    let cache = config.cache.ok_or(DatabaseError::InvalidDatabase)?;

    match config.cache_type {
        Some(CacheType::Lookaside) => {
            let driver = lookaside::dial(lookaside::Config {
                database: Some(database),
                cache: Some(cache),
            })?;
            Ok(Arc::new(driver))
        },
        Some(CacheType::None) => {
            debug!("cache disabled, using database directly");
            Ok(database)
        },
        None => Err(DatabaseError::NoType),
    }
}
