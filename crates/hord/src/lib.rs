//! A uniform key-value database contract with swappable backends and a
//! look-aside cache.
//!
//! This crate provides the [`Database`] trait, a small capability contract
//! (setup, health check, get, set, delete, list keys, close) that lets callers
//! treat very different stores as interchangeable. On top of it sits the
//! [`Lookaside`](cache::Lookaside) driver, which composes a durable store with
//! a cache store and is itself a [`Database`].
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      Application                            │
//! │                 Arc<dyn Database> handle                    │
//! ├─────────────────────────────────────────────────────────────┤
//! │                    cache::dial                              │
//! │        CacheType::Lookaside  │  CacheType::None             │
//! ├──────────────────────────────┼──────────────────────────────┤
//! │          Lookaside           │                              │
//! │   cache-first get, refill    │      (durable handle         │
//! │   durable-first set          │        used directly)        │
//! ├──────────────┬───────────────┴──────────────────────────────┤
//! │  cache side  │                durable side                  │
//! │ MokaDatabase │  HashMapDatabase  │  any other Database      │
//! └──────────────┴──────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```
//! use std::sync::Arc;
//!
//! use bytes::Bytes;
//! use hord::{
//!     Database, HashMapDatabase, MokaConfig, MokaDatabase,
//!     cache::{self, CacheType, Config},
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = cache::dial(Config {
//!         database: Some(Arc::new(HashMapDatabase::new())),
//!         cache: Some(Arc::new(MokaDatabase::new(MokaConfig::default()))),
//!         cache_type: Some(CacheType::Lookaside),
//!     })?;
//!
//!     db.setup().await?;
//!     db.set("user:123", Bytes::from("Alice")).await?;
//!
//!     let value = db.get("user:123").await?;
//!     assert_eq!(value, Bytes::from("Alice"));
//!
//!     db.close().await;
//!     Ok(())
//! }
//! ```
//!
//! # Available Backends
//!
//! | Backend | Role | Persistence |
//! |---------|------|-------------|
//! | [`HashMapDatabase`] | Durable side in tests, reference implementation | No |
//! | [`MokaDatabase`] | Cache side (capacity and TTL eviction) | No |
//! | [`MockDatabase`](mock::MockDatabase) | Closure-driven test double | No |
//! | [`NilCache`](cache::NilCache) | Placeholder cache, always disconnected | No |
//!
//! # Error Handling
//!
//! All operations return [`DatabaseResult<T>`]. Branch on
//! [`DatabaseError::kind`] rather than on messages; absence is
//! [`DatabaseError::NotFound`], never an empty value.
//!
//! # Feature Flags
//!
//! - **`testutil`**: Enables the `testutil` module with shared test helpers (key/value generators,
//!   a pre-populated database, assertion macros) and the `conformance` suite. Enable this in
//!   `[dev-dependencies]` for integration tests.

#![deny(unsafe_code)]

pub mod cache;
#[cfg(feature = "testutil")]
#[allow(clippy::expect_used, clippy::panic)]
pub mod conformance;
pub mod database;
pub mod error;
pub mod hashmap;
pub mod metrics;
pub mod mock;
pub mod moka_cache;
#[cfg(any(test, feature = "testutil"))]
#[allow(clippy::expect_used)]
pub mod testutil;
pub mod validation;

// Re-export primary types at crate root for convenience
pub use database::Database;
pub use error::{BoxError, ConfigError, DatabaseError, DatabaseResult, ErrorKind};
pub use hashmap::HashMapDatabase;
pub use metrics::{CacheMetrics, CacheMetricsSnapshot};
pub use moka_cache::{MokaConfig, MokaConfigBuilder, MokaDatabase};
pub use validation::{valid_data, valid_key};
