//! The database capability contract.
//!
//! This module defines the [`Database`] trait that every backend and every
//! composite driver implements. The contract is deliberately small: no
//! transactions, no range scans, no batches. That is what lets an in-process
//! map, an embedded file store, a networked cache and a column database all
//! conform without leaking their own semantics to callers.
//!
//! # Implementing a Backend
//!
//! 1. Validate inputs with [`valid_key`](crate::validation::valid_key) and
//!    [`valid_data`](crate::validation::valid_data) before any I/O.
//! 2. Return [`DatabaseError::NotFound`](crate::DatabaseError::NotFound) from
//!    `get` when the key is absent, never an empty value.
//! 3. Make `delete` of an absent key succeed.
//! 4. After `close`, fail every operation with
//!    [`DatabaseError::NoConnection`](crate::DatabaseError::NoConnection).
//! 5. Run the `conformance` suite (feature `testutil`) against it.
//!
//! See [`HashMapDatabase`](crate::HashMapDatabase) for a reference implementation.

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::DatabaseResult;

/// A uniform key-value database handle.
///
/// Implementations must be safe to share between tasks (`Send + Sync`); the
/// trait is object-safe so handles are usually held as `Arc<dyn Database>`.
///
/// # Operations
///
/// | Method | Success | Notable failures |
/// |--------|---------|------------------|
/// | [`setup`](Database::setup) | storage prepared; idempotent | backend unreachable |
/// | [`health_check`](Database::health_check) | backend reachable and serving | degraded backend |
/// | [`get`](Database::get) | value bytes | `InvalidKey`, `NotFound` |
/// | [`set`](Database::set) | value stored, overwriting | `InvalidKey`, `InvalidData` |
/// | [`delete`](Database::delete) | key removed; absent key is fine | `InvalidKey` |
/// | [`keys`](Database::keys) | every stored key, unordered | backend I/O |
/// | [`close`](Database::close) | resources released | none |
///
/// # Example
///
/// ```
/// use bytes::Bytes;
/// use hord::{Database, HashMapDatabase};
///
/// # tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap().block_on(async {
/// let db = HashMapDatabase::new();
/// db.setup().await.unwrap();
///
/// db.set("key", Bytes::from("value")).await.unwrap();
/// assert_eq!(db.get("key").await.unwrap(), Bytes::from("value"));
/// # });
/// ```
#[async_trait]
pub trait Database: Send + Sync {
    /// Prepares the underlying storage (schema, bucket, keyspace, ...).
    ///
    /// Safe to call after every dial; calling it again is a no-op.
    #[must_use = "database operations may fail and errors must be handled"]
    async fn setup(&self) -> DatabaseResult<()>;

    /// Confirms the backend is reachable and serving.
    ///
    /// An error means the handle should be treated as untrustworthy.
    #[must_use = "health check results indicate backend availability and must be inspected"]
    async fn health_check(&self) -> DatabaseResult<()>;

    /// Fetches the value stored at `key`.
    ///
    /// # Returns
    ///
    /// - `Ok(bytes)` if the key exists
    /// - `Err(DatabaseError::NotFound { .. })` if it does not
    /// - `Err(...)` on invalid input or storage errors
    #[must_use = "database operations may fail and errors must be handled"]
    async fn get(&self, key: &str) -> DatabaseResult<Bytes>;

    /// Stores `value` at `key`, overwriting any previous value.
    #[must_use = "database operations may fail and errors must be handled"]
    async fn set(&self, key: &str, value: Bytes) -> DatabaseResult<()>;

    /// Removes `key` and its value.
    ///
    /// If the key doesn't exist, this is a no-op (returns `Ok(())`).
    #[must_use = "database operations may fail and errors must be handled"]
    async fn delete(&self, key: &str) -> DatabaseResult<()>;

    /// Lists every key currently stored, in no particular order.
    ///
    /// This may scan the whole store; do not assume it is cheap.
    #[must_use = "database operations may fail and errors must be handled"]
    async fn keys(&self) -> DatabaseResult<Vec<String>>;

    /// Releases the handle's resources.
    ///
    /// Every later operation on this handle fails with
    /// [`NoConnection`](crate::DatabaseError::NoConnection).
    async fn close(&self);
}
