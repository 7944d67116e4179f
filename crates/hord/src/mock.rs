//! Closure-configured mock database.
//!
//! [`MockDatabase`] satisfies [`Database`] by calling user-supplied closures,
//! so tests can simulate any backend behavior (hits, misses, outages) without
//! writing a new trait implementation. Every closure is optional; an unset
//! operation takes the happy path:
//!
//! | Operation | Default |
//! |-----------|---------|
//! | `setup`, `health_check`, `set`, `delete` | `Ok(())` |
//! | `get` | `Ok(Bytes::new())` |
//! | `keys` | `Ok(vec![])` |
//! | `close` | no-op |
//!
//! # Example
//!
//! ```
//! use bytes::Bytes;
//! use hord::{Database, DatabaseError, mock::MockDatabase};
//!
//! # tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap().block_on(async {
//! let db = MockDatabase::builder()
//!     .get(|key| match key {
//!         "works" => Ok(Bytes::from("yes")),
//!         _ => Err(DatabaseError::not_found(key)),
//!     })
//!     .set(|key, _| match key {
//!         "works" => Ok(()),
//!         _ => Err(DatabaseError::internal("error inserting data")),
//!     })
//!     .build();
//!
//! assert_eq!(db.get("works").await.unwrap(), Bytes::from("yes"));
//! assert!(db.get("doesntwork").await.unwrap_err().is_not_found());
//! assert!(db.set("doesntwork", Bytes::from("x")).await.is_err());
//! # });
//! ```

use std::{fmt, sync::Arc};

use async_trait::async_trait;
use bytes::Bytes;

use crate::{database::Database, error::DatabaseResult};

type UnitFn = Arc<dyn Fn() -> DatabaseResult<()> + Send + Sync>;
type GetFn = Arc<dyn Fn(&str) -> DatabaseResult<Bytes> + Send + Sync>;
type SetFn = Arc<dyn Fn(&str, Bytes) -> DatabaseResult<()> + Send + Sync>;
type DeleteFn = Arc<dyn Fn(&str) -> DatabaseResult<()> + Send + Sync>;
type KeysFn = Arc<dyn Fn() -> DatabaseResult<Vec<String>> + Send + Sync>;
type CloseFn = Arc<dyn Fn() + Send + Sync>;

/// A [`Database`] whose behavior is defined by closures.
///
/// Cloning shares the closures.
#[derive(Clone, Default)]
pub struct MockDatabase {
    setup_fn: Option<UnitFn>,
    health_check_fn: Option<UnitFn>,
    get_fn: Option<GetFn>,
    set_fn: Option<SetFn>,
    delete_fn: Option<DeleteFn>,
    keys_fn: Option<KeysFn>,
    close_fn: Option<CloseFn>,
}

impl MockDatabase {
    /// Creates a mock where every operation takes the happy path.
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts configuring a mock.
    pub fn builder() -> MockDatabaseBuilder {
        MockDatabaseBuilder { mock: Self::default() }
    }
}

impl fmt::Debug for MockDatabase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockDatabase")
            .field("setup", &self.setup_fn.is_some())
            .field("health_check", &self.health_check_fn.is_some())
            .field("get", &self.get_fn.is_some())
            .field("set", &self.set_fn.is_some())
            .field("delete", &self.delete_fn.is_some())
            .field("keys", &self.keys_fn.is_some())
            .field("close", &self.close_fn.is_some())
            .finish()
    }
}

/// Builder for [`MockDatabase`].
#[must_use]
pub struct MockDatabaseBuilder {
    mock: MockDatabase,
}

impl MockDatabaseBuilder {
    /// Overrides `setup`.
    pub fn setup<F>(mut self, f: F) -> Self
    where
        F: Fn() -> DatabaseResult<()> + Send + Sync + 'static,
    {
        self.mock.setup_fn = Some(Arc::new(f));
        self
    }

    /// Overrides `health_check`.
    pub fn health_check<F>(mut self, f: F) -> Self
    where
        F: Fn() -> DatabaseResult<()> + Send + Sync + 'static,
    {
        self.mock.health_check_fn = Some(Arc::new(f));
        self
    }

    /// Overrides `get`.
    pub fn get<F>(mut self, f: F) -> Self
    where
        F: Fn(&str) -> DatabaseResult<Bytes> + Send + Sync + 'static,
    {
        self.mock.get_fn = Some(Arc::new(f));
        self
    }

    /// Overrides `set`.
    pub fn set<F>(mut self, f: F) -> Self
    where
        F: Fn(&str, Bytes) -> DatabaseResult<()> + Send + Sync + 'static,
    {
        self.mock.set_fn = Some(Arc::new(f));
        self
    }

    /// Overrides `delete`.
    pub fn delete<F>(mut self, f: F) -> Self
    where
        F: Fn(&str) -> DatabaseResult<()> + Send + Sync + 'static,
    {
        self.mock.delete_fn = Some(Arc::new(f));
        self
    }

    /// Overrides `keys`.
    pub fn keys<F>(mut self, f: F) -> Self
    where
        F: Fn() -> DatabaseResult<Vec<String>> + Send + Sync + 'static,
    {
        self.mock.keys_fn = Some(Arc::new(f));
        self
    }

    /// Registers a hook observed on `close`.
    pub fn on_close<F>(mut self, f: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.mock.close_fn = Some(Arc::new(f));
        self
    }

    /// Finishes the mock.
    #[must_use]
    pub fn build(self) -> MockDatabase {
        self.mock
    }
}

#[async_trait]
impl Database for MockDatabase {
    async fn setup(&self) -> DatabaseResult<()> {
        self.setup_fn.as_ref().map_or(Ok(()), |f| f())
    }

    async fn health_check(&self) -> DatabaseResult<()> {
        self.health_check_fn.as_ref().map_or(Ok(()), |f| f())
    }

    async fn get(&self, key: &str) -> DatabaseResult<Bytes> {
        self.get_fn.as_ref().map_or_else(|| Ok(Bytes::new()), |f| f(key))
    }

    async fn set(&self, key: &str, value: Bytes) -> DatabaseResult<()> {
        self.set_fn.as_ref().map_or(Ok(()), |f| f(key, value))
    }

    async fn delete(&self, key: &str) -> DatabaseResult<()> {
        self.delete_fn.as_ref().map_or(Ok(()), |f| f(key))
    }

    async fn keys(&self) -> DatabaseResult<Vec<String>> {
        self.keys_fn.as_ref().map_or_else(|| Ok(Vec::new()), |f| f())
    }

    async fn close(&self) {
        if let Some(f) = &self.close_fn {
            f();
        }
    }
}
