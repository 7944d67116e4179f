//! In-process hashmap database.
//!
//! This module provides [`HashMapDatabase`], the simplest conforming
//! [`Database`]: a [`HashMap`] behind a [`parking_lot::RwLock`]. It is the
//! reference implementation for the contract and the usual durable side in
//! tests of the look-aside driver.
//!
//! # Example
//!
//! ```
//! use bytes::Bytes;
//! use hord::{Database, HashMapDatabase};
//!
//! #[tokio::main]
//! async fn main() {
//!     let db = HashMapDatabase::new();
//!     db.setup().await.unwrap();
//!
//!     db.set("greeting", Bytes::from("hello")).await.unwrap();
//!     let value = db.get("greeting").await.unwrap();
//!
//!     assert_eq!(value.as_ref(), b"hello");
//! }
//! ```
//!
//! # Limitations
//!
//! - Data is not persisted; everything is lost when the process exits
//! - [`close`](Database::close) discards the stored data

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::RwLock;

use crate::{
    database::Database,
    error::{DatabaseError, DatabaseResult},
    validation::{valid_data, valid_key},
};

/// In-memory database backed by a [`HashMap`].
///
/// # Cloning
///
/// `HashMapDatabase` is cheaply cloneable via [`Arc`]. All clones share the
/// same map, and closing any clone closes them all.
#[derive(Clone)]
pub struct HashMapDatabase {
    /// `None` once the handle has been closed.
    data: Arc<RwLock<Option<HashMap<String, Bytes>>>>,
}

impl HashMapDatabase {
    /// Creates a new, empty hashmap database.
    pub fn new() -> Self {
        Self { data: Arc::new(RwLock::new(Some(HashMap::new()))) }
    }

    /// Returns the number of stored keys, or `None` if closed.
    pub fn len(&self) -> Option<usize> {
        self.data.read().as_ref().map(HashMap::len)
    }

    /// Returns `true` if the database is open and holds no keys.
    pub fn is_empty(&self) -> bool {
        self.len() == Some(0)
    }
}

impl Default for HashMapDatabase {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Database for HashMapDatabase {
    #[tracing::instrument(skip(self))]
    async fn setup(&self) -> DatabaseResult<()> {
        if self.data.read().is_none() {
            return Err(DatabaseError::NoConnection);
        }
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn health_check(&self) -> DatabaseResult<()> {
        // Acquiring the read lock also proves we're not deadlocked.
        if self.data.read().is_none() {
            return Err(DatabaseError::NoConnection);
        }
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn get(&self, key: &str) -> DatabaseResult<Bytes> {
        valid_key(key)?;

        let guard = self.data.read();
        let data = guard.as_ref().ok_or(DatabaseError::NoConnection)?;
        data.get(key).cloned().ok_or_else(|| DatabaseError::not_found(key))
    }

    #[tracing::instrument(skip(self, value), fields(value_len = value.len()))]
    async fn set(&self, key: &str, value: Bytes) -> DatabaseResult<()> {
        valid_key(key)?;
        valid_data(&value)?;

        let mut guard = self.data.write();
        let data = guard.as_mut().ok_or(DatabaseError::NoConnection)?;
        data.insert(key.to_owned(), value);
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn delete(&self, key: &str) -> DatabaseResult<()> {
        valid_key(key)?;

        let mut guard = self.data.write();
        let data = guard.as_mut().ok_or(DatabaseError::NoConnection)?;
        data.remove(key);
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn keys(&self) -> DatabaseResult<Vec<String>> {
        let guard = self.data.read();
        let data = guard.as_ref().ok_or(DatabaseError::NoConnection)?;
        Ok(data.keys().cloned().collect())
    }

    #[tracing::instrument(skip(self))]
    async fn close(&self) {
        self.data.write().take();
    }
}
