//! Shared test utilities for database testing.
//!
//! This module provides helpers for generating test data, building
//! pre-populated databases and asserting on [`DatabaseResult`] values. It is
//! feature-gated behind `testutil` to keep it out of production builds.
//!
//! # Usage
//!
//! In integration tests, enable the feature in `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! hord = { path = "../hord", features = ["testutil"] }
//! ```
//!
//! Then import helpers:
//!
//! ```no_run
//! // Requires the `testutil` feature to be enabled.
//! use hord::testutil::{make_key, make_value, populated_database};
//! ```

use bytes::Bytes;

use crate::{
    database::Database,
    error::{DatabaseError, DatabaseResult},
    hashmap::HashMapDatabase,
};

/// Create a deterministic test key from a prefix and index.
///
/// Produces keys like `"prefix:000042"` (zero-padded to 6 digits).
#[must_use]
pub fn make_key(prefix: &str, idx: usize) -> String {
    format!("{prefix}:{idx:06}")
}

/// Create a test value of the given size filled with `0xAB` bytes.
///
/// A size of zero yields an empty value, which every backend rejects with
/// [`DatabaseError::InvalidData`].
#[must_use]
pub fn make_value(size: usize) -> Bytes {
    Bytes::from(vec![0xAB; size])
}

/// Create a test value tagged with a task ID and sequence number.
///
/// Produces values like `"task3-val042"`, so concurrent tests can tell which
/// task wrote which value.
#[must_use]
pub fn make_tagged_value(task: usize, seq: usize) -> Bytes {
    Bytes::from(format!("task{task}-val{seq}"))
}

/// Create a [`HashMapDatabase`] pre-populated with `count` keys.
///
/// Keys are formatted with [`make_key`] and hold values of `value_size` bytes.
///
/// # Panics
///
/// Panics if any `set` fails, including when `value_size` is zero.
pub async fn populated_database(prefix: &str, count: usize, value_size: usize) -> HashMapDatabase {
    let db = HashMapDatabase::new();
    let value = make_value(value_size);
    for i in 0..count {
        db.set(&make_key(prefix, i), value.clone()).await.expect("populate set failed");
    }
    db
}

/// Assert that a [`DatabaseResult`] is an error of the given [`ErrorKind`](crate::ErrorKind).
///
/// # Examples
///
/// ```no_run
/// // Requires the `testutil` feature to be enabled.
/// use hord::{DatabaseError, DatabaseResult, ErrorKind, assert_kind};
///
/// let result: DatabaseResult<()> = Err(DatabaseError::InvalidKey);
/// assert_kind!(result, ErrorKind::InvalidKey);
/// ```
#[macro_export]
macro_rules! assert_kind {
    ($result:expr, $kind:expr) => {
        match &$result {
            Err(e) => assert_eq!(e.kind(), $kind, "expected {:?}, got: {:?}", $kind, e),
            Ok(_) => panic!("expected {:?} error, got Ok", $kind),
        }
    };
    ($result:expr, $kind:expr, $msg:expr) => {
        match &$result {
            Err(e) => assert_eq!(e.kind(), $kind, "{}: expected {:?}, got: {:?}", $msg, $kind, e),
            Ok(_) => panic!("{}: expected {:?} error, got Ok", $msg, $kind),
        }
    };
}

/// Assert that a [`DatabaseResult`] is a [`DatabaseError::NotFound`].
///
/// # Examples
///
/// ```no_run
/// // Requires the `testutil` feature to be enabled.
/// use hord::{DatabaseError, DatabaseResult, assert_not_found};
///
/// let result: DatabaseResult<()> = Err(DatabaseError::not_found("missing"));
/// assert_not_found!(result);
/// ```
#[macro_export]
macro_rules! assert_not_found {
    ($result:expr) => {
        assert!(
            matches!($result, Err($crate::error::DatabaseError::NotFound { .. })),
            "expected DatabaseError::NotFound, got: {:?}",
            $result,
        );
    };
    ($result:expr, $msg:expr) => {
        assert!(
            matches!($result, Err($crate::error::DatabaseError::NotFound { .. })),
            "{}: expected DatabaseError::NotFound, got: {:?}",
            $msg,
            $result,
        );
    };
}

/// Assert that a [`DatabaseResult`] is `Ok`.
///
/// Returns the inner value on success, panics with a descriptive message
/// on failure.
///
/// # Examples
///
/// ```no_run
/// // Requires the `testutil` feature to be enabled.
/// use hord::{DatabaseResult, assert_database_ok};
///
/// let result: DatabaseResult<i32> = Ok(42);
/// let value = assert_database_ok!(result);
/// assert_eq!(value, 42);
/// ```
#[macro_export]
macro_rules! assert_database_ok {
    ($result:expr) => {
        match $result {
            Ok(val) => val,
            Err(e) => panic!("expected Ok, got DatabaseError: {e:?}"),
        }
    };
    ($result:expr, $msg:expr) => {
        match $result {
            Ok(val) => val,
            Err(e) => panic!("{}: expected Ok, got DatabaseError: {e:?}", $msg),
        }
    };
}

/// Returns `true` if `result` is a `NotFound` error.
pub fn is_not_found<T>(result: &DatabaseResult<T>) -> bool {
    matches!(result, Err(DatabaseError::NotFound { .. }))
}

/// Returns `true` if `result` is a `NoConnection` error.
pub fn is_no_connection<T>(result: &DatabaseResult<T>) -> bool {
    matches!(result, Err(DatabaseError::NoConnection))
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_make_key_format() {
        assert_eq!(make_key("test", 42), "test:000042");
    }

    #[test]
    fn test_make_key_ordering() {
        let k1 = make_key("k", 1);
        let k2 = make_key("k", 10);
        let k3 = make_key("k", 100);
        assert!(k1 < k2);
        assert!(k2 < k3);
    }

    #[test]
    fn test_make_value_size() {
        assert!(make_value(0).is_empty());
        assert_eq!(make_value(64).len(), 64);
        assert!(make_value(1024).iter().all(|&b| b == 0xAB));
    }

    #[test]
    fn test_make_tagged_value() {
        assert_eq!(make_tagged_value(3, 42), Bytes::from("task3-val42"));
    }

    #[tokio::test]
    async fn test_populated_database() {
        let db = populated_database("item", 5, 16).await;
        assert_eq!(db.len(), Some(5));
        for i in 0..5 {
            let val = db.get(&make_key("item", i)).await.expect("get");
            assert_eq!(val.len(), 16);
        }
    }

    #[test]
    fn test_assert_kind_macro() {
        let result: DatabaseResult<()> = Err(DatabaseError::InvalidData);
        assert_kind!(result, ErrorKind::InvalidData);
        assert_kind!(result, ErrorKind::InvalidData, "with message");
    }

    #[test]
    fn test_assert_not_found_macro() {
        let result: DatabaseResult<()> = Err(DatabaseError::not_found("missing"));
        assert_not_found!(result);
        assert!(is_not_found(&result));
    }

    #[test]
    fn test_assert_database_ok_macro() {
        let result: DatabaseResult<i32> = Ok(42);
        let val = assert_database_ok!(result);
        assert_eq!(val, 42);
    }

    #[test]
    fn test_is_no_connection() {
        let result: DatabaseResult<()> = Err(DatabaseError::NoConnection);
        assert!(is_no_connection(&result));
        assert!(!is_not_found(&result));
    }
}
