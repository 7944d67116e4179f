//! Conformance test suite for [`Database`] implementations.
//!
//! This module provides async test functions that check whether a
//! [`Database`] implementation satisfies the trait contract. Every backend,
//! bare or composite, can run the same suite.
//!
//! # Usage
//!
//! Enable the `testutil` feature and call each conformance function with a
//! fresh database instance:
//!
//! ```no_run
//! use hord::{HashMapDatabase, conformance};
//!
//! #[tokio::test]
//! async fn get_missing_key_is_not_found() {
//!     conformance::get_missing_key_is_not_found(&HashMapDatabase::new()).await;
//! }
//! ```
//!
//! # Test Categories
//!
//! | Category | Functions | Contract aspect |
//! |----------|-----------|-----------------|
//! | Lifecycle | 2 tests | `setup` idempotence, `health_check` on a live handle |
//! | CRUD | 6 tests | get/set/delete semantics, absence as `NotFound` |
//! | Validation | 2 tests | Empty keys and values are rejected |
//! | Listing | 1 test | `keys` reports stored keys |
//! | Concurrent | 2 tests | Thread-safety under parallel access |
//! | Close | 1 test | Every operation fails with `NoConnection` after `close` |

use std::sync::Arc;

use bytes::Bytes;

use crate::{assert_kind, assert_not_found, database::Database, error::ErrorKind};

// ============================================================================
// Lifecycle
// ============================================================================

/// `setup` succeeds and may be called again.
pub async fn setup_is_idempotent<D: Database + ?Sized>(db: &D) {
    db.setup().await.expect("first setup");
    db.setup().await.expect("second setup should be a no-op");
}

/// `health_check` succeeds on a live handle.
pub async fn health_check_succeeds<D: Database + ?Sized>(db: &D) {
    db.health_check().await.expect("health check on a live handle");
}

// ============================================================================
// CRUD
// ============================================================================

/// `get` on a nonexistent key returns `NotFound`, not an empty value.
pub async fn get_missing_key_is_not_found<D: Database + ?Sized>(db: &D) {
    let result = db.get("conformance:missing").await;
    assert_not_found!(result, "missing key");
}

/// `set` then `get` round-trips the value.
pub async fn set_then_get_returns_value<D: Database + ?Sized>(db: &D) {
    db.set("crud:k1", Bytes::from("v1")).await.expect("set");
    let val = db.get("crud:k1").await.expect("get");
    assert_eq!(val, Bytes::from("v1"));
}

/// `set` on an existing key overwrites the value.
pub async fn set_overwrites_existing<D: Database + ?Sized>(db: &D) {
    db.set("crud:ow", Bytes::from("original")).await.expect("set");
    db.set("crud:ow", Bytes::from("updated")).await.expect("overwrite");
    let val = db.get("crud:ow").await.expect("get");
    assert_eq!(val, Bytes::from("updated"));
}

/// Values are opaque bytes; non-UTF-8 content round-trips unchanged.
pub async fn binary_value_roundtrip<D: Database + ?Sized>(db: &D) {
    let value = Bytes::from_static(&[0x00, 0xFF, 0xC3, 0x28, 0x00]);
    db.set("crud:bin", value.clone()).await.expect("set binary value");
    let val = db.get("crud:bin").await.expect("get binary value");
    assert_eq!(val, value);
}

/// `delete` removes a previously-set key.
pub async fn delete_removes_key<D: Database + ?Sized>(db: &D) {
    db.set("crud:del", Bytes::from("val")).await.expect("set");
    db.delete("crud:del").await.expect("delete");
    let result = db.get("crud:del").await;
    assert_not_found!(result, "key should be gone after delete");
}

/// `delete` on a nonexistent key is a silent no-op, and repeating it is too.
pub async fn delete_missing_key_is_noop<D: Database + ?Sized>(db: &D) {
    db.delete("crud:ghost").await.expect("delete of nonexistent key");
    db.delete("crud:ghost").await.expect("repeated delete");
}

// ============================================================================
// Validation
// ============================================================================

/// The empty key is rejected by every keyed operation.
pub async fn empty_key_is_rejected<D: Database + ?Sized>(db: &D) {
    assert_kind!(db.get("").await, ErrorKind::InvalidKey, "get");
    assert_kind!(db.set("", Bytes::from("v")).await, ErrorKind::InvalidKey, "set");
    assert_kind!(db.delete("").await, ErrorKind::InvalidKey, "delete");
}

/// The empty value is rejected by `set` and nothing is stored.
pub async fn empty_value_is_rejected<D: Database + ?Sized>(db: &D) {
    assert_kind!(db.set("val:empty", Bytes::new()).await, ErrorKind::InvalidData, "set");
    let result = db.get("val:empty").await;
    assert_not_found!(result, "rejected write must not be stored");
}

// ============================================================================
// Listing
// ============================================================================

/// `keys` reports every stored key.
///
/// Other functions in this suite may have written to the same handle, so this
/// only checks that its own keys are present.
pub async fn keys_lists_stored_keys<D: Database + ?Sized>(db: &D) {
    let expected = ["list:a", "list:b", "list:c"];
    for key in expected {
        db.set(key, Bytes::from("v")).await.expect("set");
    }
    let keys = db.keys().await.expect("keys");
    for key in expected {
        assert!(keys.iter().any(|k| k == key), "keys() missing {key}: {keys:?}");
    }
}

// ============================================================================
// Concurrent
// ============================================================================

/// Concurrent sets to different keys all succeed.
///
/// Requires `D: 'static` so the database can be shared across spawned tasks
/// via `Arc`.
pub async fn concurrent_sets_to_different_keys<D: Database + ?Sized + 'static>(db: Arc<D>) {
    let mut handles = Vec::new();
    for task in 0..10_usize {
        let db = Arc::clone(&db);
        handles.push(tokio::spawn(async move {
            for seq in 0..10_usize {
                let key = format!("conc:{task}:{seq}");
                let value = Bytes::from(format!("task{task}-val{seq}"));
                db.set(&key, value).await.expect("concurrent set");
            }
        }));
    }
    for handle in handles {
        handle.await.expect("task join");
    }

    for task in 0..10_usize {
        for seq in 0..10_usize {
            let key = format!("conc:{task}:{seq}");
            let val = db.get(&key).await.expect("get after concurrent sets");
            assert_eq!(val, Bytes::from(format!("task{task}-val{seq}")), "wrong value for {key}");
        }
    }
}

/// Concurrent reads of the same key all return the same value.
pub async fn concurrent_reads_return_consistent_value<D>(db: Arc<D>)
where
    D: Database + ?Sized + 'static,
{
    db.set("conc:shared", Bytes::from("stable")).await.expect("set");

    let mut handles = Vec::new();
    for _ in 0..20 {
        let db = Arc::clone(&db);
        handles.push(tokio::spawn(async move {
            db.get("conc:shared").await.expect("concurrent get")
        }));
    }
    for handle in handles {
        let val = handle.await.expect("task join");
        assert_eq!(val, Bytes::from("stable"));
    }
}

// ============================================================================
// Close
// ============================================================================

/// After `close`, every operation fails with `NoConnection`.
///
/// This consumes the handle's usefulness, so [`run_all`] runs it last.
pub async fn close_fails_subsequent_operations<D: Database + ?Sized>(db: &D) {
    db.set("close:k", Bytes::from("v")).await.expect("set before close");
    db.close().await;

    assert_kind!(db.setup().await, ErrorKind::NoConnection, "setup");
    assert_kind!(db.health_check().await, ErrorKind::NoConnection, "health_check");
    assert_kind!(db.get("close:k").await, ErrorKind::NoConnection, "get");
    assert_kind!(db.set("close:k", Bytes::from("v")).await, ErrorKind::NoConnection, "set");
    assert_kind!(db.delete("close:k").await, ErrorKind::NoConnection, "delete");
    assert_kind!(db.keys().await, ErrorKind::NoConnection, "keys");
}

/// Runs every conformance check against `db`, closing it at the end.
///
/// ```no_run
/// use std::sync::Arc;
///
/// use hord::{HashMapDatabase, conformance};
///
/// #[tokio::test]
/// async fn hashmap_conforms() {
///     conformance::run_all(Arc::new(HashMapDatabase::new())).await;
/// }
/// ```
///
/// For finer-grained failure reporting, call individual test functions
/// directly.
pub async fn run_all<D: Database + ?Sized + 'static>(db: Arc<D>) {
    // Lifecycle
    setup_is_idempotent(db.as_ref()).await;
    health_check_succeeds(db.as_ref()).await;

    // CRUD
    get_missing_key_is_not_found(db.as_ref()).await;
    set_then_get_returns_value(db.as_ref()).await;
    set_overwrites_existing(db.as_ref()).await;
    binary_value_roundtrip(db.as_ref()).await;
    delete_removes_key(db.as_ref()).await;
    delete_missing_key_is_noop(db.as_ref()).await;

    // Validation
    empty_key_is_rejected(db.as_ref()).await;
    empty_value_is_rejected(db.as_ref()).await;

    // Listing
    keys_lists_stored_keys(db.as_ref()).await;

    // Concurrent
    concurrent_sets_to_different_keys(Arc::clone(&db)).await;
    concurrent_reads_return_consistent_value(Arc::clone(&db)).await;

    // Close
    close_fails_subsequent_operations(db.as_ref()).await;
}
