//! A cache that is never connected.

use async_trait::async_trait;
use bytes::Bytes;

use crate::{
    database::Database,
    error::{DatabaseError, DatabaseResult},
};

/// A placeholder cache handle that fails every operation with
/// [`DatabaseError::NoConnection`].
///
/// Pass it as the cache when a [`CacheType::None`](super::CacheType::None)
/// configuration has no real cache to hand to [`dial`](super::dial).
#[derive(Debug, Clone, Copy, Default)]
pub struct NilCache;

#[async_trait]
impl Database for NilCache {
    async fn setup(&self) -> DatabaseResult<()> {
        Err(DatabaseError::NoConnection)
    }

    async fn health_check(&self) -> DatabaseResult<()> {
        Err(DatabaseError::NoConnection)
    }

    async fn get(&self, _key: &str) -> DatabaseResult<Bytes> {
        Err(DatabaseError::NoConnection)
    }

    async fn set(&self, _key: &str, _value: Bytes) -> DatabaseResult<()> {
        Err(DatabaseError::NoConnection)
    }

    async fn delete(&self, _key: &str) -> DatabaseResult<()> {
        Err(DatabaseError::NoConnection)
    }

    async fn keys(&self) -> DatabaseResult<Vec<String>> {
        Err(DatabaseError::NoConnection)
    }

    async fn close(&self) {}
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[tokio::test]
    async fn every_operation_is_disconnected() {
        let cache = NilCache;
        assert_eq!(cache.setup().await.unwrap_err().kind(), ErrorKind::NoConnection);
        assert_eq!(cache.health_check().await.unwrap_err().kind(), ErrorKind::NoConnection);
        assert_eq!(cache.get("k").await.unwrap_err().kind(), ErrorKind::NoConnection);
        assert_eq!(
            cache.set("k", Bytes::from("v")).await.unwrap_err().kind(),
            ErrorKind::NoConnection
        );
        assert_eq!(cache.delete("k").await.unwrap_err().kind(), ErrorKind::NoConnection);
        assert_eq!(cache.keys().await.unwrap_err().kind(), ErrorKind::NoConnection);
        cache.close().await;
    }
}
