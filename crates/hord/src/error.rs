//! Database error types and result alias.
//!
//! Every [`Database`](crate::Database) implementation, whether a bare backend or
//! a composite such as [`Lookaside`](crate::cache::lookaside::Lookaside), reports
//! failures through [`DatabaseError`]. Callers branch on the error's
//! [`ErrorKind`], never on its message.
//!
//! # Error Kinds
//!
//! | Kind | Raised by | Meaning |
//! |------|-----------|---------|
//! | [`ErrorKind::InvalidDatabase`] | `dial` | Durable or cache handle not supplied |
//! | [`ErrorKind::InvalidCache`] | custom drivers | Cache handle rejected by a driver |
//! | [`ErrorKind::NoType`] | `cache::dial` | Cache strategy unset or unrecognized |
//! | [`ErrorKind::InvalidKey`] | every backend | Empty key |
//! | [`ErrorKind::InvalidData`] | every backend | Empty value |
//! | [`ErrorKind::NotFound`] | `get` | Key is absent (not a failure of the store) |
//! | [`ErrorKind::NoConnection`] | every backend | Handle closed or never dialed |
//! | [`ErrorKind::Cache`] | `Lookaside` | Cache refill or cache write failed after the data side succeeded |
//! | [`ErrorKind::Backend`] | every backend | Opaque I/O or internal failure |
//! | [`ErrorKind::Timeout`] | every backend | Backend-level deadline exceeded |
//!
//! # Example
//!
//! ```
//! use hord::{DatabaseError, DatabaseResult, ErrorKind};
//!
//! fn lookup(key: &str) -> DatabaseResult<Vec<u8>> {
//!     Err(DatabaseError::not_found(key))
//! }
//!
//! assert_eq!(lookup("missing").unwrap_err().kind(), ErrorKind::NotFound);
//! ```

use std::{fmt, sync::Arc};

use bytes::Bytes;
use thiserror::Error;

/// A shared error type for source chain tracking.
pub type BoxError = Arc<dyn std::error::Error + Send + Sync>;

/// Result type alias for database operations.
pub type DatabaseResult<T> = Result<T, DatabaseError>;

/// Errors that can occur while dialing or operating a [`Database`](crate::Database).
///
/// # Non-exhaustive
///
/// New variants may be added in future minor releases. Match on
/// [`kind()`](DatabaseError::kind) when only the classification matters.
#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum DatabaseError {
    /// A handle was not supplied to `dial`, whether the durable store or the cache.
    #[error("Database cannot be nil")]
    InvalidDatabase,

    /// A cache handle is unusable.
    ///
    /// The bundled `dial` functions report a missing cache as
    /// [`DatabaseError::InvalidDatabase`]; this variant is left for drivers
    /// that validate the cache handle themselves.
    #[error("Cache cannot be nil")]
    InvalidCache,

    /// No cache strategy was selected, or the selector was not recognized.
    #[error("Cache type not specified or unrecognized")]
    NoType,

    /// The key is empty.
    #[error("Key cannot be empty")]
    InvalidKey,

    /// The value is empty.
    #[error("Data cannot be empty")]
    InvalidData,

    /// The key does not exist.
    ///
    /// This is the absence signal: a normal outcome of `get`, distinct from any
    /// failure of the store itself.
    #[error("Nil value returned from database for key: {key}")]
    NotFound {
        /// The key that was not found.
        key: String,
    },

    /// The handle has been closed or was never dialed.
    #[error("No database connection defined, did you dial?")]
    NoConnection,

    /// The durable read succeeded but writing the value back into the cache failed.
    ///
    /// The fetched value is carried so callers that can tolerate a cold cache
    /// may still use it.
    #[error("Cache refill failed for key: {key}")]
    CacheRefill {
        /// The key that was read.
        key: String,
        /// The value read from the durable store.
        value: Bytes,
        /// The error returned by the cache store.
        #[source]
        source: Box<DatabaseError>,
    },

    /// The durable write committed but the cache write that followed failed.
    #[error("Cache write failed after durable commit for key: {key}")]
    CacheWrite {
        /// The key that was written.
        key: String,
        /// The error returned by the cache store.
        #[source]
        source: Box<DatabaseError>,
    },

    /// Connection or network error inside a backend.
    #[error("Connection error: {message}")]
    Connection {
        /// Description of the connection error.
        message: String,
        /// The underlying error that caused this connection failure.
        #[source]
        source: Option<BoxError>,
    },

    /// Backend-specific internal error.
    #[error("Internal error: {message}")]
    Internal {
        /// Description of the internal error.
        message: String,
        /// The underlying error that caused this internal failure.
        #[source]
        source: Option<BoxError>,
    },

    /// A backend-level deadline was exceeded.
    #[error("Operation timeout")]
    Timeout,
}

/// Classification of a [`DatabaseError`], comparable by equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// See [`DatabaseError::InvalidDatabase`].
    InvalidDatabase,
    /// See [`DatabaseError::InvalidCache`].
    InvalidCache,
    /// See [`DatabaseError::NoType`].
    NoType,
    /// See [`DatabaseError::InvalidKey`].
    InvalidKey,
    /// See [`DatabaseError::InvalidData`].
    InvalidData,
    /// See [`DatabaseError::NotFound`].
    NotFound,
    /// See [`DatabaseError::NoConnection`].
    NoConnection,
    /// A cache-side failure tagged by the look-aside driver.
    Cache,
    /// An opaque backend failure ([`DatabaseError::Connection`] or [`DatabaseError::Internal`]).
    Backend,
    /// See [`DatabaseError::Timeout`].
    Timeout,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::InvalidDatabase => "invalid_database",
            Self::InvalidCache => "invalid_cache",
            Self::NoType => "no_type",
            Self::InvalidKey => "invalid_key",
            Self::InvalidData => "invalid_data",
            Self::NotFound => "not_found",
            Self::NoConnection => "no_connection",
            Self::Cache => "cache",
            Self::Backend => "backend",
            Self::Timeout => "timeout",
        };
        f.write_str(name)
    }
}

impl DatabaseError {
    /// Creates a new `NotFound` error for the given key.
    #[must_use]
    pub fn not_found(key: impl Into<String>) -> Self {
        Self::NotFound { key: key.into() }
    }

    /// Creates a new `Connection` error with the given message.
    #[must_use]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection { message: message.into(), source: None }
    }

    /// Creates a new `Connection` error with a message and source error.
    #[must_use]
    pub fn connection_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Connection { message: message.into(), source: Some(Arc::new(source)) }
    }

    /// Creates a new `Internal` error with the given message.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal { message: message.into(), source: None }
    }

    /// Creates a new `Internal` error with a message and source error.
    #[must_use]
    pub fn internal_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Internal { message: message.into(), source: Some(Arc::new(source)) }
    }

    /// Creates a new `Timeout` error.
    #[must_use]
    pub fn timeout() -> Self {
        Self::Timeout
    }

    /// Returns the classification of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidDatabase => ErrorKind::InvalidDatabase,
            Self::InvalidCache => ErrorKind::InvalidCache,
            Self::NoType => ErrorKind::NoType,
            Self::InvalidKey => ErrorKind::InvalidKey,
            Self::InvalidData => ErrorKind::InvalidData,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::NoConnection => ErrorKind::NoConnection,
            Self::CacheRefill { .. } | Self::CacheWrite { .. } => ErrorKind::Cache,
            Self::Connection { .. } | Self::Internal { .. } => ErrorKind::Backend,
            Self::Timeout => ErrorKind::Timeout,
        }
    }

    /// Returns `true` if this is the absence signal.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns `true` if the failure originated in the cache store after the
    /// durable store had already succeeded.
    #[must_use]
    pub fn is_cache_side(&self) -> bool {
        self.kind() == ErrorKind::Cache
    }

    /// Returns the cache store's own error for cache-side failures.
    #[must_use]
    pub fn cache_source(&self) -> Option<&DatabaseError> {
        match self {
            Self::CacheRefill { source, .. } | Self::CacheWrite { source, .. } => {
                Some(source.as_ref())
            },
            _ => None,
        }
    }

    /// Returns the durably-read value carried by a [`CacheRefill`](Self::CacheRefill) error.
    #[must_use]
    pub fn refilled_value(&self) -> Option<&Bytes> {
        match self {
            Self::CacheRefill { value, .. } => Some(value),
            _ => None,
        }
    }
}

/// Errors raised while validating configuration values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// A numeric or duration field is below its allowed minimum.
    #[error("{field} must be at least {min}, got {value}")]
    BelowMinimum {
        /// The offending field.
        field: &'static str,
        /// The rejected value, rendered for display.
        value: String,
        /// The minimum allowed value, rendered for display.
        min: String,
    },
}
