//! Key and value validation shared by every backend.
//!
//! Backends call these before touching storage so that empty keys and empty
//! values are rejected identically everywhere. A zero-length value cannot be
//! told apart from absence, so it is refused at the API boundary.

use crate::error::{DatabaseError, DatabaseResult};

/// Checks that a key is non-empty.
///
/// # Errors
///
/// Returns [`DatabaseError::InvalidKey`] if `key` is empty.
///
/// # Examples
///
/// ```
/// use hord::validation::valid_key;
///
/// assert!(valid_key("user:42").is_ok());
/// assert!(valid_key("").is_err());
/// ```
pub fn valid_key(key: &str) -> DatabaseResult<()> {
    if key.is_empty() {
        return Err(DatabaseError::InvalidKey);
    }
    Ok(())
}

/// Checks that a value is non-empty.
///
/// # Errors
///
/// Returns [`DatabaseError::InvalidData`] if `data` is empty.
pub fn valid_data(data: &[u8]) -> DatabaseResult<()> {
    if data.is_empty() {
        return Err(DatabaseError::InvalidData);
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::error::ErrorKind;

    #[rstest]
    #[case::empty("", false)]
    #[case::single_char("a", true)]
    #[case::whitespace(" ", true)]
    #[case::multibyte("ключ", true)]
    #[case::nul_byte("\0", true)]
    fn valid_key_parametric(#[case] key: &str, #[case] should_pass: bool) {
        assert_eq!(valid_key(key).is_ok(), should_pass);
    }

    #[rstest]
    #[case::empty(b"", false)]
    #[case::single_byte(b"x", true)]
    #[case::zero_byte(b"\0", true)]
    fn valid_data_parametric(#[case] data: &[u8], #[case] should_pass: bool) {
        assert_eq!(valid_data(data).is_ok(), should_pass);
    }

    #[test]
    fn rejections_use_distinct_kinds() {
        assert_eq!(valid_key("").unwrap_err().kind(), ErrorKind::InvalidKey);
        assert_eq!(valid_data(b"").unwrap_err().kind(), ErrorKind::InvalidData);
    }

    mod proptests {
        use proptest::prelude::*;

        use super::super::*;

        proptest! {
            /// A key is accepted exactly when it has at least one character.
            #[test]
            fn key_accepted_iff_non_empty(key in ".*") {
                prop_assert_eq!(valid_key(&key).is_ok(), !key.is_empty());
            }

            /// A value is accepted exactly when it has at least one byte.
            #[test]
            fn data_accepted_iff_non_empty(
                data in proptest::collection::vec(any::<u8>(), 0..64),
            ) {
                prop_assert_eq!(valid_data(&data).is_ok(), !data.is_empty());
            }
        }
    }
}
