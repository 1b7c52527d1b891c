//! Provider Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};
use shelf_cache::error::{Error as CacheError, ErrorKind as CacheErrorKind};
use shelf_decode::error::{Error as DecodeError, ErrorKind as DecodeErrorKind};

/// A provider error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for provider operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq)]
pub enum ErrorKind {
    /// No catalog entry is close enough to the requested title.
    #[display("title not found")]
    TitleNotFound(CacheErrorKind),
    /// The provider doesn't offer this operation at all.
    #[display("this function is not supported by this provider")]
    NotSupported,
    /// The provider could offer this operation but doesn't yet.
    #[display("this function is not yet implemented by this provider")]
    NotImplemented,
    /// The source handed to the provider belongs to a different site.
    #[display("the passed source was not for this provider: {_0}")]
    IncorrectSource(#[error(not(source))] String),
    /// A value scraped from the site couldn't be interpreted.
    #[display("failed to parse field '{field}', found value: {value}")]
    ParseError {
        /// The field that failed to parse.
        field: &'static str,
        /// The offending value.
        value: String,
    },
    /// Resolving obfuscated page URLs failed.
    #[display("decoding error: {_0}")]
    Decode(DecodeErrorKind),
}

impl ErrorKind {
    /// Convert a cache error into a provider error, keeping the cache crate's
    /// `Exn` frame as a child in the error tree.
    #[track_caller]
    pub fn not_found(err: CacheError) -> Error {
        let inner = (*err).clone();
        err.raise(ErrorKind::TitleNotFound(inner))
    }

    /// Convert a decoding error into a provider error, keeping the decode
    /// crate's `Exn` frame as a child in the error tree.
    #[track_caller]
    pub fn decode(err: DecodeError) -> Error {
        let inner = (*err).clone();
        err.raise(ErrorKind::Decode(inner))
    }

    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Decode(inner) => inner.is_retryable(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_kind_display() {
        assert_eq!(ErrorKind::NotSupported.to_string(), "this function is not supported by this provider");
        assert_eq!(
            ErrorKind::IncorrectSource("https://example.com/x".to_string()).to_string(),
            "the passed source was not for this provider: https://example.com/x"
        );
    }

    #[test]
    fn error_kind_retryable() {
        assert!(ErrorKind::Decode(DecodeErrorKind::ScriptLoad("ca".to_string())).is_retryable());
        assert!(!ErrorKind::Decode(DecodeErrorKind::DecryptionKeyNotFound).is_retryable());
        assert!(!ErrorKind::TitleNotFound(CacheErrorKind::Empty).is_retryable());
    }

    #[test]
    fn error_wraps_child() {
        let err = ErrorKind::not_found(exn::Exn::from(CacheErrorKind::Empty));
        assert_eq!(*err, ErrorKind::TitleNotFound(CacheErrorKind::Empty));
    }
}
