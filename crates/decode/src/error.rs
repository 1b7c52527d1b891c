//! Decoding Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};
use std::time::Duration;

/// A decoding error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for decoding operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The page body doesn't contain the key-derivation expression. Nothing
    /// was fetched or executed.
    #[display("unable to locate decryption key")]
    DecryptionKeyNotFound,
    /// A script fragment could not be retrieved. Raised by [`Fetcher`](crate::Fetcher)
    /// implementations and passed through untouched.
    #[display("failed to load script: {_0}")]
    ScriptLoad(#[error(not(source))] String),
    /// Guest code ran past its wall-clock budget and was interrupted.
    #[display("script execution exceeded {}ms", _0.as_millis())]
    ExecutionTimeout(#[error(not(source))] Duration),
    /// Guest code threw, or failed to parse.
    #[display("script error: {_0}")]
    Script(#[error(not(source))] String),
    /// The guest finished without leaving a decoded string for the token.
    #[display("token was not decoded: {_0}")]
    TokenNotDecoded(#[error(not(source))] String),
    /// The interpreter itself could not be set up.
    #[display("failed to create script runtime")]
    Runtime,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        // Network trouble while fetching scripts is the only transient failure;
        // guest code is deterministic for a given page.
        matches!(self, Self::ScriptLoad(_))
    }
}
