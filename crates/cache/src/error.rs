//! Cache Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};

/// A cache error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for cache operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// Both variants are "not found" conditions. They are kept apart so callers
/// can tell "there was nothing to match against" from "there was something,
/// but it wasn't close enough".
#[derive(Debug, Display, Error, Clone, PartialEq)]
pub enum ErrorKind {
    /// The cache holds no entries, so there is no candidate at all.
    #[display("title not found: cache is empty")]
    Empty,
    /// The best candidate scored below the caller's acceptance threshold.
    #[display("title not found. Closest match: {closest}@{score}")]
    BelowThreshold {
        /// Normalized key of the closest entry.
        closest: String,
        /// Similarity score of the closest entry.
        score: f64,
        /// Threshold the score was compared against.
        threshold: f64,
    },
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        // Retrying the same lookup against the same cache gives the same
        // answer; the caller has to harvest more entries first.
        false
    }

    /// Returns `true` for every "no acceptable entry" condition.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Empty | Self::BelowThreshold { .. })
    }
}
