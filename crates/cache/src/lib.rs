//! In-memory title cache for catalog adapters.
//!
//! Adapters harvest `(title, entry)` pairs while scraping a catalog and later
//! need to turn a user's free-text title into one of those entries. This crate
//! provides two layers:
//!
//! - [`IdentityCache`]: a plain, insertion-ordered key/value store.
//! - [`FuzzyResolutionCache`]: wraps an [`IdentityCache`], normalizes every key
//!   with [`shelf_text::normalize`] and answers [`best_match`] queries.
//!
//! The cache never rejects a candidate on its own. Whether a score is good
//! enough is the caller's decision, see [`Resolution::accept`] and
//! [`DEFAULT_ACCEPTANCE_THRESHOLD`].
//!
//! Nothing here is persisted; a cache lives exactly as long as the adapter that
//! owns it.
//!
//! [`best_match`]: FuzzyResolutionCache::best_match

pub mod error;
mod fuzzy;
mod identity;

pub use crate::fuzzy::{DEFAULT_ACCEPTANCE_THRESHOLD, FuzzyResolutionCache, Resolution};
pub use crate::identity::{IdentityCache, Lookup};
