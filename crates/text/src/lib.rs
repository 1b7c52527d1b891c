//! Text utilities shared by every catalog adapter.
//!
//! Titles scraped from different catalogs rarely agree on accents, casing,
//! punctuation or spacing. Everything in this crate is a total function: no
//! input string (including the empty string) causes a panic or an error.
//!
//! - [`normalize`] canonicalizes a title for comparison,
//! - [`levenshtein`] counts single-character edits between two strings, and
//! - [`similarity`] turns that distance into a confidence in `[0, 1]`.

mod distance;
mod fold;
mod normalize;

pub use crate::distance::{levenshtein, similarity};
pub use crate::fold::fold_diacritics;
pub use crate::normalize::normalize;
