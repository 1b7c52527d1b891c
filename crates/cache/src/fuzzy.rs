//! Normalizing cache with best-match resolution.

use std::borrow::Cow;

use shelf_text::{normalize, similarity};
use tracing::instrument;

use crate::error::{ErrorKind, Result};
use crate::identity::{IdentityCache, Lookup};

/// Minimum score adapters accept from [`FuzzyResolutionCache::best_match`]
/// before reporting a title as not found.
pub const DEFAULT_ACCEPTANCE_THRESHOLD: f64 = 0.9;

/// The outcome of a [`best_match`](FuzzyResolutionCache::best_match) query.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution<'a, T> {
    /// Normalized key of the selected entry.
    pub key: String,
    pub value: &'a T,
    /// Similarity between the normalized query and [`key`](Self::key), in `[0, 1]`.
    pub score: f64,
}

impl<'a, T> Resolution<'a, T> {
    /// Apply an acceptance threshold to this resolution.
    ///
    /// Returns the resolution unchanged when `score >= threshold`, otherwise a
    /// [`BelowThreshold`](ErrorKind::BelowThreshold) error naming the closest
    /// match.
    pub fn accept(self, threshold: f64) -> Result<Self> {
        if self.score >= threshold {
            return Ok(self);
        }
        exn::bail!(ErrorKind::BelowThreshold {
            closest: self.key,
            score: self.score,
            threshold,
        });
    }

    pub fn is_exact(&self) -> bool {
        self.score >= 1.0
    }

    /// Clone the borrowed value out of the cache.
    pub fn cloned(&self) -> T
    where
        T: Clone,
    {
        self.value.clone()
    }
}

/// Title cache that resolves free-text queries to the closest stored entry.
///
/// Every key given to [`update`](Self::update), [`remove`](Self::remove) and
/// [`get`](Self::get) is passed through [`normalize`] first, so
/// `"Café!"` and `"cafe"` address the same entry. Storage is delegated to an
/// [`IdentityCache`], which keeps insertion order for tie-breaking.
///
/// ```rust
/// use shelf_cache::FuzzyResolutionCache;
///
/// let mut cache = FuzzyResolutionCache::new();
/// cache.update("Fullmetal Alchemist", 1).update("One Piece", 2);
///
/// let resolution = cache.best_match("full metal alchemist!").unwrap();
/// assert_eq!(resolution.key, "fullmetalalchemist");
/// assert_eq!(*resolution.value, 1);
/// assert_eq!(resolution.score, 1.0);
/// ```
#[derive(Debug, Clone)]
pub struct FuzzyResolutionCache<T> {
    inner: IdentityCache<T>,
}

impl<T> FuzzyResolutionCache<T> {
    pub fn new() -> Self {
        Self {
            inner: IdentityCache::new(),
        }
    }

    /// Look up the entry stored under the normalized form of `key`.
    pub fn get(&self, key: &str) -> Lookup<'_, T> {
        let normalized = normalize(key);
        let value = self.inner.value(&normalized);
        Lookup {
            key: Cow::Owned(normalized),
            value,
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.inner.contains(&normalize(key))
    }

    pub fn update(&mut self, key: &str, value: T) -> &mut Self {
        self.inner.update(normalize(key), value);
        self
    }

    pub fn remove(&mut self, key: &str) -> &mut Self {
        self.inner.remove(&normalize(key));
        self
    }

    pub fn clear(&mut self) -> &mut Self {
        self.inner.clear();
        self
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Snapshot of the normalized keys, in insertion order.
    pub fn keys(&self) -> Vec<String> {
        self.inner.keys()
    }

    /// Find the stored entry closest to `query`.
    ///
    /// An entry whose normalized key equals the normalized query is returned
    /// directly with a score of `1`. Otherwise every key is scored with
    /// [`similarity`] and the highest score wins; equal scores go to the
    /// entry inserted first.
    ///
    /// A low score is **not** an error; use [`Resolution::accept`] to apply
    /// a threshold.
    ///
    /// # Errors
    ///
    /// Returns [`Empty`](ErrorKind::Empty) if the cache holds no entries.
    #[instrument(skip(self), fields(entries = self.len()))]
    pub fn best_match(&self, query: &str) -> Result<Resolution<'_, T>> {
        let normalized = normalize(query);
        if let Some(value) = self.inner.value(&normalized) {
            tracing::trace!(key = %normalized, "Exact match for normalized query");
            return Ok(Resolution {
                score: similarity(&normalized, &normalized),
                key: normalized,
                value,
            });
        }

        let mut scored: Vec<(&str, &T, f64)> = self
            .inner
            .iter()
            .map(|(key, value)| (key, value, similarity(&normalized, key)))
            .collect();
        // `sort_by` is stable: entries with equal scores stay in insertion order.
        scored.sort_by(|a, b| b.2.total_cmp(&a.2));

        let Some(&(key, value, score)) = scored.first() else {
            exn::bail!(ErrorKind::Empty);
        };
        tracing::debug!(key, score, "Resolved query to closest cached entry");
        Ok(Resolution {
            key: key.to_string(),
            value,
            score,
        })
    }
}

impl<T> Default for FuzzyResolutionCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'k, T> FromIterator<(&'k str, T)> for FuzzyResolutionCache<T> {
    fn from_iter<I: IntoIterator<Item = (&'k str, T)>>(iter: I) -> Self {
        let mut cache = Self::new();
        for (key, value) in iter {
            cache.update(key, value);
        }
        cache
    }
}
