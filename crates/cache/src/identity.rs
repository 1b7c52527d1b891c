//! Plain insertion-ordered key/value store.

use std::borrow::Cow;
use std::collections::HashMap;

/// Result of an [`IdentityCache::get`]: the key that was looked up, and the
/// value stored under it, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lookup<'a, T> {
    pub key: Cow<'a, str>,
    pub value: Option<&'a T>,
}

/// Insertion-ordered map with upsert semantics.
///
/// Keys are stored exactly as given. Updating an existing key replaces its
/// value in place and keeps its original position, so iteration order is
/// always "order of first insertion".
///
/// Mutating methods return `&mut Self` so harvesting code can chain them:
///
/// ```rust
/// use shelf_cache::IdentityCache;
///
/// let mut cache = IdentityCache::new();
/// cache.update("a", 0).update("b", 1).update("a", 2).remove("missing");
/// assert_eq!(cache.len(), 2);
/// assert_eq!(cache.get("a").value, Some(&2));
/// assert_eq!(cache.keys(), vec!["a".to_string(), "b".to_string()]);
/// ```
#[derive(Debug, Clone)]
pub struct IdentityCache<T> {
    entries: Vec<(String, T)>,
    index: HashMap<String, usize>,
}

impl<T> IdentityCache<T> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Look up a key. A miss is not an error, the returned value is `None`.
    pub fn get<'a>(&'a self, key: &'a str) -> Lookup<'a, T> {
        Lookup {
            key: Cow::Borrowed(key),
            value: self.value(key),
        }
    }

    /// Borrow the value stored under `key`. Unlike [`get`](Self::get), the
    /// result doesn't borrow from `key`.
    pub(crate) fn value(&self, key: &str) -> Option<&T> {
        self.index.get(key).map(|&position| &self.entries[position].1)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Insert a value, or overwrite the value of an existing key.
    pub fn update(&mut self, key: impl Into<String>, value: T) -> &mut Self {
        let key = key.into();
        if let Some(position) = self.index.get(&key).copied() {
            self.entries[position].1 = value;
        } else {
            self.index.insert(key.clone(), self.entries.len());
            self.entries.push((key, value));
        }
        self
    }

    /// Remove a key. Removing a key that isn't present does nothing.
    pub fn remove(&mut self, key: &str) -> &mut Self {
        if let Some(position) = self.index.remove(key) {
            self.entries.remove(position);
            // Everything after the removed entry shifted down by one.
            for (key, _) in &self.entries[position..] {
                if let Some(shifted) = self.index.get_mut(key) {
                    *shifted -= 1;
                }
            }
        }
        self
    }

    pub fn clear(&mut self) -> &mut Self {
        self.entries.clear();
        self.index.clear();
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Snapshot of all keys, in insertion order.
    pub fn keys(&self) -> Vec<String> {
        self.entries.iter().map(|(key, _)| key.clone()).collect()
    }

    /// Iterate over all entries, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }
}

impl<T> Default for IdentityCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Into<String>, T> FromIterator<(K, T)> for IdentityCache<T> {
    fn from_iter<I: IntoIterator<Item = (K, T)>>(iter: I) -> Self {
        let mut cache = Self::new();
        for (key, value) in iter {
            cache.update(key, value);
        }
        cache
    }
}
