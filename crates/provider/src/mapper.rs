//! Ordered two-way lookup between site labels and typed values.

/// Ordered dictionary that maps a site's labels to typed values and back.
///
/// Adapters use it to turn the strings a catalog prints (`"Slice of Life"`,
/// `"Completed"`) into crate enums, and to turn enums back into the labels a
/// site expects in search forms. Adding an existing key replaces its value
/// in place.
///
/// ```rust
/// use shelf_provider::ValueMapper;
/// use shelf_provider::models::Status;
///
/// let statuses = ValueMapper::from([("Ongoing", Status::Ongoing), ("Completed", Status::Completed)]);
/// assert_eq!(statuses.to_value("Completed"), Some(&Status::Completed));
/// assert_eq!(statuses.to_key(&Status::Ongoing), Some("Ongoing"));
/// assert_eq!(statuses.to_value_or("Hiatus", &Status::Ongoing), &Status::Ongoing);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ValueMapper<V> {
    entries: Vec<(String, V)>,
}

impl<V> ValueMapper<V> {
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    pub fn add(&mut self, key: impl Into<String>, value: V) -> &mut Self {
        let key = key.into();
        match self.position(&key) {
            Some(index) => self.entries[index].1 = value,
            None => self.entries.push((key, value)),
        }
        self
    }

    /// Remove every given key. Keys that aren't present are ignored.
    pub fn remove<'k>(&mut self, keys: impl IntoIterator<Item = &'k str>) -> &mut Self {
        for key in keys {
            if let Some(index) = self.position(key) {
                self.entries.remove(index);
            }
        }
        self
    }

    pub fn to_value(&self, key: &str) -> Option<&V> {
        self.position(key).map(|index| &self.entries[index].1)
    }

    pub fn to_value_or<'a>(&'a self, key: &str, default: &'a V) -> &'a V {
        self.to_value(key).unwrap_or(default)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.position(key).is_some()
    }

    pub fn keys(&self) -> Vec<&str> {
        self.entries.iter().map(|(key, _)| key.as_str()).collect()
    }

    pub fn values(&self) -> Vec<&V> {
        self.entries.iter().map(|(_, value)| value).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.entries.iter().position(|(candidate, _)| candidate == key)
    }
}

impl<V: PartialEq> ValueMapper<V> {
    /// Returns the first key mapped to `value`.
    pub fn to_key(&self, value: &V) -> Option<&str> {
        self.entries
            .iter()
            .find(|(_, candidate)| candidate == value)
            .map(|(key, _)| key.as_str())
    }

    pub fn contains_value(&self, value: &V) -> bool {
        self.entries.iter().any(|(_, candidate)| candidate == value)
    }
}

impl<V> Default for ValueMapper<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Into<String>, V> FromIterator<(K, V)> for ValueMapper<V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut mapper = Self::new();
        for (key, value) in iter {
            mapper.add(key, value);
        }
        mapper
    }
}

impl<K: Into<String>, V, const N: usize> From<[(K, V); N]> for ValueMapper<V> {
    fn from(entries: [(K, V); N]) -> Self {
        entries.into_iter().collect()
    }
}
