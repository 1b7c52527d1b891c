/// A named link into a catalog: a title, a chapter, a page image, an author.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Source {
    /// Display name as shown by the site
    pub name: String,
    /// Absolute URL of the resource
    pub url: String,
}
impl Source {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }

    /// Returns `true` if this source lives under `base_url`.
    ///
    /// Scheme and trailing slashes are ignored, so `http://site.com` owns
    /// `https://site.com/manga/x`.
    pub fn is_under(&self, base_url: &str) -> bool {
        let host = strip_scheme(base_url).trim_end_matches('/');
        let url = strip_scheme(&self.url);
        match url.strip_prefix(host) {
            Some(rest) => rest.is_empty() || rest.starts_with(['/', '?', '#']),
            None => false,
        }
    }
}

fn strip_scheme(url: &str) -> &str {
    url.split_once("://").map_or(url, |(_, rest)| rest)
}
