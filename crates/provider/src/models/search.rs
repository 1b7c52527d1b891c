use super::{Genre, Source};

/// Options accepted by [`Provider::search`](crate::Provider::search).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchOptions {
    /// Maximum number of results to return
    pub limit: Option<usize>,
    /// 1-based results page
    pub page: Option<u32>,
    /// Leave light novels out of the results
    pub exclude_novels: bool,
    /// Only return titles tagged with every one of these genres
    pub genres: Vec<Genre>,
    /// Resolve the query against harvested titles instead of the site's own
    /// search form
    pub fuzzy: bool,
}
impl SearchOptions {
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn page(&self) -> u32 {
        self.page.unwrap_or(1).max(1)
    }
}

/// One page of search results.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchResults {
    pub results: Vec<Source>,
    /// Whether another page of results is available
    pub has_more: bool,
    /// Whether an earlier page of results exists
    pub has_previous_page: bool,
    /// 1-based page these results came from
    pub page: u32,
}
impl SearchResults {
    /// Build a results page from a full result list, applying the limit and
    /// page of `options`.
    pub fn paginate(results: Vec<Source>, options: &SearchOptions) -> Self {
        let page = options.page();
        let Some(limit) = options.limit.filter(|limit| *limit > 0) else {
            return Self {
                results,
                has_more: false,
                has_previous_page: false,
                page,
            };
        };
        let skip = limit.saturating_mul(page as usize - 1);
        let has_more = results.len() > skip.saturating_add(limit);
        Self {
            results: results.into_iter().skip(skip).take(limit).collect(),
            has_more,
            has_previous_page: page > 1,
            page,
        }
    }
}
