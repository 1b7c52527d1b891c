//! The contract every catalog adapter implements.
//!
//! Adapters are used through trait objects, so the traits go through
//! `async_trait` rather than native async functions.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{Chapter, Details, SearchOptions, SearchResults, Source};

/// What kind of catalog a provider fronts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    /// Hosts comic pages; implements [`SourceProvider`]
    Comic,
    /// Hosts novel text; implements [`NovelProvider`]
    Novel,
    /// Only indexes titles (metadata, no readable content)
    Database,
}

/// Searching and describing titles.
///
/// # Errors
///
/// Operations a site has no equivalent for should fail with
/// [`NotSupported`](crate::error::ErrorKind::NotSupported). Sources that
/// belong to another site should fail with
/// [`IncorrectSource`](crate::error::ErrorKind::IncorrectSource).
#[async_trait]
pub trait Provider: Send + Sync {
    /// Stable identifier, such as `"KissManga"`.
    fn id(&self) -> &str;

    /// Root URL; every [`Source`] this provider returns lives under it.
    fn base_url(&self) -> &str;

    fn provides(&self) -> ProviderKind;

    async fn search(&self, title: &str, options: &SearchOptions) -> Result<SearchResults>;

    /// Like [`search`](Self::search), but returns only the closest match.
    async fn find(&self, title: &str) -> Result<Source>;

    async fn details(&self, source: &Source) -> Result<Details>;
}

/// A provider that serves comic pages.
#[async_trait]
pub trait SourceProvider: Provider {
    /// Chapters of a title, oldest first.
    async fn chapters(&self, source: &Source) -> Result<Vec<Chapter>>;

    /// Page images of a chapter, in reading order.
    async fn pages(&self, source: &Source) -> Result<Vec<Source>>;
}

/// A provider that serves novel text.
#[async_trait]
pub trait NovelProvider: Provider {
    /// Chapters of a title, oldest first.
    async fn chapters(&self, source: &Source) -> Result<Vec<Chapter>>;

    /// Text of a single chapter.
    async fn chapter(&self, source: &Source) -> Result<String>;
}
