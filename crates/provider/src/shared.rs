//! State shared by every adapter: a title cache and an optional decoder.

use std::future::Future;

use shelf_cache::{DEFAULT_ACCEPTANCE_THRESHOLD, FuzzyResolutionCache};
use shelf_decode::SandboxedDecoder;
use tokio::sync::RwLock;
use tracing::instrument;

use crate::error::{ErrorKind, Result};
use crate::models::Source;

/// Building block adapters embed to get title resolution and token decoding.
///
/// Titles harvested from a site's listing pages go into a
/// [`FuzzyResolutionCache`]; [`resolve`](Self::resolve) then maps a user's
/// free-text title onto one of them, rejecting anything that scores below
/// the configured threshold.
///
/// # Examples
///
/// ```rust
/// use shelf_provider::{ProviderCore, models::Source};
/// # async fn example() -> shelf_provider::error::Result<()> {
/// let core = ProviderCore::new("http://kissmanga.com");
/// core.harvest([Source::new("One Piece", "http://kissmanga.com/Manga/One-Piece")]).await;
/// let source = core.resolve("one-piece").await?;
/// assert_eq!(source.name, "One Piece");
/// # Ok(())
/// # }
/// ```
pub struct ProviderCore {
    base_url: String,
    threshold: f64,
    titles: RwLock<FuzzyResolutionCache<Source>>,
    decoder: Option<SandboxedDecoder>,
}

impl ProviderCore {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            threshold: DEFAULT_ACCEPTANCE_THRESHOLD,
            titles: RwLock::new(FuzzyResolutionCache::new()),
            decoder: None,
        }
    }

    /// Minimum similarity a cached title needs to be returned by
    /// [`resolve`](Self::resolve). Values outside `[0, 1]` are clamped.
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold.clamp(0.0, 1.0);
        self
    }

    pub fn with_decoder(mut self, decoder: SandboxedDecoder) -> Self {
        self.decoder = Some(decoder);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn decoder(&self) -> Option<&SandboxedDecoder> {
        self.decoder.as_ref()
    }

    /// Reject sources that don't belong to this provider's site.
    pub fn ensure_source(&self, source: &Source) -> Result<()> {
        if source.is_under(&self.base_url) {
            return Ok(());
        }
        exn::bail!(ErrorKind::IncorrectSource(source.url.clone()))
    }

    /// Add titles scraped from a listing page. Titles that normalize to an
    /// already cached key replace it. Returns the number of cached titles.
    #[instrument(skip_all)]
    pub async fn harvest(&self, sources: impl IntoIterator<Item = Source>) -> usize {
        let mut titles = self.titles.write().await;
        let before = titles.len();
        for source in sources {
            let name = source.name.clone();
            titles.update(&name, source);
        }
        tracing::debug!(added = titles.len() - before, total = titles.len(), "Harvested titles");
        titles.len()
    }

    pub async fn is_harvested(&self) -> bool {
        !self.titles.read().await.is_empty()
    }

    /// Resolve a free-text title to the closest harvested source.
    ///
    /// # Errors
    ///
    /// [`TitleNotFound`](ErrorKind::TitleNotFound) if nothing has been
    /// harvested, or if the closest title scores below the threshold; the
    /// latter names the closest match and its score.
    #[instrument(skip(self), fields(threshold = self.threshold))]
    pub async fn resolve(&self, title: &str) -> Result<Source> {
        let titles = self.titles.read().await;
        let resolution = titles
            .best_match(title)
            .and_then(|resolution| resolution.accept(self.threshold))
            .map_err(ErrorKind::not_found)?;
        Ok(resolution.cloned())
    }

    /// Like [`resolve`](Self::resolve), but runs `listing` to harvest titles
    /// first if the cache is empty.
    pub async fn resolve_or_harvest<F, Fut>(&self, title: &str, listing: F) -> Result<Source>
    where
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = Result<Vec<Source>>> + Send,
    {
        if !self.is_harvested().await {
            tracing::debug!(base_url = %self.base_url, "Title cache empty, harvesting listing");
            self.harvest(listing().await?).await;
        }
        self.resolve(title).await
    }

    /// Decode the obfuscated page tokens of a chapter page, in order.
    ///
    /// # Errors
    ///
    /// [`NotSupported`](ErrorKind::NotSupported) if this provider has no
    /// decoder, otherwise [`Decode`](ErrorKind::Decode) wrapping whatever the
    /// decoder reported.
    #[instrument(skip(self, page_body, tokens), fields(tokens = tokens.len()))]
    pub async fn decode_pages(&self, page_body: &str, tokens: &[&str]) -> Result<Vec<String>> {
        let Some(decoder) = &self.decoder else {
            exn::bail!(ErrorKind::NotSupported);
        };
        let session = decoder.get_wrap_ka(page_body).await.map_err(ErrorKind::decode)?;
        let mut pages = Vec::with_capacity(tokens.len());
        for token in tokens {
            pages.push(session.decode(token).await.map_err(ErrorKind::decode)?);
        }
        Ok(pages)
    }

    /// Forget harvested titles and the decoder's compiled scripts.
    pub async fn clear_cache(&self) {
        self.titles.write().await.clear();
        if let Some(decoder) = &self.decoder {
            decoder.clear_cache();
        }
        tracing::debug!(base_url = %self.base_url, "Provider caches cleared");
    }
}
