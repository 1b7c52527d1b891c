//! In-memory script fetcher for testing.

use crate::Fetcher;
use crate::error::{ErrorKind, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

/// In-memory [`Fetcher`] for testing.
///
/// Serves scripts from a `HashMap` and counts every fetch attempt, so tests
/// can assert when the decoder does (or doesn't) reach for its scripts.
///
/// # Examples
///
/// Runs with `--features mock`; without it the example compiles to nothing.
///
/// ```
/// # #[cfg(feature = "mock")]
/// # mod example {
/// use shelf_decode::{Fetcher, MockFetcher};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # pub async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let fetcher = MockFetcher::with_scripts([("ca", "var a = 1;")]);
/// assert_eq!(fetcher.fetch("ca").await?, "var a = 1;");
/// assert!(fetcher.fetch("lo").await.is_err());
/// assert_eq!(fetcher.fetches(), 2);
/// # Ok(())
/// # }
/// # }
/// # fn main() {
/// #     #[cfg(feature = "mock")]
/// #     example::main().unwrap();
/// # }
/// ```
#[derive(Debug, Default)]
pub struct MockFetcher {
    scripts: HashMap<String, String>,
    fetches: AtomicUsize,
}

impl MockFetcher {
    pub fn with_scripts(scripts: impl IntoIterator<Item = (impl Into<String>, impl Into<String>)>) -> Self {
        Self {
            scripts: scripts.into_iter().map(|(name, body)| (name.into(), body.into())).collect(),
            fetches: AtomicUsize::new(0),
        }
    }

    /// Number of fetch attempts so far, successful or not.
    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Fetcher for MockFetcher {
    async fn fetch(&self, script: &str) -> Result<String> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.scripts
            .get(script)
            .cloned()
            .ok_or_else(|| exn::Exn::from(ErrorKind::ScriptLoad(script.to_string())))
    }
}
