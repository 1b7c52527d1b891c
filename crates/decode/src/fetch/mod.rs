//! Script retrieval.
//!
//! The decoder never talks to the network itself. Whatever owns the HTTP
//! session (cookies, challenge solving, retries) implements [`Fetcher`] and
//! hands it to the [`SandboxedDecoder`](crate::SandboxedDecoder).

#[cfg(any(test, feature = "mock"))]
mod mock;

#[cfg(any(test, feature = "mock"))]
pub use self::mock::MockFetcher;
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

pub type FetcherHandle = Arc<dyn Fetcher>;

/// Source of raw script text.
///
/// # Errors
///
/// Implementations should report failures as
/// [`ScriptLoad`](crate::error::ErrorKind::ScriptLoad); the decoder returns
/// them to its caller without modification.
///
/// # Examples
///
/// ```
/// use async_trait::async_trait;
/// use shelf_decode::{Fetcher, error::{ErrorKind, Result}};
///
/// struct Bundled;
///
/// #[async_trait]
/// impl Fetcher for Bundled {
///     async fn fetch(&self, script: &str) -> Result<String> {
///         match script {
///             "ca" => Ok("var CryptoJS = {};".to_string()),
///             other => exn::bail!(ErrorKind::ScriptLoad(other.to_string())),
///         }
///     }
/// }
/// ```
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetch the script registered under `script` (for example `"ca"` for a
    /// site's `/Scripts/ca.js`).
    async fn fetch(&self, script: &str) -> Result<String>;
}
