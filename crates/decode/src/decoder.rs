//! Compile-once, decode-many entrypoint.

use std::sync::{Arc, PoisonError, RwLock};

use exn::OptionExt;
use futures::future::try_join_all;
use tokio::sync::Mutex;
use tracing::instrument;

use crate::artifact::CompiledArtifact;
use crate::error::{ErrorKind, Result};
use crate::fetch::FetcherHandle;
use crate::scheme::Scheme;
use crate::session::{DecodeSession, Limits};

/// Resolves obfuscated resource tokens by running the site's own decoding
/// scripts in a sandbox.
///
/// The decoder starts out *uncompiled*. The first call to
/// [`get_wrap_ka`](Self::get_wrap_ka) fetches the scheme's script fragments
/// through the [`Fetcher`](crate::Fetcher) and assembles them into a
/// [`CompiledArtifact`], which is reused by every later call until
/// [`clear_cache`](Self::clear_cache) is called (for example after the site
/// rotates its scripts).
///
/// Each call to [`get_wrap_ka`](Self::get_wrap_ka) gets its own
/// [`DecodeSession`]; sessions never share guest state.
///
/// # Examples
///
/// ```no_run
/// use shelf_decode::{FetcherHandle, SandboxedDecoder};
/// # use shelf_decode::error::Result;
/// # async fn example(fetcher: FetcherHandle, page_body: &str, tokens: &[&str]) -> Result<Vec<String>> {
/// let decoder = SandboxedDecoder::new(fetcher);
/// let session = decoder.get_wrap_ka(page_body).await?;
/// let mut urls = Vec::with_capacity(tokens.len());
/// for token in tokens {
///     urls.push(session.decode(token).await?);
/// }
/// # Ok(urls)
/// # }
/// ```
pub struct SandboxedDecoder {
    fetcher: FetcherHandle,
    scheme: Arc<Scheme>,
    limits: Limits,
    artifact: RwLock<Option<Arc<CompiledArtifact>>>,
    // Held while fetching, so concurrent callers trigger a single compilation.
    compiling: Mutex<()>,
}

impl SandboxedDecoder {
    pub fn new(fetcher: FetcherHandle) -> Self {
        Self {
            fetcher,
            scheme: Arc::new(Scheme::default()),
            limits: Limits::default(),
            artifact: RwLock::new(None),
            compiling: Mutex::new(()),
        }
    }

    pub fn with_scheme(mut self, scheme: Scheme) -> Self {
        self.scheme = Arc::new(scheme);
        self
    }

    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    pub fn scheme(&self) -> &Scheme {
        &self.scheme
    }

    pub fn limits(&self) -> Limits {
        self.limits
    }

    /// Returns `true` if the script fragments have already been fetched.
    pub fn is_compiled(&self) -> bool {
        self.compiled().is_some()
    }

    /// Fetch and assemble the script fragments ahead of the first page.
    pub async fn preload(&self) -> Result<()> {
        self.artifact().await.map(|_| ())
    }

    /// Forget the compiled artifact; the next call to
    /// [`get_wrap_ka`](Self::get_wrap_ka) fetches the scripts again.
    ///
    /// Sessions that already exist keep working with the artifact they were
    /// created from.
    pub fn clear_cache(&self) {
        *self.artifact.write().unwrap_or_else(PoisonError::into_inner) = None;
        tracing::debug!("Compiled decoding artifact cleared");
    }

    /// Prepare a [`DecodeSession`] for the page in `page_body`.
    ///
    /// # Errors
    ///
    /// - [`DecryptionKeyNotFound`](ErrorKind::DecryptionKeyNotFound) if the
    ///   page has no key-derivation expression. Nothing is fetched or run.
    /// - Any error from the [`Fetcher`](crate::Fetcher), unchanged.
    /// - [`ExecutionTimeout`](ErrorKind::ExecutionTimeout) or
    ///   [`Script`](ErrorKind::Script) if loading the artifact or deriving
    ///   the key fails inside the sandbox.
    #[instrument(skip(self, page_body), fields(page_size = page_body.len()))]
    pub async fn get_wrap_ka(&self, page_body: &str) -> Result<DecodeSession> {
        let key_expression = self
            .scheme
            .key_expression(page_body)
            .ok_or_raise(|| ErrorKind::DecryptionKeyNotFound)?;
        let artifact = self.artifact().await?;
        DecodeSession::open(&artifact, key_expression, Arc::clone(&self.scheme), self.limits)
    }

    fn compiled(&self) -> Option<Arc<CompiledArtifact>> {
        self.artifact.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    async fn artifact(&self) -> Result<Arc<CompiledArtifact>> {
        if let Some(artifact) = self.compiled() {
            return Ok(artifact);
        }
        let _compiling = self.compiling.lock().await;
        // Another caller may have finished compiling while we waited.
        if let Some(artifact) = self.compiled() {
            return Ok(artifact);
        }

        let fragments = try_join_all(self.scheme.fragments.iter().map(|name| self.fetcher.fetch(name))).await?;
        let artifact = Arc::new(CompiledArtifact::assemble(&self.scheme, &fragments));
        tracing::debug!(
            hash = %artifact.hash(),
            fragments = fragments.len(),
            bytes = artifact.source().len(),
            "Compiled decoding artifact"
        );
        *self.artifact.write().unwrap_or_else(PoisonError::into_inner) = Some(Arc::clone(&artifact));
        Ok(artifact)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MockFetcher;
    use std::time::Duration;

    const CA: &str = r#"var CryptoJS = { SHA256: function (value) { return "sha:" + value; } };"#;
    const LO: &str = r#"function wrapKA(token) { return token.split("").reverse().join("") + "|" + key; }"#;
    const PAGE: &str = "<html>\n<script type=\"text/javascript\">\n    var chko = \"k1\"; key = CryptoJS.SHA256(chko)\n</script>\n</html>";

    fn decoder_with(ca: &str, lo: &str) -> (Arc<MockFetcher>, SandboxedDecoder) {
        let fetcher = Arc::new(MockFetcher::with_scripts([("ca", ca), ("lo", lo)]));
        let decoder = SandboxedDecoder::new(fetcher.clone()).with_limits(Limits {
            timeout: Duration::from_millis(100),
            ..Limits::default()
        });
        (fetcher, decoder)
    }

    fn page(key_source: &str) -> String {
        format!("<div>\n<script>\n{key_source}; key = CryptoJS.SHA256(chko)</script></div>")
    }

    #[tokio::test]
    async fn test_decode() {
        let (_, decoder) = decoder_with(CA, LO);
        let session = decoder.get_wrap_ka(PAGE).await.unwrap();
        assert_eq!(session.decode("olleh").await.unwrap(), "hello|sha:k1");
        assert_eq!(session.decode("dlrow").await.unwrap(), "world|sha:k1");
        assert_eq!(session.decoded(), 2);
    }

    #[tokio::test]
    async fn test_key_expression_assigns_undeclared_global() {
        // Neither the artifact nor the page declares `CryptoJS` or `key`.
        let ca = r#"CryptoJS = { SHA256: function (value) { return "sha:" + value; } };"#;
        let (_, decoder) = decoder_with(ca, LO);
        let session = decoder
            .get_wrap_ka("<script>\nvar chko = \"k1\"; key = CryptoJS.SHA256(chko)</script>")
            .await
            .unwrap();
        assert_eq!(session.decode("cba").await.unwrap(), "abc|sha:k1");
    }

    #[tokio::test]
    async fn test_missing_key_does_not_fetch() {
        let (fetcher, decoder) = decoder_with(CA, LO);
        let err = decoder.get_wrap_ka("<html><body>nothing</body></html>").await.err().unwrap();
        assert_eq!(*err, ErrorKind::DecryptionKeyNotFound);
        assert_eq!(fetcher.fetches(), 0);
        assert!(!decoder.is_compiled());
    }

    #[tokio::test]
    async fn test_compiles_once_until_cleared() {
        let (fetcher, decoder) = decoder_with(CA, LO);
        decoder.get_wrap_ka(PAGE).await.unwrap();
        decoder.get_wrap_ka(PAGE).await.unwrap();
        assert_eq!(fetcher.fetches(), 2);
        assert!(decoder.is_compiled());

        decoder.clear_cache();
        assert!(!decoder.is_compiled());
        decoder.get_wrap_ka(PAGE).await.unwrap();
        assert_eq!(fetcher.fetches(), 4);
    }

    #[tokio::test]
    async fn test_preload() {
        let (fetcher, decoder) = decoder_with(CA, LO);
        decoder.preload().await.unwrap();
        assert!(decoder.is_compiled());
        decoder.get_wrap_ka(PAGE).await.unwrap();
        assert_eq!(fetcher.fetches(), 2);
    }

    #[tokio::test]
    async fn test_concurrent_callers_share_one_compilation() {
        let (fetcher, decoder) = decoder_with(CA, LO);
        let (a, b) = tokio::join!(decoder.preload(), decoder.preload());
        a.unwrap();
        b.unwrap();
        assert_eq!(fetcher.fetches(), 2);
    }

    #[tokio::test]
    async fn test_decode_is_deterministic() {
        let (_, decoder) = decoder_with(CA, LO);
        let session = decoder.get_wrap_ka(PAGE).await.unwrap();
        let first = session.decode("cba").await.unwrap();
        let second = session.decode("cba").await.unwrap();
        assert_eq!(first, second);
        assert_eq!(session.decoded(), 1);
    }

    #[tokio::test]
    async fn test_memo_skips_guest() {
        // The guest counts its own invocations and folds the count into the result.
        let lo = r##"var calls = 0; function wrapKA(token) { calls += 1; return token + "#" + calls; }"##;
        let (_, decoder) = decoder_with(CA, lo);
        let session = decoder.get_wrap_ka(PAGE).await.unwrap();
        assert_eq!(session.decode("a").await.unwrap(), "a#1");
        assert_eq!(session.decode("a").await.unwrap(), "a#1");
        assert_eq!(session.decode("b").await.unwrap(), "b#2");
    }

    #[tokio::test]
    async fn test_sessions_are_isolated() {
        let (_, decoder) = decoder_with(CA, LO);
        let one = decoder.get_wrap_ka(&page(r#"var chko = "one""#)).await.unwrap();
        let two = decoder.get_wrap_ka(&page(r#"var chko = "two""#)).await.unwrap();
        assert_eq!(one.decode("x").await.unwrap(), "x|sha:one");
        assert_eq!(two.decode("x").await.unwrap(), "x|sha:two");
    }

    #[tokio::test]
    async fn test_token_is_passed_as_data() {
        let (_, decoder) = decoder_with(CA, LO);
        let session = decoder.get_wrap_ka(PAGE).await.unwrap();
        let token = r#"");throw "injected";(""#;
        let decoded = session.decode(token).await.unwrap();
        let reversed: String = token.chars().rev().collect();
        assert_eq!(decoded, format!("{reversed}|sha:k1"));
    }

    #[tokio::test]
    async fn test_browser_globals_are_inert() {
        let (_, decoder) = decoder_with(CA, LO);
        let page = page(r#"alert("hi"); confirm("sure?"); prompt("name?"); location.reload(); var chko = "k3""#);
        let session = decoder.get_wrap_ka(&page).await.unwrap();
        assert_eq!(session.decode("a").await.unwrap(), "a|sha:k3");
    }

    #[tokio::test]
    async fn test_no_host_capabilities() {
        let lo = r#"function wrapKA(token) {
            return [typeof require, typeof process, typeof fetch, typeof XMLHttpRequest, typeof setTimeout].join(",");
        }"#;
        let (_, decoder) = decoder_with(CA, lo);
        let session = decoder.get_wrap_ka(PAGE).await.unwrap();
        assert_eq!(
            session.decode("t").await.unwrap(),
            "undefined,undefined,undefined,undefined,undefined"
        );
    }

    #[tokio::test]
    async fn test_decode_timeout() {
        let lo = "function wrapKA(token) { while (true) {} }";
        let (_, decoder) = decoder_with(CA, lo);
        let session = decoder.get_wrap_ka(PAGE).await.unwrap();
        let err = session.decode("spin").await.unwrap_err();
        assert_eq!(*err, ErrorKind::ExecutionTimeout(Duration::from_millis(100)));
        // A second attempt must not be mistaken for a memoized success.
        let err = session.decode("spin").await.unwrap_err();
        assert_eq!(*err, ErrorKind::ExecutionTimeout(Duration::from_millis(100)));
        assert_eq!(session.decoded(), 0);
    }

    #[tokio::test]
    async fn test_timeout_cannot_be_caught() {
        let lo = "function wrapKA(token) { for (;;) { try { while (true) {} } catch (e) {} } }";
        let (_, decoder) = decoder_with(CA, lo);
        let session = decoder.get_wrap_ka(PAGE).await.unwrap();
        let err = session.decode("spin").await.unwrap_err();
        assert!(matches!(*err, ErrorKind::ExecutionTimeout(_)));
    }

    #[tokio::test]
    async fn test_artifact_timeout() {
        let (_, decoder) = decoder_with("while (true) {}", LO);
        let err = decoder.get_wrap_ka(PAGE).await.err().unwrap();
        assert!(matches!(*err, ErrorKind::ExecutionTimeout(_)));
    }

    #[tokio::test]
    async fn test_key_expression_timeout() {
        let (_, decoder) = decoder_with(CA, LO);
        let page = page("while (true) {} var chko = 1");
        let err = decoder.get_wrap_ka(&page).await.err().unwrap();
        assert!(matches!(*err, ErrorKind::ExecutionTimeout(_)));
    }

    #[tokio::test]
    async fn test_guest_exception() {
        let lo = r#"function wrapKA(token) { throw new Error("boom"); }"#;
        let (_, decoder) = decoder_with(CA, lo);
        let session = decoder.get_wrap_ka(PAGE).await.unwrap();
        let err = session.decode("x").await.unwrap_err();
        assert_eq!(*err, ErrorKind::Script("boom".to_string()));
    }

    #[tokio::test]
    async fn test_non_string_result() {
        let lo = "function wrapKA(token) { return 42; }";
        let (_, decoder) = decoder_with(CA, lo);
        let session = decoder.get_wrap_ka(PAGE).await.unwrap();
        let err = session.decode("x").await.unwrap_err();
        assert_eq!(*err, ErrorKind::TokenNotDecoded("x".to_string()));
    }

    #[tokio::test]
    async fn test_fetch_failure_propagates() {
        let fetcher = Arc::new(MockFetcher::with_scripts([("ca", CA)]));
        let decoder = SandboxedDecoder::new(fetcher);
        let err = decoder.get_wrap_ka(PAGE).await.err().unwrap();
        assert_eq!(*err, ErrorKind::ScriptLoad("lo".to_string()));
        assert!(!decoder.is_compiled());
    }

    #[tokio::test]
    async fn test_custom_scheme() {
        let fetcher = Arc::new(MockFetcher::with_scripts([("cipher", "function unscramble(t) { return t.toUpperCase() + secret; }")]));
        let scheme = Scheme::default()
            .with_fragments(["cipher"])
            .with_decoder("unscramble")
            .with_key_pattern(regex::Regex::new(r"data-key='([^']+)'").unwrap());
        let decoder = SandboxedDecoder::new(fetcher).with_scheme(scheme);
        let session = decoder.get_wrap_ka("<div data-key='var secret = \"!\"'></div>").await.unwrap();
        assert_eq!(session.decode("abc").await.unwrap(), "ABC!");
    }
}
