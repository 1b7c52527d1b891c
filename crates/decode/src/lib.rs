//! Sandboxed decoding of obfuscated resource tokens.
//!
//! Some catalogs hide the real URL of every page image behind a token that
//! only their own JavaScript can decode. Rather than reimplementing each
//! site's cipher, this crate runs the site's scripts in an embedded QuickJS
//! interpreter that has no access to the host:
//!
//! - no filesystem, network, timers or module loader,
//! - no-op stand-ins for the browser globals scripts commonly touch,
//! - a host-enforced wall-clock budget and heap limit on every execution, and
//! - only plain strings crossing the boundary in either direction.
//!
//! The flow is [`SandboxedDecoder::get_wrap_ka`] once per page, then
//! [`DecodeSession::decode`] once per token.

mod artifact;
mod consts;
mod decoder;
pub mod error;
mod fetch;
mod scheme;
mod session;

pub use crate::artifact::CompiledArtifact;
pub use crate::decoder::SandboxedDecoder;
#[cfg(any(test, feature = "mock"))]
pub use crate::fetch::MockFetcher;
pub use crate::fetch::{Fetcher, FetcherHandle};
pub use crate::scheme::Scheme;
pub use crate::session::{DecodeSession, Limits};
