//! Catalog models and the adapter contract.
//!
//! Every supported site is wrapped in an adapter implementing [`Provider`]
//! (plus [`SourceProvider`] or [`NovelProvider`]). Adapters embed a
//! [`ProviderCore`] for the parts they all share: resolving free-text titles
//! against harvested listings, and decoding obfuscated page tokens in a
//! sandbox.

pub mod error;
mod mapper;
pub mod models;
mod provider;
mod shared;

pub use crate::mapper::ValueMapper;
pub use crate::provider::{NovelProvider, Provider, ProviderKind, SourceProvider};
pub use crate::shared::ProviderCore;
