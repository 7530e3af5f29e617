//! vasset: asset grouping cache.
//!
//! Groups JS/CSS files registered while a page renders, combines and
//! minifies them into one payload, caches it by group id and last-modified
//! fingerprint, and serves it locally or publishes it to a remote store.
//!
//! [`registry::ScriptRegistry`] is the page-side entry point;
//! [`bundler::Bundler`] wires group storage, freshness, caching and
//! publishing together.

pub mod asset;
pub mod bundler;
pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod freshness;
pub mod group;
pub mod logger;
pub mod registry;
pub mod remote;
pub mod utils;

pub use bundler::{Bundler, LinkOptions};
pub use error::{AssetError, Result};
