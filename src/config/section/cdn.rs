//! `[cdn]` section configuration.
//!
//! When enabled, bundles are published to a directory served by a CDN and
//! pages link to the CDN URL instead of the local endpoint.
//!
//! # Example
//!
//! ```toml
//! [cdn]
//! enable = true
//! ssl = true
//! dir = "/mnt/cdn/bundles"
//! url = "http://cdn.example.com/bundles/"
//! ssl_url = "https://cdn.example.com/bundles/"
//! ```

use std::path::PathBuf;

use macros::Config;
use serde::{Deserialize, Serialize};

use crate::config::ConfigDiagnostics;

/// Remote publishing settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Config)]
#[serde(default)]
#[config(section = "cdn")]
pub struct CdnConfig {
    /// Publish bundles instead of serving them locally.
    pub enable: bool,

    /// Hand out `ssl_url` based URLs.
    pub ssl: bool,

    /// Directory published by the CDN.
    pub dir: Option<PathBuf>,

    /// Public base URL of `dir`.
    pub url: Option<String>,

    /// HTTPS base URL of `dir`; falls back to `url`.
    pub ssl_url: Option<String>,
}

impl CdnConfig {
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if !self.enable {
            return;
        }
        if self.dir.is_none() {
            diag.error(Self::FIELDS.dir, "required when `cdn.enable = true`");
        }
        match &self.url {
            None => diag.error(Self::FIELDS.url, "required when `cdn.enable = true`"),
            Some(url) if url::Url::parse(url).is_err() => {
                diag.error(Self::FIELDS.url, format!("`{url}` is not an absolute URL"));
            }
            Some(_) => {}
        }
        if self.ssl && self.ssl_url.is_none() {
            diag.hint(Self::FIELDS.ssl_url, "not set, `cdn.url` is used for SSL links");
        }
    }
}
