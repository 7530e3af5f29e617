//! Pluggable combine/minify transform.

use super::{AssetRoute, AssetType, minify, rewrite};
use crate::debug;
use crate::error::Result;

/// One loaded file of a group, in group order.
#[derive(Debug, Clone)]
pub struct SourceAsset {
    pub route: AssetRoute,
    pub content: String,
}

/// Turns the files of a group into a single payload.
///
/// Implementations must keep every file's output in input order.
pub trait Transform: Send + Sync {
    fn transform(&self, ty: AssetType, assets: &[SourceAsset]) -> Result<String>;
}

/// Default transform: per-file CSS reference rewriting and minification,
/// then concatenation.
#[derive(Debug, Clone, Copy)]
pub struct MinifyTransform {
    minify: bool,
}

impl MinifyTransform {
    pub const fn new(minify: bool) -> Self {
        Self { minify }
    }

    fn transform_one(&self, ty: AssetType, asset: &SourceAsset) -> String {
        let source = match ty {
            AssetType::Css => rewrite::rewrite_css_urls(&asset.content, &asset.route.base_url),
            AssetType::Js => asset.content.as_str().into(),
        };

        if !self.minify {
            return source.into_owned();
        }

        minify::minify(ty, &source).unwrap_or_else(|| {
            debug!("minify"; "{} did not parse, keeping source", asset.route.path.display());
            source.into_owned()
        })
    }
}

impl Default for MinifyTransform {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Transform for MinifyTransform {
    fn transform(&self, ty: AssetType, assets: &[SourceAsset]) -> Result<String> {
        let mut out = String::new();
        for asset in assets {
            let piece = self.transform_one(ty, asset);
            let piece = piece.trim_end();
            if piece.is_empty() {
                continue;
            }
            if !out.is_empty() {
                out.push('\n');
            }
            out.push_str(piece);
            // Keep statements from merging across file boundaries. The
            // separator goes on its own line so a trailing `//` comment
            // cannot swallow it.
            if ty == AssetType::Js && !piece.ends_with(';') {
                out.push_str("\n;");
            }
        }
        Ok(out)
    }
}
