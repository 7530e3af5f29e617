//! Asset processing: path mapping, CSS rewriting, minification and the
//! group build pipeline.

mod kind;
pub mod minify;
mod pipeline;
mod rewrite;
mod roots;
mod route;
mod transform;

// Types
pub use kind::AssetType;
pub use route::AssetRoute;
pub use roots::{PublicRoot, PublicRoots};

// Building
pub use pipeline::Pipeline;
pub use rewrite::rewrite_css_urls;
pub use transform::{MinifyTransform, SourceAsset, Transform};
