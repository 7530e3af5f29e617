//! Cache backends and the render cache built on them.

mod backend;
mod file;
mod memory;
mod render;

pub use backend::{CacheBackend, CacheError, NullCache};
pub use file::FileCache;
pub use memory::MemoryCache;
pub use render::RenderCache;
