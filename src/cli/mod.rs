//! Command-line interface module.

mod args;
pub mod bundle;
pub mod group;
pub mod serve;

pub use args::{Cli, Commands};
