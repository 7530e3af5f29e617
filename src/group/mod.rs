//! Asset groups: ordered file sets and their durable identifiers.

mod fileset;
mod id;
mod store;

pub use fileset::FileSet;
pub use id::{GROUP_ID_LEN, GroupId};
pub use store::GroupStore;
