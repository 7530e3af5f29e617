//! Error kinds surfaced by the bundling core.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::remote::RemoteError;

/// Result alias used throughout the core.
pub type Result<T, E = AssetError> = std::result::Result<T, E>;

/// Errors produced while creating, building or publishing asset groups.
#[derive(Debug, Error)]
pub enum AssetError {
    /// The group directory cannot be created or written.
    #[error("group directory `{}` is not writable", path.display())]
    StorageUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid group id: {0}")]
    GroupNotFound(String),

    /// The group record exists but could not be read or decoded.
    #[error("failed to read group `{id}`")]
    GroupRead {
        id: String,
        #[source]
        source: io::Error,
    },

    #[error("invalid asset file path: {}", .0.display())]
    InvalidAssetPath(PathBuf),

    #[error("invalid asset type: {0}")]
    UnsupportedType(String),

    #[error("failed to read asset source `{}`", .0.display())]
    SourceRead(PathBuf, #[source] io::Error),

    #[error("remote store unavailable")]
    RemoteUnavailable(#[from] RemoteError),
}

impl AssetError {
    /// HTTP status class for this error.
    ///
    /// Unknown groups are the client's fault; everything else points at
    /// misconfiguration or an unavailable backend.
    pub const fn status(&self) -> u16 {
        match self {
            Self::GroupNotFound(_) => 404,
            _ => 500,
        }
    }

    pub(crate) fn storage(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::StorageUnavailable {
            path: path.into(),
            source,
        }
    }
}
