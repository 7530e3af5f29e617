use std::io;

use thiserror::Error;

/// Failures talking to the remote object store.
#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("remote store unavailable: {0}")]
    Unavailable(String),

    #[error("remote store io error")]
    Io(#[from] io::Error),

    /// Upload reported success but the object has no URL.
    #[error("no url for uploaded object `{0}`")]
    MissingUrl(String),
}
