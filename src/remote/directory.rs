//! Remote store backed by a published directory.
//!
//! Suits a mounted bucket or a CDN origin directory: objects are plain files
//! under `root` and are reachable at `base_url` + name.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use tempfile::NamedTempFile;

use super::{RemoteError, RemoteStore, UrlMode};

/// Unreserved URL characters stay literal in object URLs.
const OBJECT_NAME: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

#[derive(Debug, Clone)]
pub struct DirectoryStore {
    root: PathBuf,
    base_url: String,
    ssl_base_url: Option<String>,
}

impl DirectoryStore {
    pub fn new(root: impl Into<PathBuf>, base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            base_url: with_trailing_slash(base_url.into()),
            ssl_base_url: None,
        }
    }

    /// Base URL handed out in [`UrlMode::Ssl`]; defaults to the standard one.
    pub fn with_ssl_base_url(mut self, url: impl Into<String>) -> Self {
        self.ssl_base_url = Some(with_trailing_slash(url.into()));
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn object_path(&self, name: &str) -> Result<PathBuf, RemoteError> {
        let flat = !name.is_empty()
            && !name.starts_with('.')
            && !name.contains(['/', '\\']);
        if flat {
            Ok(self.root.join(name))
        } else {
            Err(RemoteError::Unavailable(format!("invalid object name `{name}`")))
        }
    }

    fn base(&self, mode: UrlMode) -> &str {
        match (mode, &self.ssl_base_url) {
            (UrlMode::Ssl, Some(ssl)) => ssl,
            _ => &self.base_url,
        }
    }
}

fn with_trailing_slash(mut url: String) -> String {
    if !url.ends_with('/') {
        url.push('/');
    }
    url
}

impl RemoteStore for DirectoryStore {
    fn url(&self, name: &str, mode: UrlMode) -> Result<Option<String>, RemoteError> {
        let path = self.object_path(name)?;
        match fs::metadata(&path) {
            Ok(meta) if meta.is_file() => {
                let encoded = utf8_percent_encode(name, OBJECT_NAME);
                Ok(Some(format!("{}{}", self.base(mode), encoded)))
            }
            Ok(_) => Ok(None),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn put(&self, name: &str, data: &[u8], _content_type: &str) -> Result<(), RemoteError> {
        let path = self.object_path(name)?;
        fs::create_dir_all(&self.root)?;
        let mut tmp = NamedTempFile::new_in(&self.root)?;
        tmp.write_all(data)?;
        tmp.persist(&path).map_err(|e| e.error)?;
        Ok(())
    }

    fn list(&self, prefix: &str) -> Result<Vec<String>, RemoteError> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry?;
            if let Some(name) = entry.file_name().to_str()
                && name.starts_with(prefix)
                && entry.file_type()?.is_file()
            {
                names.push(name.to_owned());
            }
        }
        names.sort_unstable();
        Ok(names)
    }

    fn delete(&self, name: &str) -> Result<(), RemoteError> {
        match fs::remove_file(self.object_path(name)?) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
