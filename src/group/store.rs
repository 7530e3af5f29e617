//! Durable GroupId → FileSet records.
//!
//! Each group is one JSON file named after its id. Records are written to a
//! temp file in the same directory and linked into place without clobbering,
//! so the first writer wins and readers never observe a partial record.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use super::{FileSet, GroupId};
use crate::debug;
use crate::error::{AssetError, Result};

#[derive(Serialize)]
struct RecordOut<'a> {
    files: Vec<&'a str>,
}

#[derive(Deserialize)]
struct RecordIn {
    files: Vec<PathBuf>,
}

/// Directory-backed group store.
#[derive(Debug, Clone)]
pub struct GroupStore {
    dir: PathBuf,
    prefix: String,
}

impl GroupStore {
    pub fn new(dir: impl Into<PathBuf>, prefix: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            prefix: prefix.into(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    fn record_path(&self, id: &GroupId) -> PathBuf {
        self.dir.join(id.as_str())
    }

    /// Persist `files` (if not already known) and return their id.
    pub fn ensure(&self, files: &FileSet) -> Result<GroupId> {
        let id = GroupId::derive(&self.prefix, files);
        let path = self.record_path(&id);
        if path.is_file() {
            return Ok(id);
        }

        let record = serde_json::to_vec(&RecordOut {
            files: files.to_strings()?,
        })
        .map_err(|e| AssetError::storage(&path, io::Error::other(e)))?;

        fs::create_dir_all(&self.dir).map_err(|e| AssetError::storage(&self.dir, e))?;
        let mut tmp = NamedTempFile::new_in(&self.dir).map_err(|e| AssetError::storage(&self.dir, e))?;
        tmp.write_all(&record)
            .and_then(|()| tmp.as_file().sync_all())
            .map_err(|e| AssetError::storage(&self.dir, e))?;

        match tmp.persist_noclobber(&path) {
            Ok(_) => debug!("group"; "created {} ({} files)", id, files.len()),
            // Lost the race to an identical record
            Err(e) if e.error.kind() == io::ErrorKind::AlreadyExists => {}
            Err(e) => return Err(AssetError::storage(&path, e.error)),
        }
        Ok(id)
    }

    /// Load the FileSet of a group id received from outside.
    pub fn lookup(&self, raw: &str) -> Result<FileSet> {
        let id = GroupId::parse(raw)?;
        let read_error = |source| AssetError::GroupRead {
            id: id.to_string(),
            source,
        };

        let bytes = match fs::read(self.record_path(&id)) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(AssetError::GroupNotFound(id.to_string()));
            }
            Err(e) => return Err(read_error(e)),
        };

        let record: RecordIn = serde_json::from_slice(&bytes)
            .map_err(|e| read_error(io::Error::new(io::ErrorKind::InvalidData, e)))?;
        Ok(FileSet::new(record.files))
    }

    pub fn contains(&self, id: &GroupId) -> bool {
        self.record_path(id).is_file()
    }
}
