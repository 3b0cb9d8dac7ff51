//! JSON file persistence.
//!
//! Every persisted record is a single JSON document. [`JsonFile::load`] fails open: a
//! missing file is absent data, and a file that cannot be parsed is logged, removed and
//! treated as absent. [`JsonFile::read`] reports the same problems without touching
//! the file, for records that must never be discarded.

use std::{
    fmt,
    fs, io,
    marker::PhantomData,
    path::{Path, PathBuf},
};

use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;
use tracing::warn;

/// Errors that can occur while reading or writing a record.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem error
    #[error("failed to access {path}: {source}")]
    Io {
        /// Record location
        path: PathBuf,

        /// Underlying error
        #[source]
        source: io::Error,
    },

    /// The stored document could not be parsed.
    #[error("corrupt record in {path}: {source}")]
    Corrupt {
        /// Record location
        path: PathBuf,

        /// Parse error
        #[source]
        source: serde_json::Error,
    },

    /// The record could not be serialized.
    #[error("failed to serialize record: {0}")]
    Json(#[from] serde_json::Error),
}

/// A single JSON document on disk holding a `T`.
pub struct JsonFile<T> {
    path: PathBuf,
    _record: PhantomData<fn() -> T>,
}

impl<T> fmt::Debug for JsonFile<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsonFile").field("path", &self.path).finish()
    }
}

impl<T> Clone for JsonFile<T> {
    fn clone(&self) -> Self {
        Self::new(self.path.clone())
    }
}

impl<T> JsonFile<T> {
    /// Refer to the record stored at `path`. Nothing is read until [`JsonFile::load`].
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _record: PhantomData,
        }
    }

    /// Record location.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Delete the record. Deleting a missing record succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the file exists but cannot be removed.
    pub fn clear(&self) -> Result<(), StoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(source) if source.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(self.io_error(source)),
        }
    }

    fn io_error(&self, source: io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl<T: Serialize + DeserializeOwned> JsonFile<T> {
    /// Read the record without modifying the file.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the file exists but cannot be read, or
    /// [`StoreError::Corrupt`] if it cannot be parsed.
    pub fn read(&self) -> Result<Option<T>, StoreError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(source) if source.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(self.io_error(source)),
        };

        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|source| StoreError::Corrupt {
                path: self.path.clone(),
                source,
            })
    }

    /// Read the record, if there is a readable one.
    ///
    /// A corrupt record is removed.
    pub fn load(&self) -> Option<T> {
        match self.read() {
            Ok(record) => record,
            Err(error @ StoreError::Corrupt { .. }) => {
                warn!("discarding {error}");

                if let Err(error) = self.clear() {
                    warn!("{error}");
                }

                None
            }
            Err(error) => {
                warn!("failed to read stored record: {error}");
                None
            }
        }
    }

    /// Replace the record with `record`.
    ///
    /// The document is written next to the record and renamed into place, so a
    /// failed write never leaves a truncated record behind.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the record cannot be serialized or written.
    pub fn save(&self, record: &T) -> Result<(), StoreError> {
        let raw = serde_json::to_string_pretty(record)?;

        if let Some(parent) = self.path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| self.io_error(source))?;
        }

        let staging = self.path.with_extension("json.tmp");

        fs::write(&staging, raw).map_err(|source| self.io_error(source))?;
        fs::rename(&staging, &self.path).map_err(|source| self.io_error(source))
    }
}
