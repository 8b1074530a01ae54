//! Specification persistence
//!
//! Files are written to a temporary file in the destination directory and
//! then renamed into place, so an interrupted write never leaves a truncated
//! specification behind.


use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::debug;

use super::validation::SecurePath;

/// What to do when the target file already exists
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WriteMode {
    /// Replace the existing file; concurrent writers race and the last one wins
    #[default]
    Overwrite,
    FailIfExists,
}

impl fmt::Display for WriteMode {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Overwrite => write!(f, "overwrite"),
            Self::FailIfExists => write!(f, "fail_if_exists"),
        }
    }
}

#[derive(Debug, Error)]
pub enum WriteError {
    #[error("refusing to write to unsafe path: {path}")]
    UnsafePath { path: String },
    #[error("invalid file name: {name}")]
    InvalidFilename { name: String },
    #[error("file already exists: {}", path.display())]
    AlreadyExists { path: PathBuf },
    #[error("permission denied writing {}", path.display())]
    PermissionDenied { path: PathBuf },
    #[error("failed to write {}: {message}", path.display())]
    Io { path: PathBuf, message: String },
}

impl WriteError {
    fn from_io(path: &Path, error: &std::io::Error) -> Self {
        match error.kind() {
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied {
                path: path.to_path_buf(),
            },
            std::io::ErrorKind::AlreadyExists => Self::AlreadyExists {
                path: path.to_path_buf(),
            },
            _ => Self::Io {
                path: path.to_path_buf(),
                message: error.kind().to_string(),
            },
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SpecificationWriter {
    mode: WriteMode,
}

impl SpecificationWriter {
    #[inline]
    pub fn new(mode: WriteMode) -> Self {
        Self { mode }
    }

    #[inline]
    pub fn mode(&self) -> WriteMode {
        self.mode
    }

    /// Write `content` as UTF-8 to `directory/filename`, creating the
    /// directory if needed. Returns the absolute path of the written file.
    #[inline]
    pub fn write(
        &self,
        content: &str,
        directory: &SecurePath,
        filename: &str,
    ) -> Result<PathBuf, WriteError> {
        if !directory.is_safe() {
            return Err(WriteError::UnsafePath {
                path: directory.raw().to_string(),
            });
        }

        if filename.is_empty()
            || filename.contains(['/', '\\'])
            || filename == "."
            || filename == ".."
        {
            return Err(WriteError::InvalidFilename {
                name: filename.to_string(),
            });
        }

        let dir = directory.sanitized();
        fs::create_dir_all(dir).map_err(|e| WriteError::from_io(dir, &e))?;

        let target = dir.join(filename);
        let absolute = std::path::absolute(&target).map_err(|e| WriteError::from_io(&target, &e))?;
        let mut temp = NamedTempFile::new_in(dir).map_err(|e| WriteError::from_io(dir, &e))?;
        temp.write_all(content.as_bytes())
            .and_then(|()| temp.as_file().sync_all())
            .map_err(|e| WriteError::from_io(&target, &e))?;

        match self.mode {
            WriteMode::Overwrite => temp.persist(&target),
            WriteMode::FailIfExists => temp.persist_noclobber(&target),
        }
        .map_err(|e| WriteError::from_io(&target, &e.error))?;

        debug!("Wrote {} bytes to {}", content.len(), absolute.display());

        Ok(absolute)
    }
}
