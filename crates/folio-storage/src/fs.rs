//! Filesystem storage backend.
use std::{
  fs,
  io,
  path::{Path, PathBuf},
};

use log::trace;
use walkdir::WalkDir;

use crate::{
  DEFAULT_MARKDOWN_SUFFIX,
  Entry,
  ResolvedSource,
  SourceStorage,
  StorageError,
  TemplateStorage,
  path::{normalize, source_candidates},
};

/// Storage rooted at a directory on disk.
#[derive(Debug, Clone)]
pub struct FsStorage {
  root:            PathBuf,
  markdown_suffix: String,
}

impl FsStorage {
  /// Create a storage rooted at `root`.
  #[must_use]
  pub fn new(root: impl Into<PathBuf>) -> Self {
    Self {
      root:            root.into(),
      markdown_suffix: DEFAULT_MARKDOWN_SUFFIX.to_string(),
    }
  }

  /// Use a different suffix when resolving Markdown sources.
  #[must_use]
  pub fn with_markdown_suffix(mut self, suffix: impl Into<String>) -> Self {
    self.markdown_suffix = suffix.into();
    self
  }

  /// The directory this storage reads from.
  #[must_use]
  pub fn root(&self) -> &Path {
    &self.root
  }
}

impl SourceStorage for FsStorage {
  fn resolve(&self, path: &str) -> Result<ResolvedSource, StorageError> {
    for candidate in source_candidates(path, &self.markdown_suffix)? {
      let full_path = self.root.join(&candidate);
      if !full_path.is_file() {
        continue;
      }

      match fs::read(&full_path) {
        Ok(content) => {
          trace!("Resolved {path:?} to {}", full_path.display());
          return Ok(ResolvedSource {
            path: candidate,
            content,
          });
        },
        // Removed between the check and the read
        Err(e) if e.kind() == io::ErrorKind::NotFound => {},
        Err(e) => return Err(StorageError::io(candidate, e)),
      }
    }

    Err(StorageError::not_found(path))
  }
}

impl TemplateStorage for FsStorage {
  fn list(&self) -> Result<Vec<Entry>, StorageError> {
    let mut entries = Vec::new();
    for entry in WalkDir::new(&self.root).min_depth(1).max_depth(1) {
      let entry = entry.map_err(|e| {
        StorageError::Io {
          path:   self.root.display().to_string(),
          source: io::Error::from(e),
        }
      })?;
      entries.push(Entry {
        name:   entry.file_name().to_string_lossy().into_owned(),
        is_dir: entry.file_type().is_dir(),
      });
    }
    Ok(entries)
  }

  fn read(&self, name: &str) -> Result<Vec<u8>, StorageError> {
    let normalized = normalize(name)?;
    fs::read(self.root.join(&normalized))
      .map_err(|e| StorageError::io(normalized, e))
  }
}
