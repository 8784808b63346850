use std::io;

use thiserror::Error;

/// Error type for storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
  #[error("Not found: {path}")]
  NotFound { path: String },

  #[error("Invalid path: {path}")]
  InvalidPath { path: String },

  #[error("I/O error at {path}: {source}")]
  Io {
    path:   String,
    #[source]
    source: io::Error,
  },
}

impl StorageError {
  /// Create a not found error for `path`.
  #[must_use]
  pub fn not_found(path: impl Into<String>) -> Self {
    Self::NotFound { path: path.into() }
  }

  /// Wrap an I/O error, mapping `NotFound` to [`StorageError::NotFound`].
  #[must_use]
  pub fn io(path: impl Into<String>, source: io::Error) -> Self {
    let path = path.into();
    if source.kind() == io::ErrorKind::NotFound {
      Self::NotFound { path }
    } else {
      Self::Io { path, source }
    }
  }

  /// Whether this error means the requested resource does not exist.
  #[must_use]
  pub const fn is_not_found(&self) -> bool {
    matches!(self, Self::NotFound { .. })
  }
}
