use folio_storage::StorageError;
use thiserror::Error;

/// Errors raised while loading a template set.
///
/// All of these are configuration problems: retrying without changing the
/// templates will fail the same way.
#[derive(Debug, Error)]
pub enum TemplateError {
  #[error("Failed to list templates: {source}")]
  List {
    #[source]
    source: StorageError,
  },

  #[error("Failed to read template {name}: {source}")]
  Read {
    name:   String,
    #[source]
    source: StorageError,
  },

  #[error("Failed to parse template {name}: {source}")]
  Parse {
    name:   String,
    #[source]
    source: tera::Error,
  },

  #[error("Failed to compile templates: {source}")]
  Compile {
    #[source]
    source: tera::Error,
  },
}

/// Coarse classification of a [`GenerateError`], for mapping to a caller's
/// own outcome (e.g. an HTTP status).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
  /// The requested page does not exist.
  NotFound,
  /// Anything else.
  Internal,
}

/// Error type for page generation.
#[derive(Debug, Error)]
pub enum GenerateError {
  #[error("Page not found: {path}")]
  NotFound { path: String },

  #[error("Failed to read source {path}: {source}")]
  Source {
    path:   String,
    #[source]
    source: StorageError,
  },

  #[error("Failed to load templates: {0}")]
  TemplateLoad(#[from] TemplateError),

  #[error("Failed to render template {template}: {source}")]
  Render {
    template: String,
    #[source]
    source:   tera::Error,
  },
}

impl GenerateError {
  #[must_use]
  pub const fn kind(&self) -> ErrorKind {
    match self {
      Self::NotFound { .. } => ErrorKind::NotFound,
      Self::Source { .. } | Self::TemplateLoad(_) | Self::Render { .. } => {
        ErrorKind::Internal
      },
    }
  }

  #[must_use]
  pub const fn is_not_found(&self) -> bool {
    matches!(self.kind(), ErrorKind::NotFound)
  }
}
