//! Storage collaborators for the folio page generator.
//!
//! Two narrow traits describe everything the generator needs from the outside
//! world:
//!
//! - [`SourceStorage`] resolves a requested page path to a Markdown file and
//!   its bytes.
//! - [`TemplateStorage`] lists template entries and reads their content.
//!
//! Both are implemented by [`FsStorage`] (a directory on disk) and
//! [`MemoryStorage`] (an in-memory map, handy for tests and embedded
//! defaults). Implementations never cache: every call observes the current
//! content, which is what makes live preview work without invalidation.
//!
//! # Path Convention
//!
//! Requested paths are URL-style and slash separated:
//! - `""` - root, resolves to `index.md`
//! - `"guide"` - resolves to `guide.md`, then `guide/index.md`
//! - `"guide.md"` - resolves to itself first
pub mod error;
pub mod fs;
pub mod memory;
pub mod path;

pub use error::StorageError;
pub use fs::FsStorage;
pub use memory::MemoryStorage;

/// Default suffix of Markdown source files.
pub const DEFAULT_MARKDOWN_SUFFIX: &str = ".md";

/// A source document located by [`SourceStorage::resolve`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSource {
  /// Slash-separated path of the file that was found, relative to the
  /// storage root (e.g. `docs/intro.md`).
  pub path:    String,
  /// Full file content.
  pub content: Vec<u8>,
}

/// One entry of a template listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
  /// Entry name relative to the template root.
  pub name:   String,
  /// Whether the entry is a directory.
  pub is_dir: bool,
}

/// Access to Markdown sources.
pub trait SourceStorage: Send + Sync {
  /// Resolve a requested page path to a source file and read it fully.
  ///
  /// # Errors
  ///
  /// Returns [`StorageError::NotFound`] if no candidate file exists,
  /// [`StorageError::InvalidPath`] for paths containing `.` or `..`
  /// segments, and [`StorageError::Io`] if a file exists but cannot be read.
  fn resolve(&self, path: &str) -> Result<ResolvedSource, StorageError>;
}

/// Access to template files.
pub trait TemplateStorage: Send + Sync {
  /// List the top-level entries of the template root.
  ///
  /// # Errors
  ///
  /// Returns an error if the template root cannot be listed.
  fn list(&self) -> Result<Vec<Entry>, StorageError>;

  /// Read the full content of a named entry.
  ///
  /// # Errors
  ///
  /// Returns [`StorageError::NotFound`] if the entry does not exist, or
  /// another [`StorageError`] if it cannot be read.
  fn read(&self, name: &str) -> Result<Vec<u8>, StorageError>;
}

impl<T: SourceStorage + ?Sized> SourceStorage for std::sync::Arc<T> {
  fn resolve(&self, path: &str) -> Result<ResolvedSource, StorageError> {
    (**self).resolve(path)
  }
}

impl<T: TemplateStorage + ?Sized> TemplateStorage for std::sync::Arc<T> {
  fn list(&self) -> Result<Vec<Entry>, StorageError> {
    (**self).list()
  }

  fn read(&self, name: &str) -> Result<Vec<u8>, StorageError> {
    (**self).read(name)
  }
}
