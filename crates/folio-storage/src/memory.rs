//! In-memory storage backend.
use std::{
  collections::BTreeMap,
  sync::{PoisonError, RwLock},
};

use crate::{
  DEFAULT_MARKDOWN_SUFFIX,
  Entry,
  ResolvedSource,
  SourceStorage,
  StorageError,
  TemplateStorage,
  path::{normalize, source_candidates},
};

/// Storage holding files in memory, keyed by slash-separated path.
///
/// Content can be changed through a shared reference with
/// [`MemoryStorage::insert`] and [`MemoryStorage::remove`]; readers always
/// see the latest content.
///
/// # Example
///
/// ```
/// use folio_storage::{MemoryStorage, SourceStorage};
///
/// let storage = MemoryStorage::new().with_file("guide.md", "# Guide");
/// let source = storage.resolve("guide").expect("guide exists");
/// assert_eq!(source.path, "guide.md");
/// ```
#[derive(Debug)]
pub struct MemoryStorage {
  files:           RwLock<BTreeMap<String, Vec<u8>>>,
  markdown_suffix: String,
}

impl Default for MemoryStorage {
  fn default() -> Self {
    Self {
      files:           RwLock::new(BTreeMap::new()),
      markdown_suffix: DEFAULT_MARKDOWN_SUFFIX.to_string(),
    }
  }
}

impl MemoryStorage {
  /// Create an empty storage.
  #[must_use]
  pub fn new() -> Self {
    Self::default()
  }

  /// Create a storage from `(path, content)` pairs.
  pub fn from_files<I, P, C>(files: I) -> Self
  where
    I: IntoIterator<Item = (P, C)>,
    P: AsRef<str>,
    C: Into<Vec<u8>>,
  {
    let storage = Self::new();
    for (path, content) in files {
      storage.insert(path.as_ref(), content);
    }
    storage
  }

  /// Use a different suffix when resolving Markdown sources.
  #[must_use]
  pub fn with_markdown_suffix(mut self, suffix: impl Into<String>) -> Self {
    self.markdown_suffix = suffix.into();
    self
  }

  /// Add a file, builder style.
  #[must_use]
  pub fn with_file(self, path: &str, content: impl Into<Vec<u8>>) -> Self {
    self.insert(path, content);
    self
  }

  /// Add or replace a file. Leading and trailing slashes are ignored.
  pub fn insert(&self, path: &str, content: impl Into<Vec<u8>>) {
    let key = path.trim_matches('/').to_string();
    self
      .files
      .write()
      .unwrap_or_else(PoisonError::into_inner)
      .insert(key, content.into());
  }

  /// Remove a file, returning its previous content.
  pub fn remove(&self, path: &str) -> Option<Vec<u8>> {
    self
      .files
      .write()
      .unwrap_or_else(PoisonError::into_inner)
      .remove(path.trim_matches('/'))
  }

  fn get(&self, key: &str) -> Option<Vec<u8>> {
    self
      .files
      .read()
      .unwrap_or_else(PoisonError::into_inner)
      .get(key)
      .cloned()
  }
}

impl SourceStorage for MemoryStorage {
  fn resolve(&self, path: &str) -> Result<ResolvedSource, StorageError> {
    for candidate in source_candidates(path, &self.markdown_suffix)? {
      if let Some(content) = self.get(&candidate) {
        return Ok(ResolvedSource {
          path: candidate,
          content,
        });
      }
    }
    Err(StorageError::not_found(path))
  }
}

impl TemplateStorage for MemoryStorage {
  fn list(&self) -> Result<Vec<Entry>, StorageError> {
    let files = self.files.read().unwrap_or_else(PoisonError::into_inner);

    // Top-level name -> is_dir; nested keys surface as their first segment
    let mut top_level: BTreeMap<&str, bool> = BTreeMap::new();
    for key in files.keys() {
      match key.split_once('/') {
        Some((dir, _)) => {
          top_level.insert(dir, true);
        },
        None => {
          top_level.entry(key.as_str()).or_insert(false);
        },
      }
    }

    Ok(
      top_level
        .into_iter()
        .map(|(name, is_dir)| {
          Entry {
            name: name.to_string(),
            is_dir,
          }
        })
        .collect(),
    )
  }

  fn read(&self, name: &str) -> Result<Vec<u8>, StorageError> {
    let normalized = normalize(name)?;
    self
      .get(&normalized)
      .ok_or_else(|| StorageError::not_found(normalized))
  }
}
