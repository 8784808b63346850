//! Request path normalization and source resolution candidates.
use crate::StorageError;

/// Normalize a requested path into slash-separated segments.
///
/// Leading, trailing and repeated slashes are dropped. `.` and `..` segments
/// (and backslashes) are rejected rather than interpreted, so a request can
/// never address anything outside the storage root.
///
/// # Errors
///
/// Returns [`StorageError::InvalidPath`] for rejected segments.
pub fn normalize(path: &str) -> Result<String, StorageError> {
  let mut segments = Vec::new();
  for segment in path.split('/') {
    match segment {
      "" => {},
      "." | ".." => return Err(StorageError::InvalidPath { path: path.into() }),
      s if s.contains('\\') => {
        return Err(StorageError::InvalidPath { path: path.into() });
      },
      s => segments.push(s),
    }
  }
  Ok(segments.join("/"))
}

/// Candidate source files for a requested path, in resolution order.
///
/// # Errors
///
/// Returns [`StorageError::InvalidPath`] if the path cannot be normalized.
pub fn source_candidates(
  path: &str,
  suffix: &str,
) -> Result<Vec<String>, StorageError> {
  let normalized = normalize(path)?;
  if normalized.is_empty() {
    return Ok(vec![format!("index{suffix}")]);
  }

  let mut candidates = Vec::with_capacity(3);
  if !suffix.is_empty() && normalized.ends_with(suffix) {
    candidates.push(normalized.clone());
  }
  candidates.push(format!("{normalized}{suffix}"));
  candidates.push(format!("{normalized}/index{suffix}"));
  Ok(candidates)
}

#[cfg(test)]
mod tests {
  #![allow(clippy::expect_used, reason = "Fine in tests")]

  use super::*;

  #[test]
  fn test_normalize_trims_slashes() {
    assert_eq!(normalize("/docs//intro/").ok().as_deref(), Some("docs/intro"));
    assert_eq!(normalize("").ok().as_deref(), Some(""));
    assert_eq!(normalize("///").ok().as_deref(), Some(""));
  }

  #[test]
  fn test_normalize_rejects_traversal() {
    assert!(matches!(
      normalize("docs/../secret"),
      Err(StorageError::InvalidPath { .. })
    ));
    assert!(normalize("./x").is_err());
    assert!(normalize("a\\b").is_err());
  }

  #[test]
  fn test_root_candidates() {
    assert_eq!(
      source_candidates("/", ".md").ok(),
      Some(vec!["index.md".to_string()])
    );
  }

  #[test]
  fn test_page_candidates() {
    assert_eq!(
      source_candidates("docs/intro", ".md").ok(),
      Some(vec![
        "docs/intro.md".to_string(),
        "docs/intro/index.md".to_string()
      ])
    );
  }

  #[test]
  fn test_explicit_suffix_tried_first() {
    let candidates =
      source_candidates("guide.md", ".md").expect("valid path");
    assert_eq!(candidates[0], "guide.md");
    assert_eq!(candidates.len(), 3);
  }
}
