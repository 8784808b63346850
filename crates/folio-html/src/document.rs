use serde::{Deserialize, Serialize};

use crate::breadcrumbs::BreadcrumbEntry;

/// One resolved Markdown source, as handed to templates.
///
/// Created per page request and discarded once the page is rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceDocument {
  /// Slash-separated path of the source file relative to the source root,
  /// e.g. `docs/intro.md`.
  pub file_path:   String,
  /// Markdown content. Invalid UTF-8 in the source file is replaced.
  pub content:     String,
  /// Trail from the site root to this document.
  pub breadcrumbs: Vec<BreadcrumbEntry>,
}

impl SourceDocument {
  /// Base URL that relative links inside this document resolve against:
  /// the document's own directory, rooted at `/`.
  ///
  /// ```
  /// use folio_html::SourceDocument;
  ///
  /// let doc = SourceDocument {
  ///   file_path:   "docs/intro.md".into(),
  ///   content:     String::new(),
  ///   breadcrumbs: Vec::new(),
  /// };
  /// assert_eq!(doc.base_url(), "/docs/");
  /// ```
  #[must_use]
  pub fn base_url(&self) -> String {
    match self.file_path.trim_start_matches('/').rsplit_once('/') {
      Some((dir, _)) => format!("/{dir}/"),
      None => "/".to_string(),
    }
  }
}
