//! Types for folio-commonmark public API and internal use.
use serde::{Deserialize, Serialize};

use crate::sections::build_section_tree;

/// Represents a header in a Markdown document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Header {
  /// Header text (inline content, no markdown formatting).
  pub text:  String,
  /// Header level (1-6).
  pub level: u8,
  /// Anchor ID assigned to the header, unique within its document.
  pub id:    String,
}

/// A heading and its nested subsections.
///
/// Children always sit at a strictly greater heading level than their parent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SectionNode {
  /// Section title as plain text.
  pub title:    String,
  /// Section URL, an in-page anchor link such as `#installation`.
  pub url:      String,
  /// Heading level (1-6).
  pub level:    u8,
  /// Subsections in document order.
  pub children: Vec<Self>,
}

/// Result of Markdown processing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MarkdownResult {
  /// Rendered HTML output.
  pub html: String,

  /// Extracted headers in document order (for `ToC`, navigation, etc).
  pub headers: Vec<Header>,

  /// Title of the document, if found (first H1).
  pub title: Option<String>,
}

impl MarkdownResult {
  /// Build the section tree from the extracted headers.
  #[must_use]
  pub fn sections(&self) -> Vec<SectionNode> {
    build_section_tree(&self.headers)
  }
}
