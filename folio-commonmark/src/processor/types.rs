//! Type definitions for the Markdown processor.
//!
//! Contains the configuration options (`MarkdownOptions`), their builder and
//! the main processor struct (`MarkdownProcessor`).
//!
//! # Examples
//!
//! ```
//! use folio_commonmark::{MarkdownOptions, MarkdownProcessor};
//!
//! let options = MarkdownOptions {
//!   base_url: Some("/docs/".to_string()),
//!   strip_url_suffix: Some(".md".to_string()),
//!   ..Default::default()
//! };
//!
//! let processor = MarkdownProcessor::new(options);
//! ```

use super::links::LinkRewriter;

/// Options for configuring the Markdown processor.
#[derive(Debug, Clone)]
pub struct MarkdownOptions {
  /// Enable GitHub Flavored Markdown (GFM) extensions.
  pub gfm: bool,

  /// Base URL that relative link and image targets are resolved against.
  /// When `None`, targets are emitted as written.
  pub base_url: Option<String>,

  /// Suffix removed from the path of resolved link targets, so that a link
  /// to `guide.md` becomes a link to `guide`.
  pub strip_url_suffix: Option<String>,
}

impl Default for MarkdownOptions {
  fn default() -> Self {
    Self {
      gfm:              cfg!(feature = "gfm"),
      base_url:         None,
      strip_url_suffix: None,
    }
  }
}

/// Main Markdown processor.
///
/// Holds no per-document state, so one processor can render any number of
/// documents, from any number of threads.
#[derive(Debug, Clone)]
pub struct MarkdownProcessor {
  pub(crate) options: MarkdownOptions,
  pub(crate) links:   Option<LinkRewriter>,
}

/// Builder for constructing `MarkdownOptions` with method chaining.
#[derive(Debug, Clone)]
pub struct MarkdownOptionsBuilder {
  options: MarkdownOptions,
}

impl MarkdownOptionsBuilder {
  /// Create a new builder with default options.
  #[must_use]
  pub fn new() -> Self {
    Self {
      options: MarkdownOptions::default(),
    }
  }

  /// Enable or disable GitHub Flavored Markdown.
  #[must_use]
  pub const fn gfm(mut self, enabled: bool) -> Self {
    self.options.gfm = enabled;
    self
  }

  /// Set the base URL for relative link resolution.
  #[must_use]
  pub fn base_url<S: Into<String>>(mut self, base: Option<S>) -> Self {
    self.options.base_url = base.map(Into::into);
    self
  }

  /// Set the suffix stripped from resolved link targets.
  #[must_use]
  pub fn strip_url_suffix<S: Into<String>>(mut self, suffix: Option<S>) -> Self {
    self.options.strip_url_suffix = suffix.map(Into::into);
    self
  }

  /// Build the final `MarkdownOptions`.
  #[must_use]
  pub fn build(self) -> MarkdownOptions {
    self.options
  }
}

impl Default for MarkdownOptionsBuilder {
  fn default() -> Self {
    Self::new()
  }
}
