//! # folio-commonmark
//!
//! CommonMark renderer used by folio to turn Markdown sources into HTML
//! fragments ready to be embedded in a page template.
//!
//! ## Quick Start
//!
//! ```rust
//! use folio_commonmark::{MarkdownOptions, MarkdownProcessor};
//!
//! let processor = MarkdownProcessor::new(MarkdownOptions {
//!   base_url: Some("/docs/".to_string()),
//!   strip_url_suffix: Some(".md".to_string()),
//!   ..Default::default()
//! });
//! let result = processor.render("# Hello\n\nSee the [guide](guide.md).");
//!
//! assert!(result.html.contains(r#"<h1 id="hello">Hello</h1>"#));
//! assert!(result.html.contains(r#"href="/docs/guide""#));
//! assert_eq!(result.title.as_deref(), Some("Hello"));
//! ```
//!
//! ## Features
//!
//! - **Stable heading anchors**: slugs derived from the plain heading text,
//!   disambiguated with `-1`, `-2`, ... within a document
//! - **Link rewriting**: relative link and image targets resolved against a
//!   base URL, with an optional suffix (such as `.md`) stripped
//! - **Section trees** built from the heading stream, plus nested `ToC` HTML
//! - **Permissive**: rendering never fails on content shape

pub mod processor;
pub mod sections;
mod types;
pub mod utils;

pub use crate::{
  processor::{MarkdownOptions, MarkdownOptionsBuilder, MarkdownProcessor},
  sections::{SectionTreeBuilder, build_section_tree, render_toc},
  types::{Header, MarkdownResult, SectionNode},
};
