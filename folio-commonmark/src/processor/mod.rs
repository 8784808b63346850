//! Markdown processing module.
//!
//! - [`core`]: the rendering pipeline (anchors, link rewriting, HTML output)
//! - [`links`]: relative link resolution against a base URL
//! - [`types`]: configuration and the processor struct
pub mod core;
pub mod links;
pub mod types;

pub use links::{LinkRewriter, is_relative};
pub use types::{MarkdownOptions, MarkdownOptionsBuilder, MarkdownProcessor};
