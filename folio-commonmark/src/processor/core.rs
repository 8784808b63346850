//! Core implementation of the Markdown processor.
//!
//! Rendering is a single pass over the comrak AST: headings are collected
//! and assigned unique anchors, relative link and image targets are
//! rewritten in place, and the tree is then formatted to HTML. Anchors are
//! attached afterwards by matching heading tags in document order; comrak's
//! source positions mark which `<hN>` tags came from Markdown headings, so
//! raw HTML headings in the input are never mistaken for them.
use std::sync::LazyLock;

use comrak::{
  Arena,
  nodes::{AstNode, NodeValue},
  options::Options,
  parse_document,
};
use log::trace;
use regex::Regex;

use super::{
  links::LinkRewriter,
  types::{MarkdownOptions, MarkdownProcessor},
};
use crate::{
  types::{Header, MarkdownResult},
  utils::{self, SlugRegistry, extract_inline_text},
};

static HEADING_OPEN_RE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r#"<h([1-6]) data-sourcepos="[^"]*">"#).unwrap_or_else(|e| {
    log::error!("Failed to compile HEADING_OPEN_RE regex: {e}");
    utils::never_matching_regex()
  })
});

static SOURCEPOS_ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r#" data-sourcepos="[^"]*""#).unwrap_or_else(|e| {
    log::error!("Failed to compile SOURCEPOS_ATTR_RE regex: {e}");
    utils::never_matching_regex()
  })
});

impl MarkdownProcessor {
  /// Create a new `MarkdownProcessor` with the given options.
  #[must_use]
  pub fn new(options: MarkdownOptions) -> Self {
    let links = options.base_url.as_deref().and_then(|base| {
      LinkRewriter::new(base, options.strip_url_suffix.as_deref())
    });

    Self { options, links }
  }

  /// Access processor options.
  #[must_use]
  pub const fn options(&self) -> &MarkdownOptions {
    &self.options
  }

  /// Render Markdown to HTML, extracting headers and title.
  ///
  /// Never fails: malformed Markdown is rendered as well as CommonMark
  /// allows.
  #[must_use]
  pub fn render(&self, markdown: &str) -> MarkdownResult {
    let arena = Arena::new();
    let options = self.comrak_options();
    let root = parse_document(&arena, markdown, &options);

    let headers = self.annotate(root);

    let mut html_output = String::new();
    comrak::format_html(root, &options, &mut html_output).unwrap_or_default();
    let html = attach_heading_anchors(&html_output, &headers);

    let title = headers
      .iter()
      .find(|header| header.level == 1)
      .map(|header| header.text.clone());

    MarkdownResult {
      html,
      headers,
      title,
    }
  }

  /// Render raw Markdown bytes. Invalid UTF-8 sequences are replaced rather
  /// than rejected.
  #[must_use]
  pub fn render_bytes(&self, content: &[u8]) -> MarkdownResult {
    self.render(&String::from_utf8_lossy(content))
  }

  /// Walk the AST once, rewriting link targets and collecting headers with
  /// their anchors in document order.
  fn annotate<'a>(&self, root: &'a AstNode<'a>) -> Vec<Header> {
    let mut slugs = SlugRegistry::new();
    let mut headers = Vec::new();

    for node in root.descendants() {
      let heading_level = match &mut node.data.borrow_mut().value {
        NodeValue::Heading(heading) => Some(heading.level),
        NodeValue::Link(link) | NodeValue::Image(link) => {
          if let Some(rewritten) =
            self.links.as_ref().and_then(|links| links.rewrite(&link.url))
          {
            link.url = rewritten;
          }
          None
        },
        _ => None,
      };

      if let Some(level) = heading_level {
        let text = extract_inline_text(node);
        let id = slugs.unique(&text);
        trace!("Heading h{level} {text:?} -> #{id}");
        headers.push(Header { text, level, id });
      }
    }

    headers
  }

  /// Build comrak options from `MarkdownOptions`.
  fn comrak_options(&self) -> Options<'_> {
    let mut options = Options::default();
    if self.options.gfm {
      options.extension.table = true;
      options.extension.footnotes = true;
      options.extension.strikethrough = true;
      options.extension.tasklist = true;
      options.extension.autolink = true;
    }
    options.render.r#unsafe = true;
    // Anchors are assigned by us, source positions tell us where to put them
    options.extension.header_id_prefix = None;
    options.render.sourcepos = true;
    options
  }
}

/// Put each header's anchor ID on its opening tag and drop the source
/// position attributes comrak emitted.
fn attach_heading_anchors(html: &str, headers: &[Header]) -> String {
  let mut ids = headers.iter().map(|header| header.id.as_str());

  let anchored = HEADING_OPEN_RE.replace_all(html, |caps: &regex::Captures| {
    let level = &caps[1];
    ids.next().map_or_else(
      || format!("<h{level}>"),
      |id| format!("<h{level} id=\"{id}\">"),
    )
  });

  SOURCEPOS_ATTR_RE.replace_all(&anchored, "").into_owned()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_attach_heading_anchors_in_order() {
    let html = "<h1 data-sourcepos=\"1:1-1:5\">One</h1>\n<p \
                data-sourcepos=\"3:1-3:4\">x</p>\n<h2 \
                data-sourcepos=\"5:1-5:6\">Two</h2>\n";
    let headers = vec![
      Header {
        text:  "One".into(),
        level: 1,
        id:    "one".into(),
      },
      Header {
        text:  "Two".into(),
        level: 2,
        id:    "two".into(),
      },
    ];
    assert_eq!(
      attach_heading_anchors(html, &headers),
      "<h1 id=\"one\">One</h1>\n<p>x</p>\n<h2 id=\"two\">Two</h2>\n"
    );
  }

  #[test]
  fn test_raw_html_headings_are_left_alone() {
    let processor = MarkdownProcessor::new(MarkdownOptions::default());
    let result = processor.render("<h2>Raw</h2>\n\n## Real\n");
    assert!(result.html.contains("<h2>Raw</h2>"));
    assert!(result.html.contains("<h2 id=\"real\">Real</h2>"));
  }

  #[test]
  fn test_no_sourcepos_leaks_into_output() {
    let processor = MarkdownProcessor::new(MarkdownOptions::default());
    let result = processor.render("# A\n\n- item\n\n```\ncode\n```\n");
    assert!(!result.html.contains("data-sourcepos"));
  }

  #[test]
  fn test_comrak_adds_no_heading_anchors_of_its_own() {
    let processor = MarkdownProcessor::new(MarkdownOptions::default());
    assert!(processor.comrak_options().extension.header_id_prefix.is_none());

    let result = processor.render("# Title
");
    assert_eq!(result.html, "<h1 id=\"title\">Title</h1>\n");
    assert!(!result.html.contains("class=\"anchor\""));
  }
}
