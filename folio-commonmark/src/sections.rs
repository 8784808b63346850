//! Section tree construction and table of contents rendering.
//!
//! Headings are fed to [`SectionTreeBuilder`] in document order. The builder
//! keeps a stack whose bottom is a synthetic level-0 root; every new heading
//! first pops all open sections at the same or a deeper level, then opens a
//! new section under whatever remains on top. Skipped levels need no special
//! handling: an H4 directly after an H1 simply becomes a child of the H1.
use std::fmt::Write;

use html_escape::encode_text;

use crate::types::{Header, SectionNode};

/// Incremental builder for a document's section tree.
#[derive(Debug)]
pub struct SectionTreeBuilder {
  stack: Vec<SectionNode>,
}

impl SectionTreeBuilder {
  /// Create a builder holding only the synthetic root.
  #[must_use]
  pub fn new() -> Self {
    Self {
      stack: vec![SectionNode {
        title:    String::new(),
        url:      String::new(),
        level:    0,
        children: Vec::new(),
      }],
    }
  }

  /// Record a heading entered at `level` with the given plain-text title and
  /// anchor ID.
  pub fn enter_heading(&mut self, level: u8, title: &str, anchor: &str) {
    while self.stack.len() > 1
      && self.stack.last().is_some_and(|top| top.level >= level)
    {
      self.close_top();
    }

    self.stack.push(SectionNode {
      title: title.to_string(),
      url: format!("#{anchor}"),
      level,
      children: Vec::new(),
    });
  }

  /// Close every open section and return the children of the synthetic root.
  #[must_use]
  pub fn finish(mut self) -> Vec<SectionNode> {
    while self.stack.len() > 1 {
      self.close_top();
    }
    self
      .stack
      .pop()
      .map(|root| root.children)
      .unwrap_or_default()
  }

  /// Pop the innermost open section and append it to its parent.
  fn close_top(&mut self) {
    if let Some(node) = self.stack.pop() {
      if let Some(parent) = self.stack.last_mut() {
        parent.children.push(node);
      }
    }
  }
}

impl Default for SectionTreeBuilder {
  fn default() -> Self {
    Self::new()
  }
}

/// Build the section forest for a heading stream.
#[must_use]
pub fn build_section_tree(headers: &[Header]) -> Vec<SectionNode> {
  let mut builder = SectionTreeBuilder::new();
  for header in headers {
    builder.enter_heading(header.level, &header.text, &header.id);
  }
  builder.finish()
}

/// Render a section forest as nested `<ul>` lists of anchor links.
///
/// Sections deeper than `max_level` are omitted together with their
/// subsections. Returns an empty string when nothing qualifies.
#[must_use]
pub fn render_toc(sections: &[SectionNode], max_level: u8) -> String {
  let mut toc = String::new();
  write_toc_list(&mut toc, sections, max_level);
  toc
}

fn write_toc_list(out: &mut String, sections: &[SectionNode], max_level: u8) {
  let visible: Vec<&SectionNode> = sections
    .iter()
    .filter(|section| section.level <= max_level)
    .collect();
  if visible.is_empty() {
    return;
  }

  out.push_str("<ul>");
  for section in visible {
    // Writing to String is infallible
    let _ = write!(
      out,
      "<li><a href=\"{}\">{}</a>",
      section.url,
      encode_text(&section.title)
    );
    write_toc_list(out, &section.children, max_level);
    out.push_str("</li>");
  }
  out.push_str("</ul>");
}

#[cfg(test)]
mod tests {
  use super::*;

  fn header(level: u8, text: &str) -> Header {
    Header {
      text: text.to_string(),
      level,
      id: text.to_lowercase(),
    }
  }

  #[test]
  fn test_empty_stream_yields_empty_forest() {
    assert!(build_section_tree(&[]).is_empty());
  }

  #[test]
  fn test_repeated_levels_become_siblings() {
    let tree =
      build_section_tree(&[header(2, "A"), header(2, "B"), header(2, "C")]);
    let titles: Vec<_> = tree.iter().map(|n| n.title.as_str()).collect();
    assert_eq!(titles, ["A", "B", "C"]);
    assert!(tree.iter().all(|n| n.children.is_empty()));
  }

  #[test]
  fn test_urls_are_anchor_links() {
    let tree = build_section_tree(&[header(1, "Intro")]);
    assert_eq!(tree[0].url, "#intro");
  }

  #[test]
  fn test_toc_respects_max_level() {
    let tree = build_section_tree(&[
      header(1, "Top"),
      header(2, "Mid"),
      header(4, "Deep"),
    ]);
    let toc = render_toc(&tree, 2);
    assert_eq!(
      toc,
      "<ul><li><a href=\"#top\">Top</a><ul><li><a \
       href=\"#mid\">Mid</a></li></ul></li></ul>"
    );
  }

  #[test]
  fn test_toc_escapes_titles() {
    let tree = build_section_tree(&[header(1, "a < b")]);
    assert!(render_toc(&tree, 6).contains("a &lt; b"));
  }
}
