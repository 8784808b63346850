use std::collections::HashSet;

use comrak::nodes::{AstNode, NodeValue};

/// Anchor used when a heading has no alphanumeric characters at all.
pub const FALLBACK_SLUG: &str = "section";

/// Slugify a string for use as an anchor ID.
///
/// Converts to lowercase and collapses every run of non-alphanumeric
/// characters into a single dash. Leading and trailing dashes are trimmed.
#[must_use]
pub fn slugify(text: &str) -> String {
  let mut slug = String::with_capacity(text.len());
  let mut pending_dash = false;

  for c in text.chars().flat_map(char::to_lowercase) {
    if c.is_alphanumeric() {
      if pending_dash && !slug.is_empty() {
        slug.push('-');
      }
      pending_dash = false;
      slug.push(c);
    } else {
      pending_dash = true;
    }
  }

  slug
}

/// Hands out anchor IDs that are unique within one document.
///
/// The first heading with a given slug keeps it verbatim; later ones receive
/// `-1`, `-2`, ... in order of occurrence. Candidates that are already taken
/// (for example by a heading literally titled `Setup 1`) are skipped.
#[derive(Debug, Default)]
pub struct SlugRegistry {
  used: HashSet<String>,
}

impl SlugRegistry {
  #[must_use]
  pub fn new() -> Self {
    Self::default()
  }

  /// Return a unique anchor ID for the given heading text.
  pub fn unique(&mut self, text: &str) -> String {
    let mut base = slugify(text);
    if base.is_empty() {
      base = FALLBACK_SLUG.to_string();
    }

    if self.used.insert(base.clone()) {
      return base;
    }

    let mut n = 1usize;
    loop {
      let candidate = format!("{base}-{n}");
      if self.used.insert(candidate.clone()) {
        return candidate;
      }
      n += 1;
    }
  }
}

/// Extract the plain text of an inline container, ignoring all markup.
///
/// Emphasis, links, code spans and the like contribute only their text.
/// Images contribute nothing and line breaks become single spaces.
pub fn extract_inline_text<'a>(node: &'a AstNode<'a>) -> String {
  let mut text = String::new();
  collect_inline_text(node, &mut text);
  text.trim().to_string()
}

fn collect_inline_text<'a>(node: &'a AstNode<'a>, text: &mut String) {
  for child in node.children() {
    match &child.data.borrow().value {
      NodeValue::Text(t) => text.push_str(t),
      NodeValue::Code(t) => text.push_str(&t.literal),
      NodeValue::SoftBreak | NodeValue::LineBreak => text.push(' '),
      NodeValue::HtmlInline(_) | NodeValue::Image(..) => {},
      _ => collect_inline_text(child, text),
    }
  }
}

/// Create a regex that never matches anything.
///
/// This is used as a fallback pattern when a regex fails to compile.
#[must_use]
#[allow(
  clippy::expect_used,
  reason = "This pattern is guaranteed to be valid"
)]
pub fn never_matching_regex() -> regex::Regex {
  regex::Regex::new(r"[^\s\S]")
    .expect("regex pattern [^\\s\\S] should always compile")
}
