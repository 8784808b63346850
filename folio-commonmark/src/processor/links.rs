//! Relative link resolution for rendered documents.
use log::{trace, warn};
use url::Url;

/// Placeholder origin used to resolve path-only base URLs.
const PLACEHOLDER_ORIGIN: &str = "http://folio.invalid";

/// Rewrites relative link and image targets against a base URL.
#[derive(Debug, Clone)]
pub struct LinkRewriter {
  base:         Url,
  /// Whether the configured base had no origin of its own.
  path_only:    bool,
  strip_suffix: Option<String>,
}

impl LinkRewriter {
  /// Create a rewriter for `base`, which may be a path such as `/docs/` or
  /// an absolute URL.
  ///
  /// Returns `None` (and logs a warning) if the base cannot be parsed; the
  /// renderer then leaves links untouched.
  #[must_use]
  pub fn new(base: &str, strip_suffix: Option<&str>) -> Option<Self> {
    let (parsed, path_only) = match Url::parse(base) {
      Ok(url) if !url.cannot_be_a_base() => (Ok(url), false),
      _ => {
        (
          Url::parse(PLACEHOLDER_ORIGIN).and_then(|origin| origin.join(base)),
          true,
        )
      },
    };

    match parsed {
      Ok(base) => {
        Some(Self {
          base,
          path_only,
          strip_suffix: strip_suffix
            .filter(|suffix| !suffix.is_empty())
            .map(str::to_string),
        })
      },
      Err(e) => {
        warn!("Ignoring unparsable base URL {base:?}: {e}");
        None
      },
    }
  }

  /// Rewrite a link target, returning `None` when it should stay as written.
  #[must_use]
  pub fn rewrite(&self, target: &str) -> Option<String> {
    if !is_relative(target) {
      return None;
    }

    let mut resolved = self.base.join(target).ok()?;

    if let Some(suffix) = self.strip_suffix.as_deref() {
      if let Some(stripped) = resolved.path().strip_suffix(suffix) {
        let stripped = stripped.to_string();
        resolved.set_path(&stripped);
      }
    }

    let rewritten = if self.path_only && resolved.origin() == self.base.origin()
    {
      path_with_query_and_fragment(&resolved)
    } else {
      resolved.to_string()
    };

    trace!("Rewrote link {target:?} -> {rewritten:?}");
    Some(rewritten)
  }
}

/// Whether a link target is relative to the current document.
///
/// Targets with a scheme, absolute or protocol-relative paths, and pure
/// fragments are not.
#[must_use]
pub fn is_relative(target: &str) -> bool {
  if target.is_empty() || target.starts_with('/') || target.starts_with('#')
  {
    return false;
  }
  Url::parse(target).is_err()
}

fn path_with_query_and_fragment(url: &Url) -> String {
  let mut out = url.path().to_string();
  if let Some(query) = url.query() {
    out.push('?');
    out.push_str(query);
  }
  if let Some(fragment) = url.fragment() {
    out.push('#');
    out.push_str(fragment);
  }
  out
}

#[cfg(test)]
mod tests {
  #![allow(clippy::expect_used, reason = "Fine in tests")]

  use super::*;

  fn rewriter(base: &str) -> LinkRewriter {
    LinkRewriter::new(base, Some(".md")).expect("base should parse")
  }

  #[test]
  fn test_relative_detection() {
    assert!(is_relative("guide.md"));
    assert!(is_relative("../up.md"));
    assert!(is_relative("img/logo.png"));
    assert!(!is_relative("/abs/path"));
    assert!(!is_relative("//cdn.example.com/x.js"));
    assert!(!is_relative("#anchor"));
    assert!(!is_relative("https://example.com/guide.md"));
    assert!(!is_relative("mailto:someone@example.com"));
    assert!(!is_relative(""));
  }

  #[test]
  fn test_sibling_link_strips_suffix() {
    assert_eq!(
      rewriter("/docs/").rewrite("guide.md").as_deref(),
      Some("/docs/guide")
    );
  }

  #[test]
  fn test_parent_link_resolves() {
    assert_eq!(
      rewriter("/docs/deep/").rewrite("../other.md").as_deref(),
      Some("/docs/other")
    );
  }

  #[test]
  fn test_fragment_and_query_are_kept() {
    assert_eq!(
      rewriter("/docs/").rewrite("guide.md#setup").as_deref(),
      Some("/docs/guide#setup")
    );
    assert_eq!(
      rewriter("/").rewrite("search.md?q=x").as_deref(),
      Some("/search?q=x")
    );
  }

  #[test]
  fn test_non_markdown_targets_keep_extension() {
    assert_eq!(
      rewriter("/docs/").rewrite("img/logo.png").as_deref(),
      Some("/docs/img/logo.png")
    );
  }

  #[test]
  fn test_absolute_base_keeps_origin() {
    assert_eq!(
      rewriter("https://example.com/docs/")
        .rewrite("guide.md")
        .as_deref(),
      Some("https://example.com/docs/guide")
    );
  }

  #[test]
  fn test_absolute_targets_are_untouched() {
    let rw = rewriter("/docs/");
    assert_eq!(rw.rewrite("https://example.com/a.md"), None);
    assert_eq!(rw.rewrite("/root.md"), None);
    assert_eq!(rw.rewrite("#here"), None);
  }
}
