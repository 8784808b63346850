//! Breadcrumb trails derived from requested page paths.
use serde::{Deserialize, Serialize};

/// Label of the entry produced for the site root.
pub const HOME_LABEL: &str = "Home";

/// One step of a breadcrumb trail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreadcrumbEntry {
  /// Human-readable label.
  pub label:     String,
  /// Slash-joined path prefix, without a leading slash. Empty for the root.
  pub url:       String,
  /// Whether this entry is the requested page itself.
  pub is_active: bool,
}

/// Build the breadcrumb trail for a requested path.
///
/// Every prefix of the path's segments, shortest first, yields one entry
/// whose URL is that prefix. The empty path yields a single home entry.
///
/// ```
/// use folio_html::breadcrumbs::build_breadcrumbs;
///
/// let trail = build_breadcrumbs("docs/getting-started/install", ".md");
/// let urls: Vec<_> = trail.iter().map(|c| c.url.as_str()).collect();
/// assert_eq!(urls, [
///   "docs",
///   "docs/getting-started",
///   "docs/getting-started/install"
/// ]);
/// assert_eq!(trail[1].label, "Getting Started");
/// ```
#[must_use]
pub fn build_breadcrumbs(
  path: &str,
  markdown_suffix: &str,
) -> Vec<BreadcrumbEntry> {
  let segments: Vec<&str> =
    path.split('/').filter(|segment| !segment.is_empty()).collect();

  if segments.is_empty() {
    return vec![BreadcrumbEntry {
      label:     HOME_LABEL.to_string(),
      url:       String::new(),
      is_active: true,
    }];
  }

  let last = segments.len() - 1;
  segments
    .iter()
    .enumerate()
    .map(|(i, segment)| {
      BreadcrumbEntry {
        label:     humanize(segment, markdown_suffix),
        url:       segments[..=i].join("/"),
        is_active: i == last,
      }
    })
    .collect()
}

/// Turn a path segment into a label: the Markdown suffix is dropped, dashes
/// and underscores become spaces and every word is capitalized.
#[must_use]
pub fn humanize(segment: &str, markdown_suffix: &str) -> String {
  let stem = if markdown_suffix.is_empty() {
    segment
  } else {
    segment.strip_suffix(markdown_suffix).unwrap_or(segment)
  };

  let label = stem
    .split(['-', '_', ' '])
    .filter(|word| !word.is_empty())
    .map(capitalize)
    .collect::<Vec<_>>()
    .join(" ");

  if label.is_empty() {
    segment.to_string()
  } else {
    label
  }
}

fn capitalize(word: &str) -> String {
  let mut chars = word.chars();
  chars.next().map_or_else(String::new, |first| {
    first.to_uppercase().chain(chars).collect()
  })
}
