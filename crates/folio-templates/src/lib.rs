use std::collections::HashMap;

pub const ROOT_TEMPLATE: &str = include_str!("../templates/root.html");
pub const BREADCRUMBS_TEMPLATE: &str =
  include_str!("../templates/breadcrumbs.html");

/// Every embedded template, keyed by file name.
#[must_use]
pub fn all_templates() -> HashMap<&'static str, &'static str> {
  let mut templates = HashMap::new();
  templates.insert("root.html", ROOT_TEMPLATE);
  templates.insert("breadcrumbs.html", BREADCRUMBS_TEMPLATE);
  templates
}
