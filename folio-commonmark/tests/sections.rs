use folio_commonmark::{
  Header,
  MarkdownOptions,
  MarkdownProcessor,
  SectionNode,
  SectionTreeBuilder,
  build_section_tree,
  render_toc,
};

fn header(level: u8, text: &str) -> Header {
  Header {
    text: text.to_string(),
    level,
    id: text.to_lowercase().replace(' ', "-"),
  }
}

/// Every child sits strictly deeper than its parent, at any depth.
fn assert_well_formed(nodes: &[SectionNode], parent_level: u8) {
  for node in nodes {
    assert!(
      node.level > parent_level,
      "{} (h{}) nested under h{parent_level}",
      node.title,
      node.level
    );
    assert_well_formed(&node.children, node.level);
  }
}

fn flatten<'a>(nodes: &'a [SectionNode], out: &mut Vec<&'a str>) {
  for node in nodes {
    out.push(&node.title);
    flatten(&node.children, out);
  }
}

#[test]
fn test_nested_levels() {
  let tree = build_section_tree(&[
    header(1, "Guide"),
    header(2, "Install"),
    header(3, "Linux"),
    header(3, "macOS"),
    header(2, "Usage"),
  ]);

  assert_eq!(tree.len(), 1);
  let guide = &tree[0];
  assert_eq!(guide.title, "Guide");
  assert_eq!(guide.children.len(), 2);
  assert_eq!(guide.children[0].title, "Install");
  assert_eq!(guide.children[0].children.len(), 2);
  assert_eq!(guide.children[0].children[1].title, "macOS");
  assert_eq!(guide.children[1].title, "Usage");
  assert!(guide.children[1].children.is_empty());
}

#[test]
fn test_skipped_levels_nest_directly() {
  let tree = build_section_tree(&[header(1, "Top"), header(4, "Deep")]);
  assert_eq!(tree.len(), 1);
  assert_eq!(tree[0].children.len(), 1);
  assert_eq!(tree[0].children[0].title, "Deep");
  assert_eq!(tree[0].children[0].level, 4);
}

#[test]
fn test_shallower_heading_closes_deeper_sections() {
  let tree = build_section_tree(&[
    header(3, "Three"),
    header(2, "Two"),
    header(1, "One"),
    header(2, "Child"),
  ]);
  let titles: Vec<_> = tree.iter().map(|n| n.title.as_str()).collect();
  assert_eq!(titles, ["Three", "Two", "One"]);
  assert_eq!(tree[2].children[0].title, "Child");
}

#[test]
fn test_forest_is_well_formed_and_ordered() {
  let levels = [2u8, 5, 3, 3, 1, 6, 2, 2, 4, 1, 3, 6, 6, 2];
  let headers: Vec<Header> = levels
    .iter()
    .enumerate()
    .map(|(i, level)| header(*level, &format!("h{i}")))
    .collect();

  let tree = build_section_tree(&headers);
  assert_well_formed(&tree, 0);

  let mut order = Vec::new();
  flatten(&tree, &mut order);
  let expected: Vec<String> =
    (0..levels.len()).map(|i| format!("h{i}")).collect();
  assert_eq!(order, expected);
}

#[test]
fn test_builder_matches_free_function() {
  let headers = [header(1, "A"), header(2, "B"), header(2, "C")];
  let mut builder = SectionTreeBuilder::new();
  for h in &headers {
    builder.enter_heading(h.level, &h.text, &h.id);
  }
  assert_eq!(builder.finish(), build_section_tree(&headers));
}

#[test]
fn test_sections_from_rendered_document() {
  let processor = MarkdownProcessor::new(MarkdownOptions::default());
  let md = "# Intro\n\n## Setup\n\n## Setup\n\n#### Notes on *setup*\n";
  let sections = processor.render(md).sections();

  assert_eq!(sections.len(), 1);
  let intro = &sections[0];
  assert_eq!(intro.url, "#intro");
  assert_eq!(intro.children[0].url, "#setup");
  assert_eq!(intro.children[1].url, "#setup-1");
  assert_eq!(intro.children[1].children[0].title, "Notes on setup");
  assert_eq!(intro.children[1].children[0].level, 4);
}

#[test]
fn test_toc_links_match_heading_ids() {
  let processor = MarkdownProcessor::new(MarkdownOptions::default());
  let result = processor.render("# Intro\n\n## Usage\n\n## Usage\n");
  let toc = render_toc(&result.sections(), 3);

  for header in &result.headers {
    assert!(toc.contains(&format!("href=\"#{}\"", header.id)));
    assert!(result.html.contains(&format!("id=\"{}\"", header.id)));
  }
}
