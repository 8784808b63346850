//! Template loading and compilation.
//!
//! A [`TemplateRegistry`] turns the files of a [`TemplateStorage`] into a
//! [`TemplateSet`]: one tera namespace in which every template can include,
//! extend or import any other by file name, with the `asset`, `markdown` and
//! `toc` functions registered.
//!
//! Loading happens in three steps:
//!
//! 1. List the storage and keep entries ending in the template extension,
//!    sorted by name so compilation order never depends on the backend.
//! 2. Parse every file on its own. A syntax error, or a call to a function
//!    that is not registered, is reported against the file that contains it.
//! 3. Add all files to one namespace, which resolves cross-template
//!    references such as `{% extends %}` parents.
use std::sync::Arc;

use folio_commonmark::{MarkdownOptions, MarkdownOptionsBuilder};
use folio_config::Config;
use folio_storage::TemplateStorage;
use log::debug;
use tera::{Context, Template, Tera};

use crate::{
  SourceDocument,
  error::{GenerateError, TemplateError},
  functions::{
    AssetFunction,
    MarkdownFunction,
    TocFunction,
    first_unknown_function,
  },
};

/// Settings the registered template functions render with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryOptions {
  /// Prefix used by `asset()`.
  pub assets_url_prefix:  String,
  /// Extension (without the dot) of files loaded as templates.
  pub template_extension: String,
  /// Suffix stripped from links in rendered Markdown.
  pub markdown_suffix:    String,
  /// Whether rendered Markdown uses GFM extensions.
  pub gfm:                bool,
  /// Default depth of `toc()`.
  pub toc_max_level:      u8,
}

impl Default for RegistryOptions {
  fn default() -> Self {
    Self::from(&Config::default())
  }
}

impl From<&Config> for RegistryOptions {
  fn from(config: &Config) -> Self {
    Self {
      assets_url_prefix:  config.assets_url_prefix.clone(),
      template_extension: config.template_extension.clone(),
      markdown_suffix:    config.markdown_suffix.clone(),
      gfm:                config.gfm,
      toc_max_level:      config.toc_max_level,
    }
  }
}

impl RegistryOptions {
  /// URL of a static asset.
  #[must_use]
  pub fn asset_url(&self, path: &str) -> String {
    if self.assets_url_prefix.ends_with('/') {
      format!("{}{}", self.assets_url_prefix, path.trim_start_matches('/'))
    } else {
      format!("{}{path}", self.assets_url_prefix)
    }
  }

  /// Markdown options for a document whose links resolve against
  /// `base_url`.
  #[must_use]
  pub fn markdown_options(&self, base_url: &str) -> MarkdownOptions {
    MarkdownOptionsBuilder::new()
      .gfm(self.gfm)
      .base_url(Some(base_url))
      .strip_url_suffix(Some(self.markdown_suffix.as_str()))
      .build()
  }

  fn is_template(&self, name: &str) -> bool {
    name
      .strip_suffix(self.template_extension.as_str())
      .is_some_and(|stem| stem.len() > 1 && stem.ends_with('.'))
  }
}

/// Raw content of one template file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateSource {
  pub name:    String,
  pub content: String,
}

/// Loads and compiles template sets.
#[derive(Debug, Clone, Default)]
pub struct TemplateRegistry {
  options: Arc<RegistryOptions>,
}

impl TemplateRegistry {
  #[must_use]
  pub fn new(options: RegistryOptions) -> Self {
    Self {
      options: Arc::new(options),
    }
  }

  #[must_use]
  pub fn options(&self) -> &RegistryOptions {
    &self.options
  }

  /// Read every template file from `storage`, sorted by name.
  ///
  /// # Errors
  ///
  /// Returns [`TemplateError::List`] if the storage cannot be listed and
  /// [`TemplateError::Read`] if a template file cannot be read.
  pub fn read_sources(
    &self,
    storage: &dyn TemplateStorage,
  ) -> Result<Vec<TemplateSource>, TemplateError> {
    let mut names: Vec<String> = storage
      .list()
      .map_err(|source| TemplateError::List { source })?
      .into_iter()
      .filter(|entry| !entry.is_dir && self.options.is_template(&entry.name))
      .map(|entry| entry.name)
      .collect();
    names.sort();

    names
      .into_iter()
      .map(|name| {
        match storage.read(&name) {
          Ok(bytes) => {
            Ok(TemplateSource {
              content: String::from_utf8_lossy(&bytes).into_owned(),
              name,
            })
          },
          Err(source) => Err(TemplateError::Read { name, source }),
        }
      })
      .collect()
  }

  /// Compile already-read sources into a template set.
  ///
  /// # Errors
  ///
  /// Returns [`TemplateError::Parse`] naming the first file (in name order)
  /// that does not parse or calls an unregistered function, or
  /// [`TemplateError::Compile`] if the templates parse but cannot be combined.
  pub fn compile(
    &self,
    sources: &[TemplateSource],
  ) -> Result<TemplateSet, TemplateError> {
    let mut tera = Tera::default();
    tera.register_function("asset", AssetFunction {
      options: Arc::clone(&self.options),
    });
    tera.register_function("markdown", MarkdownFunction {
      options: Arc::clone(&self.options),
    });
    tera.register_function("toc", TocFunction {
      options: Arc::clone(&self.options),
    });

    for source in sources {
      let template = Template::new(&source.name, None, &source.content)
        .map_err(|e| {
          TemplateError::Parse {
            name:   source.name.clone(),
            source: e,
          }
        })?;

      let is_known = |name: &str| tera.get_function(name).is_ok();
      if let Some(function) = first_unknown_function(&template.ast, &is_known)
      {
        return Err(TemplateError::Parse {
          name:   source.name.clone(),
          source: tera::Error::msg(format!("Function '{function}' not found")),
        });
      }
      debug!("Parsed template {}", source.name);
    }

    tera
      .add_raw_templates(
        sources
          .iter()
          .map(|source| (source.name.as_str(), source.content.as_str())),
      )
      .map_err(|source| TemplateError::Compile { source })?;

    debug!("Compiled {} templates", sources.len());
    Ok(TemplateSet { tera })
  }

  /// Read and compile a fresh template set from `storage`.
  ///
  /// # Errors
  ///
  /// Returns any error of [`TemplateRegistry::read_sources`] or
  /// [`TemplateRegistry::compile`].
  pub fn load(
    &self,
    storage: &dyn TemplateStorage,
  ) -> Result<TemplateSet, TemplateError> {
    let sources = self.read_sources(storage)?;
    self.compile(&sources)
  }
}

/// A compiled template namespace with the template functions registered.
#[derive(Debug)]
pub struct TemplateSet {
  tera: Tera,
}

impl TemplateSet {
  /// Names of the templates in this set.
  pub fn template_names(&self) -> impl Iterator<Item = &str> {
    self.tera.get_template_names()
  }

  /// Whether a template of the given name exists.
  #[must_use]
  pub fn contains(&self, name: &str) -> bool {
    self.template_names().any(|n| n == name)
  }

  /// Execute `template` against `document`.
  ///
  /// The document's fields are available at the top level of the template
  /// context and, as a whole, as `document` for passing to `markdown()` and
  /// `toc()`.
  ///
  /// # Errors
  ///
  /// Returns [`GenerateError::Render`] if the template does not exist or
  /// fails to execute.
  pub fn render(
    &self,
    template: &str,
    document: &SourceDocument,
  ) -> Result<Vec<u8>, GenerateError> {
    let render_error = |source: tera::Error| {
      GenerateError::Render {
        template: template.to_string(),
        source,
      }
    };

    let mut context = Context::from_serialize(document).map_err(render_error)?;
    context.insert("document", document);

    let mut output = Vec::new();
    self
      .tera
      .render_to(template, &context, &mut output)
      .map_err(render_error)?;
    Ok(output)
  }
}

#[cfg(test)]
mod tests {
  #![allow(clippy::expect_used, reason = "Fine in tests")]

  use folio_storage::MemoryStorage;

  use super::*;

  fn registry() -> TemplateRegistry {
    TemplateRegistry::new(RegistryOptions::default())
  }

  fn document(content: &str) -> SourceDocument {
    SourceDocument {
      file_path:   "docs/intro.md".into(),
      content:     content.into(),
      breadcrumbs: Vec::new(),
    }
  }

  #[test]
  fn test_only_template_files_are_read_in_name_order() {
    let storage = MemoryStorage::new()
      .with_file("z.html", "z")
      .with_file("a.html", "a")
      .with_file("notes.txt", "ignored")
      .with_file("html", "no extension")
      .with_file("partials/nav.html", "nested");
    let sources = registry().read_sources(&storage).expect("read");
    let names: Vec<_> = sources.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, ["a.html", "z.html"]);
  }

  #[test]
  fn test_parse_error_names_file() {
    let storage = MemoryStorage::new()
      .with_file("good.html", "ok")
      .with_file("broken.html", "{% if %}");
    assert!(matches!(
      registry().load(&storage),
      Err(TemplateError::Parse { ref name, .. }) if name == "broken.html"
    ));
  }

  #[test]
  fn test_unknown_function_in_partial_names_partial() {
    let storage = MemoryStorage::new()
      .with_file("root.html", "{% include \"nav.html\" %}")
      .with_file("nav.html", "{% if true %}{{ nope() }}{% endif %}");
    let err = registry().load(&storage).expect_err("unknown function");
    assert!(matches!(
      err,
      TemplateError::Parse { ref name, .. } if name == "nav.html"
    ));
    assert!(err.to_string().contains("nav.html"));
  }

  #[test]
  fn test_builtin_functions_are_known() {
    let storage = MemoryStorage::new().with_file(
      "root.html",
      "{% for i in range(end=2) %}{{ i }}{% endfor %}",
    );
    let set = registry().load(&storage).expect("load");
    assert!(set.contains("root.html"));
    assert!(!set.contains("nav.html"));
    assert_eq!(set.render("root.html", &document("")).expect("render"), b"01");
  }

  #[test]
  fn test_missing_parent_is_compile_error() {
    let storage = MemoryStorage::new()
      .with_file("root.html", "{% extends \"base.html\" %}");
    assert!(matches!(
      registry().load(&storage),
      Err(TemplateError::Compile { .. })
    ));
  }

  #[test]
  fn test_asset_url_joins_slashes() {
    let options = RegistryOptions::default();
    assert_eq!(options.asset_url("style.css"), "/assets/style.css");
    assert_eq!(options.asset_url("/style.css"), "/assets/style.css");
  }

  #[test]
  fn test_functions_are_available() {
    let storage = MemoryStorage::new().with_file(
      "root.html",
      "{{ asset(path=\"app.js\") }}|{{ markdown(document=document) \
       }}|{{ toc(document=document, max_level=1) }}",
    );
    let set = registry().load(&storage).expect("load");
    let output = set
      .render("root.html", &document("# Intro\n\nSee [guide](guide.md).\n\n## Deep\n"))
      .expect("render");
    let html = String::from_utf8(output).expect("utf-8");

    assert!(html.starts_with("/assets/app.js|"));
    assert!(html.contains("<h1 id=\"intro\">Intro</h1>"));
    assert!(html.contains("href=\"/docs/guide\""));
    assert!(html.ends_with("<ul><li><a href=\"#intro\">Intro</a></li></ul>"));
  }

  #[test]
  fn test_context_exposes_document_fields() {
    let storage = MemoryStorage::new()
      .with_file("root.html", "{{ file_path | safe }}:{{ content | length }}");
    let set = registry().load(&storage).expect("load");
    let output = set.render("root.html", &document("abc")).expect("render");
    assert_eq!(output, b"docs/intro.md:3");
  }

  #[test]
  fn test_missing_root_template_is_render_error() {
    let set = registry().load(&MemoryStorage::new()).expect("empty set");
    assert!(matches!(
      set.render("root.html", &document("")),
      Err(GenerateError::Render { .. })
    ));
  }
}
