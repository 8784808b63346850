//! The page generator.
use std::sync::Arc;

use folio_config::Config;
use folio_storage::{
  FsStorage,
  MemoryStorage,
  SourceStorage,
  StorageError,
  TemplateStorage,
};
use log::debug;

use crate::{
  SourceDocument,
  breadcrumbs::build_breadcrumbs,
  cache::BuildSession,
  error::GenerateError,
  registry::{RegistryOptions, TemplateRegistry, TemplateSet},
};

/// Default name of the template every page is rendered with.
pub const DEFAULT_ROOT_TEMPLATE: &str = "root.html";

/// Renders requested paths into complete HTML pages.
///
/// Templates and sources are read from their storages on every call to
/// [`PageGenerator::generate`], so edits to either show up on the next call.
/// A generator holds no mutable state and can be shared between threads.
pub struct PageGenerator {
  sources:       Arc<dyn SourceStorage>,
  templates:     Arc<dyn TemplateStorage>,
  registry:      TemplateRegistry,
  root_template: String,
}

impl PageGenerator {
  /// Create a generator reading from the given storages.
  pub fn new(
    sources: impl SourceStorage + 'static,
    templates: impl TemplateStorage + 'static,
    registry: TemplateRegistry,
  ) -> Self {
    Self {
      sources: Arc::new(sources),
      templates: Arc::new(templates),
      registry,
      root_template: DEFAULT_ROOT_TEMPLATE.to_string(),
    }
  }

  /// Render pages with a different root template.
  #[must_use]
  pub fn with_root_template(mut self, name: impl Into<String>) -> Self {
    self.root_template = name.into();
    self
  }

  /// Create a generator for a configuration.
  ///
  /// Sources are read from `sources_dir`. Templates are read from
  /// `templates_dir`, or from the embedded defaults when it is unset. The
  /// configuration is used as is; call [`Config::validate`] first to catch
  /// mistakes early.
  #[must_use]
  pub fn from_config(config: &Config) -> Self {
    let sources = FsStorage::new(&config.sources_dir)
      .with_markdown_suffix(config.markdown_suffix.clone());
    let registry = TemplateRegistry::new(RegistryOptions::from(config));

    let generator = match config.templates_dir {
      Some(ref dir) => Self::new(sources, FsStorage::new(dir), registry),
      None => {
        Self::new(
          sources,
          MemoryStorage::from_files(folio_templates::all_templates()),
          registry,
        )
      },
    };
    generator.with_root_template(config.root_template.clone())
  }

  #[must_use]
  pub const fn registry(&self) -> &TemplateRegistry {
    &self.registry
  }

  #[must_use]
  pub fn root_template(&self) -> &str {
    &self.root_template
  }

  pub(crate) fn template_storage(&self) -> &dyn TemplateStorage {
    self.templates.as_ref()
  }

  /// Generate the page for a requested path.
  ///
  /// # Errors
  ///
  /// Returns [`GenerateError::NotFound`] if no source document exists for
  /// `path`. Template loading, source reading and template execution
  /// failures are returned as the other [`GenerateError`] variants, all of
  /// kind [`ErrorKind::Internal`](crate::ErrorKind::Internal).
  pub fn generate(&self, path: &str) -> Result<Vec<u8>, GenerateError> {
    let templates = self.registry.load(self.template_storage())?;
    self.generate_with(&templates, path)
  }

  /// Start a build session that reuses compiled templates across pages
  /// while the template sources stay unchanged.
  #[must_use]
  pub const fn session(&self) -> BuildSession<'_> {
    BuildSession::new(self)
  }

  /// Resolve a requested path to its source document.
  ///
  /// # Errors
  ///
  /// Returns [`GenerateError::NotFound`] if the path does not resolve to an
  /// existing document (including paths that could escape the source root)
  /// and [`GenerateError::Source`] if it exists but cannot be read.
  pub fn source_document(
    &self,
    path: &str,
  ) -> Result<SourceDocument, GenerateError> {
    let resolved = self.sources.resolve(path).map_err(|e| {
      match e {
        StorageError::NotFound { .. } | StorageError::InvalidPath { .. } => {
          GenerateError::NotFound {
            path: path.to_string(),
          }
        },
        StorageError::Io { .. } => {
          GenerateError::Source {
            path:   path.to_string(),
            source: e,
          }
        },
      }
    })?;

    Ok(SourceDocument {
      file_path:   resolved.path,
      content:     String::from_utf8_lossy(&resolved.content).into_owned(),
      breadcrumbs: build_breadcrumbs(
        path,
        &self.registry.options().markdown_suffix,
      ),
    })
  }

  pub(crate) fn generate_with(
    &self,
    templates: &TemplateSet,
    path: &str,
  ) -> Result<Vec<u8>, GenerateError> {
    let document = self.source_document(path)?;
    let output = templates.render(&self.root_template, &document)?;
    debug!(
      "Generated {path:?} from {} ({} bytes)",
      document.file_path,
      output.len()
    );
    Ok(output)
  }
}
