//! Page generation for folio.
//!
//! [`PageGenerator::generate`] turns a requested path into a complete HTML
//! page:
//!
//! 1. A fresh [`TemplateSet`] is loaded from template storage.
//! 2. The path is resolved to a [`SourceDocument`] and given a breadcrumb
//!    trail.
//! 3. The root template is executed against the document. Templates render
//!    the Markdown themselves through the `markdown()` and `toc()`
//!    functions.
//!
//! # Example
//!
//! ```
//! use folio_html::{PageGenerator, TemplateRegistry};
//! use folio_storage::MemoryStorage;
//!
//! let sources = MemoryStorage::new().with_file("index.md", "# Welcome");
//! let templates = MemoryStorage::new()
//!   .with_file("root.html", "<main>{{ markdown(document=document) }}</main>");
//! let generator =
//!   PageGenerator::new(sources, templates, TemplateRegistry::default());
//!
//! let page = generator.generate("").expect("index exists");
//! assert_eq!(page, b"<main><h1 id=\"welcome\">Welcome</h1>\n</main>");
//! ```
pub mod breadcrumbs;
pub mod cache;
mod document;
pub mod error;
mod functions;
pub mod generator;
pub mod registry;

pub use breadcrumbs::BreadcrumbEntry;
pub use cache::BuildSession;
pub use document::SourceDocument;
pub use error::{ErrorKind, GenerateError, TemplateError};
pub use generator::PageGenerator;
pub use registry::{
  RegistryOptions,
  TemplateRegistry,
  TemplateSet,
  TemplateSource,
};
