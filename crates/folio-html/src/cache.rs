//! Template reuse within one build run.
//!
//! A [`BuildSession`] still reads the template sources for every page, but
//! only compiles them when their fingerprint differs from the last compiled
//! set. A template edited mid-run is therefore picked up on the next page.
use std::sync::{Arc, Mutex, PoisonError};

use log::debug;
use sha2::{Digest, Sha256};

use crate::{
  error::{GenerateError, TemplateError},
  generator::PageGenerator,
  registry::{TemplateSet, TemplateSource},
};

/// Content fingerprint of a set of template sources.
///
/// Sources are hashed in name order, each as its name and content with
/// their lengths, so no two different sets share a fingerprint by
/// concatenation.
#[must_use]
pub fn fingerprint(sources: &[TemplateSource]) -> String {
  let mut sorted: Vec<&TemplateSource> = sources.iter().collect();
  sorted.sort_by(|a, b| a.name.cmp(&b.name));

  let mut hasher = Sha256::new();
  for source in sorted {
    hasher.update((source.name.len() as u64).to_le_bytes());
    hasher.update(source.name.as_bytes());
    hasher.update((source.content.len() as u64).to_le_bytes());
    hasher.update(source.content.as_bytes());
  }
  hex::encode(hasher.finalize())
}

/// A build run that shares compiled templates between pages.
///
/// Obtained from [`PageGenerator::session`]. Drop the session at the end of
/// the run; nothing outlives it.
pub struct BuildSession<'a> {
  generator: &'a PageGenerator,
  compiled:  Mutex<Option<(String, Arc<TemplateSet>)>>,
}

impl<'a> BuildSession<'a> {
  pub(crate) const fn new(generator: &'a PageGenerator) -> Self {
    Self {
      generator,
      compiled: Mutex::new(None),
    }
  }

  /// The compiled template set matching the current template sources.
  ///
  /// # Errors
  ///
  /// Returns a [`TemplateError`] if the sources cannot be read or compiled.
  pub fn templates(&self) -> Result<Arc<TemplateSet>, TemplateError> {
    let registry = self.generator.registry();
    let sources = registry.read_sources(self.generator.template_storage())?;
    let key = fingerprint(&sources);

    if let Some((cached_key, set)) = self
      .compiled
      .lock()
      .unwrap_or_else(PoisonError::into_inner)
      .as_ref()
      && *cached_key == key
    {
      return Ok(Arc::clone(set));
    }

    debug!("Template fingerprint changed to {key}, recompiling");
    let set = Arc::new(registry.compile(&sources)?);
    *self.compiled.lock().unwrap_or_else(PoisonError::into_inner) =
      Some((key, Arc::clone(&set)));
    Ok(set)
  }

  /// Generate a page, reusing compiled templates where possible.
  ///
  /// # Errors
  ///
  /// Same as [`PageGenerator::generate`].
  pub fn generate(&self, path: &str) -> Result<Vec<u8>, GenerateError> {
    let templates = self.templates()?;
    self.generator.generate_with(&templates, path)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn source(name: &str, content: &str) -> TemplateSource {
    TemplateSource {
      name:    name.into(),
      content: content.into(),
    }
  }

  #[test]
  fn test_fingerprint_ignores_order() {
    let a = [source("a.html", "1"), source("b.html", "2")];
    let b = [source("b.html", "2"), source("a.html", "1")];
    assert_eq!(fingerprint(&a), fingerprint(&b));
  }

  #[test]
  fn test_fingerprint_tracks_content_and_boundaries() {
    let base = fingerprint(&[source("a.html", "12")]);
    assert_ne!(base, fingerprint(&[source("a.html", "13")]));
    assert_ne!(base, fingerprint(&[source("a.html1", "2")]));
    assert_eq!(base.len(), 64);
  }
}
