use std::{
  fs,
  path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Configuration for the folio page generator.
///
/// [`Config`] controls where sources and templates are read from and how
/// pages are rendered. Fields are typically loaded from a TOML or JSON config
/// file; every field has a default, so a config file only needs to name what
/// it changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
  /// Directory containing the Markdown sources.
  pub sources_dir: PathBuf,

  /// Directory containing template files. The embedded default templates
  /// are used when unset.
  pub templates_dir: Option<PathBuf>,

  /// Prefix prepended to paths by the `asset()` template function.
  pub assets_url_prefix: String,

  /// Name of the template every page is rendered with.
  pub root_template: String,

  /// Extension (without the dot) of files treated as templates.
  pub template_extension: String,

  /// Suffix of Markdown source files. Appended when resolving requested
  /// paths and stripped from rendered links.
  pub markdown_suffix: String,

  /// Whether to enable GitHub Flavored Markdown extensions.
  pub gfm: bool,

  /// Deepest heading level included by the `toc()` template function.
  pub toc_max_level: u8,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      sources_dir:        PathBuf::from("docs"),
      templates_dir:      None,
      assets_url_prefix:  "/assets/".to_string(),
      root_template:      "root.html".to_string(),
      template_extension: "html".to_string(),
      markdown_suffix:    ".md".to_string(),
      gfm:                true,
      toc_max_level:      3,
    }
  }
}

impl Config {
  /// Load configuration from a TOML or JSON file, chosen by extension.
  ///
  /// # Errors
  ///
  /// Returns an error if the file cannot be read, has an unsupported
  /// extension, or fails to parse.
  pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
    let path = path.as_ref();
    let content =
      fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
      })?;

    match path
      .extension()
      .and_then(|ext| ext.to_str())
      .map(str::to_lowercase)
      .as_deref()
    {
      Some("json") => {
        serde_json::from_str(&content).map_err(|source| {
          ConfigError::Serde {
            path: path.to_path_buf(),
            source,
          }
        })
      },
      Some("toml") => {
        toml::from_str(&content).map_err(|source| {
          ConfigError::Toml {
            path: path.to_path_buf(),
            source,
          }
        })
      },
      _ => {
        Err(ConfigError::Config(format!(
          "Unsupported config file format: {}",
          path.display()
        )))
      },
    }
  }

  /// Load and merge config files in order, then apply `KEY=VALUE`
  /// overrides and validate the result.
  ///
  /// With no files, starts from [`Config::default`].
  ///
  /// # Errors
  ///
  /// Returns an error if any file fails to load, an override is malformed,
  /// or the final configuration is invalid.
  pub fn load(
    config_files: &[PathBuf],
    config_overrides: &[String],
  ) -> Result<Self, ConfigError> {
    let mut config = Self::default();
    for config_path in config_files {
      config.merge(Self::from_file(config_path)?);
    }

    if config_files.len() > 1 {
      log::info!("Loaded and merged {} config files", config_files.len());
    }

    config.apply_overrides(config_overrides)?;
    config.validate()?;
    Ok(config)
  }

  /// Merge another config into this one, with the other config's values
  /// taking precedence.
  ///
  /// # Merge Rules
  ///
  /// - [`Option<T>`] fields: Other's [`Some`] value replaces this config's
  ///   value
  /// - Plain fields (String, bool, etc.): Other's value always replaces
  pub fn merge(&mut self, other: Self) {
    let Self {
      sources_dir,
      templates_dir,
      assets_url_prefix,
      root_template,
      template_extension,
      markdown_suffix,
      gfm,
      toc_max_level,
    } = other;

    self.sources_dir = sources_dir;
    if templates_dir.is_some() {
      self.templates_dir = templates_dir;
    }
    self.assets_url_prefix = assets_url_prefix;
    self.root_template = root_template;
    self.template_extension = template_extension;
    self.markdown_suffix = markdown_suffix;
    self.gfm = gfm;
    self.toc_max_level = toc_max_level;
  }

  /// Apply configuration overrides from `KEY=VALUE` strings.
  ///
  /// ```
  /// use folio_config::Config;
  ///
  /// let mut config = Config::default();
  /// config
  ///   .apply_overrides(&["gfm=false".to_string(), "toc_max_level=2".to_string()])
  ///   .expect("valid overrides");
  /// assert!(!config.gfm);
  /// assert_eq!(config.toc_max_level, 2);
  /// ```
  ///
  /// # Errors
  ///
  /// Returns an error for a malformed override, an unknown key, or a value
  /// that does not parse as the field's type.
  pub fn apply_overrides(
    &mut self,
    overrides: &[String],
  ) -> Result<(), ConfigError> {
    for override_str in overrides {
      let (key, value) = override_str.split_once('=').ok_or_else(|| {
        ConfigError::Config(format!(
          "Invalid config override format: '{override_str}'. Expected \
           KEY=VALUE"
        ))
      })?;

      self.apply_override(key.trim(), value.trim())?;
    }

    Ok(())
  }

  fn apply_override(
    &mut self,
    key: &str,
    value: &str,
  ) -> Result<(), ConfigError> {
    match key {
      "sources_dir" => self.sources_dir = PathBuf::from(value),
      "templates_dir" => {
        self.templates_dir =
          (!value.is_empty()).then(|| PathBuf::from(value));
      },
      "assets_url_prefix" => self.assets_url_prefix = value.to_string(),
      "root_template" => self.root_template = value.to_string(),
      "template_extension" => self.template_extension = value.to_string(),
      "markdown_suffix" => self.markdown_suffix = value.to_string(),
      "gfm" => self.gfm = parse_bool(key, value)?,
      "toc_max_level" => {
        self.toc_max_level = value.parse().map_err(|e| {
          ConfigError::Config(format!(
            "Invalid value for '{key}': '{value}' ({e})"
          ))
        })?;
      },
      _ => {
        return Err(ConfigError::Config(format!(
          "Unknown config key: '{key}'"
        )));
      },
    }
    Ok(())
  }

  /// Check the configuration for values the generator cannot work with.
  ///
  /// # Errors
  ///
  /// Returns an error listing every problem found.
  pub fn validate(&self) -> Result<(), ConfigError> {
    let mut errors = Vec::new();

    if self.root_template.is_empty() {
      errors.push("root_template must not be empty".to_string());
    } else if !self
      .root_template
      .ends_with(&format!(".{}", self.template_extension))
    {
      errors.push(format!(
        "root_template '{}' does not have the template extension '.{}'",
        self.root_template, self.template_extension
      ));
    }

    if !self.markdown_suffix.starts_with('.') {
      errors.push(format!(
        "markdown_suffix '{}' must start with '.'",
        self.markdown_suffix
      ));
    }

    if !(1..=6).contains(&self.toc_max_level) {
      errors.push(format!(
        "toc_max_level must be between 1 and 6, got {}",
        self.toc_max_level
      ));
    }

    if let Some(ref templates_dir) = self.templates_dir
      && !templates_dir.is_dir()
    {
      errors.push(format!(
        "Template directory does not exist: {}",
        templates_dir.display()
      ));
    }

    if errors.is_empty() {
      Ok(())
    } else {
      Err(ConfigError::Config(errors.join("\n")))
    }
  }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
  match value.to_lowercase().as_str() {
    "true" | "yes" | "1" | "on" => Ok(true),
    "false" | "no" | "0" | "off" => Ok(false),
    _ => {
      Err(ConfigError::Config(format!(
        "Invalid boolean value for '{key}': '{value}'"
      )))
    },
  }
}

#[cfg(test)]
mod tests {
  #![allow(clippy::expect_used, reason = "Fine in tests")]

  use super::*;

  #[test]
  fn test_defaults_are_valid() {
    Config::default().validate().expect("defaults validate");
  }

  #[test]
  fn test_merge_keeps_templates_dir_when_other_is_none() {
    let mut base = Config {
      templates_dir: Some(PathBuf::from("base-templates")),
      ..Default::default()
    };
    base.merge(Config {
      gfm: false,
      ..Default::default()
    });

    assert_eq!(base.templates_dir, Some(PathBuf::from("base-templates")));
    assert!(!base.gfm);
  }

  #[test]
  fn test_apply_overrides_boolean_and_numeric() {
    let mut config = Config::default();
    config
      .apply_overrides(&["gfm=no".to_string(), "toc_max_level=6".to_string()])
      .expect("overrides apply");
    assert!(!config.gfm);
    assert_eq!(config.toc_max_level, 6);
  }

  #[test]
  fn test_apply_overrides_empty_templates_dir_clears() {
    let mut config = Config {
      templates_dir: Some(PathBuf::from("t")),
      ..Default::default()
    };
    config
      .apply_overrides(&["templates_dir=".to_string()])
      .expect("override applies");
    assert_eq!(config.templates_dir, None);
  }

  #[test]
  fn test_apply_overrides_rejects_bad_input() {
    let mut config = Config::default();
    assert!(config.apply_overrides(&["gfm".to_string()]).is_err());
    assert!(config.apply_overrides(&["nope=1".to_string()]).is_err());
    assert!(config.apply_overrides(&["gfm=maybe".to_string()]).is_err());
    assert!(
      config
        .apply_overrides(&["toc_max_level=300".to_string()])
        .is_err()
    );
  }

  #[test]
  fn test_validate_reports_every_problem() {
    let config = Config {
      root_template: "root.txt".to_string(),
      markdown_suffix: String::new(),
      toc_max_level: 0,
      ..Default::default()
    };
    let message = config.validate().expect_err("invalid config").to_string();
    assert!(message.contains("root_template"));
    assert!(message.contains("markdown_suffix"));
    assert!(message.contains("toc_max_level"));
  }
}
