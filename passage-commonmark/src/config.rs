//! File based configuration.
//!
//! ```toml
//! highlight_code = true
//! inline_copy_threshold = 16
//! engine = "full"
//! sanitizer_backend = "ammonia"
//!
//! [sanitizer]
//! allow_data_attributes = true
//! ```
use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::{
  error::ConfigError,
  processor::{EngineMode, MarkdownOptions},
  render::DEFAULT_INLINE_COPY_THRESHOLD,
  sanitize::{SanitizeOverride, SanitizerBackend},
};

/// Largest accepted `inline_copy_threshold`.
pub const MAX_INLINE_COPY_THRESHOLD: usize = 10_000;

/// Renderer configuration as read from a TOML file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
#[allow(
  clippy::struct_excessive_bools,
  reason = "Config struct with related boolean flags"
)]
pub struct RenderConfig {
  /// Enable syntax highlighting for code blocks.
  pub highlight_code: bool,

  /// Sanitize the final HTML.
  pub sanitize: bool,

  /// Guess the language of unlabeled code blocks.
  pub auto_detect_language: bool,

  /// Inline code longer than this many characters gets a copy button.
  pub inline_copy_threshold: usize,

  /// `"full"` or `"fallback"`.
  pub engine: EngineMode,

  /// `"ammonia"` or `"regex"`.
  pub sanitizer_backend: SanitizerBackend,

  /// Changes to the sanitizer allow-lists. Each field given replaces the
  /// default list as a whole.
  pub sanitizer: SanitizeOverride,
}

impl Default for RenderConfig {
  fn default() -> Self {
    Self {
      highlight_code:        true,
      sanitize:              true,
      auto_detect_language:  false,
      inline_copy_threshold: DEFAULT_INLINE_COPY_THRESHOLD,
      engine:                EngineMode::Full,
      sanitizer_backend:     SanitizerBackend::Ammonia,
      sanitizer:             SanitizeOverride::default(),
    }
  }
}

impl RenderConfig {
  /// Parse configuration from TOML text.
  ///
  /// # Errors
  ///
  /// Returns [`ConfigError::Toml`] if the text is not valid TOML or contains
  /// unknown keys or values.
  pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
    Ok(toml::from_str(content)?)
  }

  /// Load configuration from a TOML file.
  ///
  /// # Errors
  ///
  /// Returns [`ConfigError::Io`] if the file cannot be read, or
  /// [`ConfigError::Toml`] if it cannot be parsed.
  pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| {
      ConfigError::Io {
        path: path.to_path_buf(),
        source,
      }
    })?;
    let config = Self::from_toml_str(&content)?;
    log::debug!("Loaded render configuration from {}", path.display());
    Ok(config)
  }

  /// Check values serde cannot.
  ///
  /// # Errors
  ///
  /// Returns [`ConfigError::Invalid`] describing the first bad value.
  pub fn validate(&self) -> Result<(), ConfigError> {
    if self.inline_copy_threshold > MAX_INLINE_COPY_THRESHOLD {
      return Err(ConfigError::Invalid(format!(
        "inline_copy_threshold must be at most {MAX_INLINE_COPY_THRESHOLD}, \
         got {}",
        self.inline_copy_threshold
      )));
    }
    Ok(())
  }

  /// Convert into processor options.
  ///
  /// # Errors
  ///
  /// Returns [`ConfigError::Invalid`] if validation fails.
  pub fn into_options(self) -> Result<MarkdownOptions, ConfigError> {
    self.validate()?;
    Ok(MarkdownOptions {
      highlight_code:        self.highlight_code,
      sanitize:              self.sanitize,
      auto_detect_language:  self.auto_detect_language,
      inline_copy_threshold: self.inline_copy_threshold,
      engine:                self.engine,
      sanitizer:             self.sanitizer_backend,
      sanitize_override:     self.sanitizer,
    })
  }
}
