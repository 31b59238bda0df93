//! HTML sanitization.
//!
//! Two backends sit behind one [`Sanitizer`]:
//! - **Parser** - ammonia, when the `ammonia` feature is enabled. Enforces
//!   the tag and attribute allow-lists.
//! - **Regex** - a best-effort string filter. Used when the parser backend
//!   is compiled out, disabled, or fails on a given input.
//!
//! Sanitizing never fails from the caller's point of view; the worst case is
//! the regex filter's output and a logged warning.

#[cfg(feature = "ammonia")] mod parser;

pub mod fallback;
pub mod types;

use log::{error, warn};
use serde::{Deserialize, Serialize};
pub use types::{SanitizeConfig, SanitizeOverride};

#[cfg(feature = "ammonia")]
use crate::error::panic_message;
use crate::error::RenderError;

/// Which sanitizer produced a piece of output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SanitizerBackend {
  /// Parser-backed allow-list sanitizer.
  Ammonia,
  /// Regex fallback.
  Regex,
}

impl SanitizerBackend {
  /// The strongest backend compiled into this build.
  #[must_use]
  pub const fn detect() -> Self {
    if cfg!(feature = "ammonia") {
      Self::Ammonia
    } else {
      Self::Regex
    }
  }
}

/// Sanitized HTML together with the backend that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sanitized {
  pub html:    String,
  pub backend: SanitizerBackend,
}

/// Sanitizer bound to one configuration.
#[derive(Debug, Clone)]
pub struct Sanitizer {
  config:  SanitizeConfig,
  backend: SanitizerBackend,
}

impl Default for Sanitizer {
  fn default() -> Self {
    Self::new(SanitizeConfig::global().clone())
  }
}

impl Sanitizer {
  /// Create a sanitizer using the strongest available backend.
  #[must_use]
  pub const fn new(config: SanitizeConfig) -> Self {
    Self {
      config,
      backend: SanitizerBackend::detect(),
    }
  }

  /// Create a sanitizer from the global defaults with `over` merged on top.
  #[must_use]
  pub fn with_override(over: &SanitizeOverride) -> Self {
    Self::new(over.merged(SanitizeConfig::global()))
  }

  /// Prefer `backend`. Asking for the parser when it is compiled out still
  /// yields the regex filter.
  #[must_use]
  pub const fn with_backend(mut self, backend: SanitizerBackend) -> Self {
    self.backend = match backend {
      SanitizerBackend::Ammonia => SanitizerBackend::detect(),
      SanitizerBackend::Regex => SanitizerBackend::Regex,
    };
    self
  }

  #[must_use]
  pub const fn config(&self) -> &SanitizeConfig {
    &self.config
  }

  #[must_use]
  pub const fn backend(&self) -> SanitizerBackend {
    self.backend
  }

  /// Sanitize `html`, reporting which backend produced the result.
  ///
  /// Blank input yields an empty string.
  #[must_use]
  pub fn clean(&self, html: &str) -> Sanitized {
    if html.trim().is_empty() {
      return Sanitized {
        html:    String::new(),
        backend: self.backend,
      };
    }

    if self.backend == SanitizerBackend::Ammonia {
      match self.clean_with_parser(html) {
        Ok(html) => {
          return Sanitized {
            html,
            backend: SanitizerBackend::Ammonia,
          };
        },
        Err(e) => error!("{e}"),
      }
    }

    warn!(
      "Sanitizing {} bytes with the regex fallback; output is best-effort",
      html.len()
    );
    Sanitized {
      html:    fallback::sanitize(html),
      backend: SanitizerBackend::Regex,
    }
  }

  /// Sanitize `html` and return only the markup.
  #[must_use]
  pub fn sanitize(&self, html: &str) -> String {
    self.clean(html).html
  }

  #[cfg(feature = "ammonia")]
  fn clean_with_parser(&self, html: &str) -> Result<String, RenderError> {
    std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
      parser::clean(&self.config, html)
    }))
    .map_err(|e| RenderError::SanitizeFailure(panic_message(e.as_ref())))
  }

  #[cfg(not(feature = "ammonia"))]
  #[allow(
    clippy::unused_self,
    reason = "Mirrors the signature of the ammonia-backed variant"
  )]
  fn clean_with_parser(&self, _html: &str) -> Result<String, RenderError> {
    Err(RenderError::EngineUnavailable("ammonia"))
  }
}

/// Sanitize `html` with the global defaults and `over` merged on top.
#[must_use]
pub fn sanitize(html: &str, over: &SanitizeOverride) -> String {
  if over.is_empty() {
    return default_sanitizer().sanitize(html);
  }
  Sanitizer::with_override(over).sanitize(html)
}

/// Shared sanitizer for the global defaults.
pub(crate) fn default_sanitizer() -> &'static Sanitizer {
  static DEFAULT: std::sync::LazyLock<Sanitizer> =
    std::sync::LazyLock::new(Sanitizer::default);
  &DEFAULT
}
