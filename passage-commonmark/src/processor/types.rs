//! Type definitions for the Markdown processor.
//!
//! Contains all the core types used by the processor, including:
//! - Configuration options (`MarkdownOptions`, `RenderOptions`)
//! - Capability detection (`Capabilities`, `EngineMode`)
//! - The main processor struct (`MarkdownProcessor`)
//! - The AST transformation trait
//!
//! # Examples
//!
//! ```
//! use passage_commonmark::{MarkdownOptions, MarkdownProcessor};
//!
//! let options = MarkdownOptions {
//!   highlight_code: false,
//!   inline_copy_threshold: 20,
//!   ..Default::default()
//! };
//!
//! let processor = MarkdownProcessor::new(options);
//! ```

use std::sync::Arc;

use comrak::nodes::AstNode;
use serde::{Deserialize, Serialize};

use crate::{
  error::RenderError,
  render::DEFAULT_INLINE_COPY_THRESHOLD,
  sanitize::{SanitizeOverride, Sanitizer, SanitizerBackend},
  syntax::SyntaxManager,
};

/// Which Markdown engine renders a document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineMode {
  /// comrak with the custom renderers.
  #[default]
  #[serde(rename = "full")]
  Full,
  /// The text-substitution renderer only.
  #[serde(rename = "fallback")]
  FallbackOnly,
}

/// Options for configuring the Markdown processor.
#[derive(Debug, Clone)]
#[allow(
  clippy::struct_excessive_bools,
  reason = "Config struct with related boolean flags"
)]
pub struct MarkdownOptions {
  /// Enable syntax highlighting for code blocks.
  pub highlight_code: bool,

  /// Sanitize the final HTML. The fallback renderer always sanitizes.
  pub sanitize: bool,

  /// Let the highlighter guess the language of unlabeled code blocks.
  pub auto_detect_language: bool,

  /// Inline code longer than this many characters gets a copy button.
  pub inline_copy_threshold: usize,

  /// Force the fallback renderer, e.g. for a degraded deployment.
  pub engine: EngineMode,

  /// Preferred sanitizer backend.
  pub sanitizer: SanitizerBackend,

  /// Changes merged over the global sanitizer configuration.
  pub sanitize_override: SanitizeOverride,
}

impl Default for MarkdownOptions {
  fn default() -> Self {
    Self {
      highlight_code:        cfg!(feature = "syntect"),
      sanitize:              true,
      auto_detect_language:  false,
      inline_copy_threshold: DEFAULT_INLINE_COPY_THRESHOLD,
      engine:                EngineMode::Full,
      sanitizer:             SanitizerBackend::detect(),
      sanitize_override:     SanitizeOverride::default(),
    }
  }
}

impl MarkdownOptions {
  /// The per-call options implied by these processor options.
  #[must_use]
  pub const fn render_options(&self) -> RenderOptions {
    RenderOptions {
      highlight_code: self.highlight_code,
      sanitize:       self.sanitize,
    }
  }
}

/// Per-call rendering switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
  pub highlight_code: bool,
  pub sanitize:       bool,
}

impl Default for RenderOptions {
  fn default() -> Self {
    Self {
      highlight_code: true,
      sanitize:       true,
    }
  }
}

/// What this processor can do, decided once at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
  pub engine:      EngineMode,
  pub sanitizer:   SanitizerBackend,
  pub highlighter: bool,
}

impl Capabilities {
  /// Resolve the requested options against what is compiled in and what
  /// initialized successfully.
  #[must_use]
  pub const fn detect(options: &MarkdownOptions, highlighter: bool) -> Self {
    let sanitizer = match options.sanitizer {
      SanitizerBackend::Ammonia => SanitizerBackend::detect(),
      SanitizerBackend::Regex => SanitizerBackend::Regex,
    };
    Self {
      engine: options.engine,
      sanitizer,
      highlighter,
    }
  }
}

/// Main Markdown processor.
///
/// Can be cheaply cloned since it uses `Arc` internally for the syntax manager.
#[derive(Debug, Clone)]
pub struct MarkdownProcessor {
  pub(crate) options:        MarkdownOptions,
  pub(crate) capabilities:   Capabilities,
  pub(crate) syntax_manager: Option<Arc<SyntaxManager>>,
  pub(crate) sanitizer:      Sanitizer,
}

/// Trait for AST transformations.
///
/// Transformers rewrite nodes in place, typically replacing them with
/// pre-rendered `HtmlInline` nodes.
pub trait AstTransformer {
  /// Transform the tree rooted at `node`.
  ///
  /// # Errors
  ///
  /// Returns an error if a subtree could not be rendered.
  fn transform<'a>(&self, node: &'a AstNode<'a>) -> Result<(), RenderError>;
}

/// Builder for constructing `MarkdownOptions` with method chaining.
#[derive(Debug, Clone)]
pub struct MarkdownOptionsBuilder {
  options: MarkdownOptions,
}

impl MarkdownOptionsBuilder {
  /// Create a new builder with default options.
  #[must_use]
  pub fn new() -> Self {
    Self {
      options: MarkdownOptions::default(),
    }
  }

  /// Enable or disable syntax highlighting.
  #[must_use]
  pub const fn highlight_code(mut self, enabled: bool) -> Self {
    self.options.highlight_code = enabled;
    self
  }

  /// Enable or disable final sanitization.
  #[must_use]
  pub const fn sanitize(mut self, enabled: bool) -> Self {
    self.options.sanitize = enabled;
    self
  }

  /// Enable or disable language auto-detection for unlabeled code blocks.
  #[must_use]
  pub const fn auto_detect_language(mut self, enabled: bool) -> Self {
    self.options.auto_detect_language = enabled;
    self
  }

  /// Set the inline code copy button threshold.
  #[must_use]
  pub const fn inline_copy_threshold(mut self, threshold: usize) -> Self {
    self.options.inline_copy_threshold = threshold;
    self
  }

  /// Select the rendering engine.
  #[must_use]
  pub const fn engine(mut self, engine: EngineMode) -> Self {
    self.options.engine = engine;
    self
  }

  /// Select the preferred sanitizer backend.
  #[must_use]
  pub const fn sanitizer(mut self, backend: SanitizerBackend) -> Self {
    self.options.sanitizer = backend;
    self
  }

  /// Merge these changes over the global sanitizer configuration.
  #[must_use]
  pub fn sanitize_override(mut self, over: SanitizeOverride) -> Self {
    self.options.sanitize_override = over;
    self
  }

  /// Build the final `MarkdownOptions`.
  #[must_use]
  pub fn build(self) -> MarkdownOptions {
    self.options
  }
}

impl Default for MarkdownOptionsBuilder {
  fn default() -> Self {
    Self::new()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn builder_sets_every_field() {
    let options = MarkdownOptionsBuilder::new()
      .highlight_code(false)
      .sanitize(false)
      .auto_detect_language(true)
      .inline_copy_threshold(4)
      .engine(EngineMode::FallbackOnly)
      .sanitizer(SanitizerBackend::Regex)
      .build();

    assert!(!options.highlight_code);
    assert!(!options.sanitize);
    assert!(options.auto_detect_language);
    assert_eq!(options.inline_copy_threshold, 4);
    assert_eq!(options.engine, EngineMode::FallbackOnly);
    assert_eq!(options.sanitizer, SanitizerBackend::Regex);
  }

  #[test]
  fn capabilities_respect_forced_choices() {
    let options = MarkdownOptionsBuilder::new()
      .engine(EngineMode::FallbackOnly)
      .sanitizer(SanitizerBackend::Regex)
      .build();
    let caps = Capabilities::detect(&options, false);
    assert_eq!(caps.engine, EngineMode::FallbackOnly);
    assert_eq!(caps.sanitizer, SanitizerBackend::Regex);
    assert!(!caps.highlighter);
  }

  #[test]
  fn engine_mode_names() {
    #[derive(Deserialize)]
    struct Wrapper {
      engine: EngineMode,
    }
    let parsed: Wrapper =
      toml::from_str("engine = \"fallback\"").expect("valid engine");
    assert_eq!(parsed.engine, EngineMode::FallbackOnly);
    assert!(toml::from_str::<Wrapper>("engine = \"turbo\"").is_err());
  }
}
