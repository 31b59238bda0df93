//! Core types and traits for syntax highlighting.

use std::collections::HashMap;

use super::error::{SyntaxError, SyntaxResult};

/// Trait for syntax highlighting backends.
///
/// Implementations return HTML that marks tokens up with `class` attributes
/// only. The output echoes the source text and is sanitized again by the
/// code block renderer, so backends must not rely on inline styles.
pub trait SyntaxHighlighter: Send + Sync {
  /// Get the name of this highlighter backend
  fn name(&self) -> &'static str;

  /// Get a list of supported languages
  fn supported_languages(&self) -> Vec<String>;

  /// Check if a language is supported
  fn supports_language(&self, language: &str) -> bool {
    self
      .supported_languages()
      .iter()
      .any(|lang| lang.eq_ignore_ascii_case(language))
  }

  /// Highlight code in the given language (case-insensitive).
  ///
  /// # Errors
  ///
  /// Returns [`SyntaxError::UnsupportedLanguage`] for unknown languages and
  /// [`SyntaxError::HighlightingFailed`] if the backend fails mid-way.
  fn highlight(&self, code: &str, language: &str) -> SyntaxResult<String>;

  /// Guess the language from the code itself and highlight it.
  ///
  /// # Errors
  ///
  /// Returns [`SyntaxError::UnsupportedLanguage`] if no language could be
  /// detected.
  fn highlight_auto(&self, code: &str) -> SyntaxResult<String>;
}

/// Configuration for syntax highlighting
#[derive(Debug, Clone)]
pub struct SyntaxConfig {
  /// Language aliases for mapping common names to supported languages
  pub language_aliases: HashMap<String, String>,
}

impl Default for SyntaxConfig {
  fn default() -> Self {
    let mut language_aliases = HashMap::new();

    // Common aliases
    language_aliases.insert("js".to_string(), "javascript".to_string());
    language_aliases.insert("ts".to_string(), "typescript".to_string());
    language_aliases.insert("py".to_string(), "python".to_string());
    language_aliases.insert("rb".to_string(), "ruby".to_string());
    language_aliases.insert("sh".to_string(), "bash".to_string());
    language_aliases.insert("shell".to_string(), "bash".to_string());
    language_aliases.insert("yml".to_string(), "yaml".to_string());
    language_aliases.insert("md".to_string(), "markdown".to_string());
    language_aliases.insert("cpp".to_string(), "c++".to_string());

    Self { language_aliases }
  }
}

/// High-level syntax highlighting manager.
///
/// Resolves aliases before handing code to the backend.
pub struct SyntaxManager {
  highlighter: Box<dyn SyntaxHighlighter>,
  config:      SyntaxConfig,
}

impl std::fmt::Debug for SyntaxManager {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("SyntaxManager")
      .field("highlighter", &self.highlighter.name())
      .field("config", &self.config)
      .finish()
  }
}

impl SyntaxManager {
  /// Create a new syntax manager with the given highlighter and config
  #[must_use]
  pub fn new(
    highlighter: Box<dyn SyntaxHighlighter>,
    config: SyntaxConfig,
  ) -> Self {
    Self {
      highlighter,
      config,
    }
  }

  /// Create a new syntax manager with the default configuration
  #[must_use]
  pub fn with_highlighter(highlighter: Box<dyn SyntaxHighlighter>) -> Self {
    Self::new(highlighter, SyntaxConfig::default())
  }

  /// Get the underlying highlighter
  #[must_use]
  pub fn highlighter(&self) -> &dyn SyntaxHighlighter {
    self.highlighter.as_ref()
  }

  /// Get the configuration
  #[must_use]
  pub const fn config(&self) -> &SyntaxConfig {
    &self.config
  }

  /// Resolve a language name using aliases
  #[must_use]
  pub fn resolve_language(&self, language: &str) -> String {
    let lower = language.to_ascii_lowercase();
    self
      .config
      .language_aliases
      .get(&lower)
      .cloned()
      .unwrap_or(lower)
  }

  /// Whether the backend recognizes `language` after alias resolution.
  #[must_use]
  pub fn recognizes(&self, language: &str) -> bool {
    self
      .highlighter
      .supports_language(&self.resolve_language(language))
  }

  /// Highlight code after alias resolution. Unknown languages are an error
  /// rather than a plain-text rendering; the caller decides how to fall back.
  ///
  /// # Errors
  ///
  /// Returns [`SyntaxError::UnsupportedLanguage`] if the backend does not know
  /// the language, or whatever error the backend reports.
  pub fn highlight_code(
    &self,
    code: &str,
    language: &str,
  ) -> SyntaxResult<String> {
    let resolved_language = self.resolve_language(language);

    if self.highlighter.supports_language(&resolved_language) {
      return self.highlighter.highlight(code, &resolved_language);
    }

    Err(SyntaxError::UnsupportedLanguage(resolved_language))
  }

  /// Highlight code with automatic language detection.
  ///
  /// # Errors
  ///
  /// Returns an error if no language could be detected.
  pub fn highlight_auto(&self, code: &str) -> SyntaxResult<String> {
    self.highlighter.highlight_auto(code)
  }
}
