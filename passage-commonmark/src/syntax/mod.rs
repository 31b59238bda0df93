//! Provides a trait-based architecture for syntax highlighting that allows
//! backends to be plugged in.
//! Currently supported backends:
//! - **Syntect** - Uses Sublime Text syntax definitions, emitting CSS classes

pub mod error;
pub mod types;

// Re-export commonly used types
pub use error::{SyntaxError, SyntaxResult};
pub use types::{SyntaxConfig, SyntaxHighlighter, SyntaxManager};

// Syntect backend implementation
#[cfg(feature = "syntect")] mod syntect_backend;
#[cfg(feature = "syntect")]
pub use self::syntect_backend::{SyntectHighlighter, create_syntect_manager};

/// Create the default syntax manager based on available features.
///
/// # Errors
///
/// Returns [`SyntaxError::NoBackendAvailable`] when no backend feature is
/// enabled, or an error if backend initialization fails.
pub fn create_default_manager() -> SyntaxResult<SyntaxManager> {
  #[cfg(feature = "syntect")]
  {
    create_syntect_manager()
  }

  #[cfg(not(feature = "syntect"))]
  {
    Err(SyntaxError::NoBackendAvailable)
  }
}

#[cfg(test)]
mod tests {
  use super::{types::*, *};

  /// Highlighter that knows one language and wraps everything in a span.
  struct FakeHighlighter;

  impl SyntaxHighlighter for FakeHighlighter {
    fn name(&self) -> &'static str {
      "Fake"
    }

    fn supported_languages(&self) -> Vec<String> {
      vec!["javascript".to_string()]
    }

    fn highlight(&self, code: &str, _language: &str) -> SyntaxResult<String> {
      Ok(format!("<span class=\"hl\">{code}</span>"))
    }

    fn highlight_auto(&self, _code: &str) -> SyntaxResult<String> {
      Err(SyntaxError::UnsupportedLanguage("auto".to_string()))
    }
  }

  #[test]
  fn test_syntax_config_default() {
    let config = SyntaxConfig::default();
    assert!(config.language_aliases.contains_key("js"));
    assert_eq!(config.language_aliases["js"], "javascript");
  }

  #[test]
  fn test_alias_resolution_is_case_insensitive() {
    let manager = SyntaxManager::with_highlighter(Box::new(FakeHighlighter));
    assert_eq!(manager.resolve_language("JS"), "javascript");
    assert_eq!(manager.resolve_language("Rust"), "rust");
    assert!(manager.recognizes("js"));
    assert!(!manager.recognizes("cobol"));
  }

  #[test]
  fn test_unknown_language_is_an_error() {
    let manager = SyntaxManager::with_highlighter(Box::new(FakeHighlighter));
    let result = manager.highlight_code("x", "cobol");
    assert!(matches!(result, Err(SyntaxError::UnsupportedLanguage(l)) if l == "cobol"));
    assert_eq!(
      manager.highlight_code("x", "js").expect("known language"),
      "<span class=\"hl\">x</span>"
    );
  }

  #[cfg(feature = "syntect")]
  #[test]
  fn test_syntect_highlighter() {
    let highlighter = SyntectHighlighter;
    assert_eq!(highlighter.name(), "Syntect");
    assert!(!highlighter.supported_languages().is_empty());
    assert!(highlighter.supports_language("rust"));
    assert!(highlighter.supports_language("js"));
  }

  #[cfg(feature = "syntect")]
  #[test]
  fn test_syntect_highlight_uses_classes() {
    let highlighter = SyntectHighlighter;
    let html = highlighter
      .highlight("fn main() { let x = 1 < 2; }", "rust")
      .expect("Failed to highlight code");
    assert!(html.contains("main"));
    assert!(html.contains("class=\""));
    assert!(!html.contains("style="));
    assert!(html.contains("&lt;"));
  }

  #[cfg(feature = "syntect")]
  #[test]
  fn test_syntax_manager() {
    let manager =
      create_default_manager().expect("Failed to create default syntax manager");
    assert!(!manager.highlighter().supported_languages().is_empty());
    assert!(manager.recognizes("js"));
    assert!(manager.recognizes("python"));
  }

  #[cfg(feature = "syntect")]
  #[test]
  fn test_auto_detection_from_shebang() {
    let manager =
      create_default_manager().expect("Failed to create default syntax manager");
    let html = manager
      .highlight_auto("#!/usr/bin/env python\nprint('hi')\n")
      .expect("shebang should be detected");
    assert!(html.contains("print"));
  }

  #[cfg(not(feature = "syntect"))]
  #[test]
  fn test_no_backend() {
    assert!(matches!(
      create_default_manager(),
      Err(SyntaxError::NoBackendAvailable)
    ));
  }
}
