//! Syntect-based syntax highlighting backend.
//!
//! Uses Sublime Text syntax definitions and emits class-annotated spans
//! (`<span class="source js">`) rather than inline colours, so themes live in
//! the stylesheet and the `style` attribute can stay forbidden.

use std::sync::OnceLock;

use syntect::{
  html::{ClassStyle, ClassedHTMLGenerator},
  parsing::{SyntaxReference, SyntaxSet},
  util::LinesWithEndings,
};

use super::{
  error::{SyntaxError, SyntaxResult},
  types::{SyntaxConfig, SyntaxHighlighter, SyntaxManager},
};

/// Syntect-based syntax highlighter
#[derive(Debug, Default, Clone, Copy)]
pub struct SyntectHighlighter;

impl SyntectHighlighter {
  /// Get the syntect `SyntaxSet`.
  fn syntax_set() -> &'static SyntaxSet {
    static SYNTAX_SET: OnceLock<SyntaxSet> = OnceLock::new();
    SYNTAX_SET.get_or_init(SyntaxSet::load_defaults_newlines)
  }

  fn render(syntax: &SyntaxReference, code: &str) -> SyntaxResult<String> {
    let syntax_set = Self::syntax_set();
    let mut generator = ClassedHTMLGenerator::new_with_class_style(
      syntax,
      syntax_set,
      ClassStyle::Spaced,
    );

    for line in LinesWithEndings::from(code) {
      generator
        .parse_html_for_line_which_includes_newline(line)
        .map_err(|e| SyntaxError::HighlightingFailed(e.to_string()))?;
    }

    Ok(generator.finalize())
  }
}

impl SyntaxHighlighter for SyntectHighlighter {
  fn name(&self) -> &'static str {
    "Syntect"
  }

  fn supported_languages(&self) -> Vec<String> {
    Self::syntax_set()
      .syntaxes()
      .iter()
      .flat_map(|syntax| {
        std::iter::once(syntax.name.to_lowercase())
          .chain(syntax.file_extensions.iter().map(|ext| ext.to_lowercase()))
      })
      .collect()
  }

  fn supports_language(&self, language: &str) -> bool {
    Self::syntax_set().find_syntax_by_token(language).is_some()
  }

  fn highlight(&self, code: &str, language: &str) -> SyntaxResult<String> {
    let syntax = Self::syntax_set()
      .find_syntax_by_token(language)
      .ok_or_else(|| SyntaxError::UnsupportedLanguage(language.to_string()))?;

    Self::render(syntax, code)
  }

  fn highlight_auto(&self, code: &str) -> SyntaxResult<String> {
    let first_line = code.lines().next().unwrap_or_default();
    let syntax = Self::syntax_set()
      .find_syntax_by_first_line(first_line)
      .ok_or_else(|| SyntaxError::UnsupportedLanguage("auto".to_string()))?;

    Self::render(syntax, code)
  }
}

/// Create a Syntect-based syntax manager with configuration
///
/// # Errors
///
/// Currently infallible; the signature matches the other constructors.
pub fn create_syntect_manager() -> SyntaxResult<SyntaxManager> {
  Ok(SyntaxManager::new(
    Box::new(SyntectHighlighter),
    SyntaxConfig::default(),
  ))
}
