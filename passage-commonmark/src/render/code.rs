//! Code block and inline code renderers.
//!
//! Copy buttons never carry inline handlers. They reference their code
//! element through `data-copy-target`, which a single delegated listener
//! resolves (see [`crate::assets::COPY_SCRIPT`]).
use log::{debug, error};

use super::ids::IdGenerator;
use crate::{
  error::RenderError,
  sanitize::Sanitizer,
  syntax::{SyntaxError, SyntaxManager},
  utils::{capitalize_first, escape_html, sanitize_class_token},
};

/// Inline code spans longer than this many characters get a copy button.
pub const DEFAULT_INLINE_COPY_THRESHOLD: usize = 10;

const COPY_ICON: &str = "<i class=\"far fa-copy\" aria-hidden=\"true\"></i>";

/// Human readable label for a fenced code block language.
///
/// Known codes map to their usual names, unknown ones are capitalized, and a
/// missing language yields `Code`.
#[must_use]
pub fn language_label(language: Option<&str>) -> String {
  let Some(language) = language.map(str::trim).filter(|l| !l.is_empty())
  else {
    return "Code".to_string();
  };

  let known = match language.to_ascii_lowercase().as_str() {
    "js" | "javascript" => "JavaScript",
    "ts" | "typescript" => "TypeScript",
    "py" | "python" => "Python",
    "lua" => "Lua",
    "html" => "HTML",
    "css" => "CSS",
    "json" => "JSON",
    "xml" => "XML",
    "bash" => "Bash",
    "sh" => "Shell",
    "md" | "markdown" => "Markdown",
    "cpp" | "c++" => "C++",
    "c" => "C",
    "java" => "Java",
    "php" => "PHP",
    "ruby" | "rb" => "Ruby",
    "go" => "Go",
    "rust" | "rs" => "Rust",
    "sql" => "SQL",
    "yaml" | "yml" => "YAML",
    "toml" => "TOML",
    "txt" | "text" | "plaintext" => "Text",
    _ => return capitalize_first(language),
  };
  known.to_string()
}

/// Renders code blocks and inline code spans.
#[derive(Debug, Clone, Copy)]
pub struct CodeRenderer<'a> {
  highlighter:           Option<&'a SyntaxManager>,
  sanitizer:             &'a Sanitizer,
  auto_detect:           bool,
  inline_copy_threshold: usize,
}

impl<'a> CodeRenderer<'a> {
  /// Create a renderer. Pass `None` as the highlighter to render every block
  /// as escaped plain text.
  #[must_use]
  pub const fn new(
    highlighter: Option<&'a SyntaxManager>,
    sanitizer: &'a Sanitizer,
  ) -> Self {
    Self {
      highlighter,
      sanitizer,
      auto_detect: false,
      inline_copy_threshold: DEFAULT_INLINE_COPY_THRESHOLD,
    }
  }

  /// Let the highlighter guess the language of blocks without one.
  #[must_use]
  pub const fn auto_detect(mut self, enabled: bool) -> Self {
    self.auto_detect = enabled;
    self
  }

  /// Set the length above which inline code gets a copy button.
  #[must_use]
  pub const fn inline_copy_threshold(mut self, threshold: usize) -> Self {
    self.inline_copy_threshold = threshold;
    self
  }

  /// Highlight `code`, returning sanitized markup, or `None` when the block
  /// should be rendered as escaped text.
  fn highlight(&self, code: &str, language: Option<&str>) -> Option<String> {
    let manager = self.highlighter?;

    let result = match language {
      Some(lang) if manager.recognizes(lang) => manager.highlight_code(code, lang),
      Some(_) => return None,
      None if self.auto_detect => manager.highlight_auto(code),
      None => return None,
    };

    match result {
      // Highlighter output echoes the source and is sanitized like any other
      // untrusted markup
      Ok(html) => Some(self.sanitizer.sanitize(&html)),
      Err(SyntaxError::UnsupportedLanguage(lang)) => {
        debug!("No highlighting for language '{lang}'");
        None
      },
      Err(e) => {
        error!(
          "{}",
          RenderError::HighlightFailure {
            language: language.unwrap_or("auto").to_string(),
            message:  e.to_string(),
          }
        );
        None
      },
    }
  }

  /// Render a fenced code block.
  ///
  /// Empty code still yields a complete wrapper with an empty body.
  pub fn render_code_block(
    &self,
    ids: &mut IdGenerator,
    raw_code: &str,
    language: Option<&str>,
  ) -> String {
    let language = language.map(str::trim).filter(|l| !l.is_empty());
    let label = escape_html(&language_label(language));
    let class_token = language
      .map(sanitize_class_token)
      .filter(|token| !token.is_empty());
    let block_id = ids.next_block_id();

    let (body, highlighted) = match self.highlight(raw_code, language) {
      Some(html) => (html, true),
      None => (escape_html(raw_code), false),
    };

    let class = match (highlighted, class_token) {
      (true, Some(token)) => format!(" class=\"hljs language-{token}\""),
      (true, None) => " class=\"hljs\"".to_string(),
      (false, Some(token)) => format!(" class=\"language-{token}\""),
      (false, None) => String::new(),
    };

    format!(
      "<div class=\"code-block-wrapper\"><div class=\"code-block-header\">\
       <span class=\"code-language\">{label}</span><button type=\"button\" \
       class=\"copy-code-btn\" data-copy-target=\"{block_id}\" \
       aria-label=\"Copy code\">{COPY_ICON}</button></div><pre><code \
       id=\"{block_id}\"{class}>{body}</code></pre></div>"
    )
  }

  /// Render an inline code span. Spans longer than the configured threshold
  /// (in characters) get a copy button.
  pub fn render_inline_code(&self, ids: &mut IdGenerator, raw_code: &str) -> String {
    let escaped = escape_html(raw_code);
    if raw_code.chars().count() <= self.inline_copy_threshold {
      return format!("<code>{escaped}</code>");
    }

    let inline_id = ids.next_inline_id();
    format!(
      "<span class=\"code-inline-wrapper\"><code id=\"{inline_id}\" \
       class=\"inline-code\">{escaped}</code><button type=\"button\" \
       class=\"inline-copy-btn\" data-copy-target=\"{inline_id}\" \
       aria-label=\"Copy code\">{COPY_ICON}</button></span>"
    )
  }
}
