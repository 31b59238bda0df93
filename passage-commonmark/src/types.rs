//! Types for the passage-commonmark public API.
use serde::{Deserialize, Serialize};

use crate::{processor::EngineMode, sanitize::SanitizerBackend};

/// Represents a header in a Markdown document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Header {
  /// Header text (inline content, no markdown formatting).
  pub text:  String,
  /// Header level (1-6).
  pub level: u8,
  /// Unique anchor ID for the header.
  pub id:    String,
}

/// Result of Markdown processing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MarkdownResult {
  /// Rendered HTML output.
  pub html: String,

  /// Extracted headers (for `ToC`, navigation, etc).
  pub headers: Vec<Header>,

  /// Title of the document, if found (the first H1).
  pub title: Option<String>,

  /// Which renderer produced the output.
  pub engine: EngineMode,

  /// Which sanitizer ran, `None` if sanitizing was disabled.
  pub sanitizer: Option<SanitizerBackend>,
}

impl MarkdownResult {
  /// Result for a document with no content.
  #[must_use]
  pub const fn empty(engine: EngineMode) -> Self {
    Self {
      html: String::new(),
      headers: Vec::new(),
      title: None,
      engine,
      sanitizer: None,
    }
  }
}
