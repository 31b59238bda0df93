//! # passage-commonmark - Markdown to safe HTML
//!
//! Renders untrusted Markdown into HTML that can be inserted into a page as
//! is. Rendering goes through `comrak` with custom renderers for headings,
//! code, links, images, tables and blockquotes, and the result is filtered
//! against a tag and attribute allow-list.
//!
//! ## Quick Start
//!
//! ```rust
//! use passage_commonmark::{RenderOptions, render_markdown};
//!
//! let html = render_markdown("# Hello\n\n[x](javascript:alert(1))", RenderOptions::default());
//! assert!(html.contains("<h1 id=\"hello\">"));
//! assert!(!html.contains("javascript:"));
//! ```
//!
//! ## Features
//!
//! - **Custom renderers** with copy buttons wired through `data-copy-target`,
//!   never inline handlers
//! - **Sanitization** with `ammonia`, or a regex filter when it is unavailable
//! - **Syntax highlighting** with `syntect`, emitting CSS classes
//! - **Error recovery**: any engine failure degrades to a text-substitution
//!   renderer instead of an error
//!
//! ## Configuration
//!
//! ```rust
//! use passage_commonmark::{MarkdownOptions, MarkdownProcessor};
//!
//! let mut options = MarkdownOptions::default();
//! options.highlight_code = false;
//! options.inline_copy_threshold = 20;
//!
//! let processor = MarkdownProcessor::new(options);
//! let result = processor.render("# Title\n\nSome `code`.");
//! assert_eq!(result.title.as_deref(), Some("Title"));
//! ```
use std::{fmt::Display, sync::LazyLock};

pub mod assets;
pub mod config;
pub mod error;
pub mod processor;
pub mod render;
pub mod sanitize;
pub mod syntax;
mod types;
pub mod url;
pub mod utils;

pub use crate::{
  config::RenderConfig,
  error::{ConfigError, RenderError},
  processor::{
    AstTransformer,
    Capabilities,
    EngineMode,
    MarkdownOptions,
    MarkdownOptionsBuilder,
    MarkdownProcessor,
    RenderOptions,
    render_fallback,
  },
  sanitize::{SanitizeConfig, SanitizeOverride, Sanitized, Sanitizer, SanitizerBackend},
  types::{Header, MarkdownResult},
  url::{UrlKind, classify_url, is_dangerous_url},
};

static DEFAULT_PROCESSOR: LazyLock<MarkdownProcessor> =
  LazyLock::new(MarkdownProcessor::default);

/// Render Markdown to sanitized HTML with the default processor.
///
/// Never fails. Blank input yields an empty string.
#[must_use]
pub fn render_markdown(markdown: &str, options: RenderOptions) -> String {
  DEFAULT_PROCESSOR.render_with(markdown, options).html
}

/// Sanitize `html` against the default allow-lists, with `over` merged on
/// top. Never fails.
#[must_use]
pub fn sanitize(html: &str, over: &SanitizeOverride) -> String {
  sanitize::sanitize(html, over)
}

/// HTML-escape the display form of any value.
#[must_use]
pub fn escape<T: Display + ?Sized>(value: &T) -> String {
  utils::escape_html(&value.to_string())
}
