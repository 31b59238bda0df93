//! Core implementation of the Markdown processor.
//!
//! This module contains the main implementation of `MarkdownProcessor` and its
//! methods, focused on the core rendering pipeline and configuration
//! management.
use std::sync::Arc;

use comrak::{Arena, options::Options, parse_document};
use log::{debug, trace, warn};

use super::{
  fallback::FallbackRenderer,
  process::process_with_recovery,
  transform::{HeadingTransformer, NodeTransformer},
  types::{
    AstTransformer,
    Capabilities,
    EngineMode,
    MarkdownOptions,
    MarkdownProcessor,
    RenderOptions,
  },
};
use crate::{
  error::RenderError,
  render::CodeRenderer,
  sanitize::{Sanitizer, SanitizerBackend},
  syntax::{SyntaxManager, create_default_manager},
  types::MarkdownResult,
};

impl Default for MarkdownProcessor {
  fn default() -> Self {
    Self::new(MarkdownOptions::default())
  }
}

impl MarkdownProcessor {
  /// Create a new `MarkdownProcessor` with the given options.
  ///
  /// Backend availability is checked here, once; rendering never probes for
  /// backends again.
  #[must_use]
  pub fn new(options: MarkdownOptions) -> Self {
    let syntax_manager = if options.highlight_code {
      match create_default_manager() {
        Ok(manager) => Some(Arc::new(manager)),
        Err(e) => {
          warn!("{e}; code blocks will not be highlighted");
          None
        },
      }
    } else {
      None
    };

    let capabilities = Capabilities::detect(&options, syntax_manager.is_some());
    if options.sanitizer == SanitizerBackend::Ammonia
      && capabilities.sanitizer == SanitizerBackend::Regex
    {
      warn!("{}", RenderError::EngineUnavailable("ammonia"));
    }

    let sanitizer = Sanitizer::with_override(&options.sanitize_override)
      .with_backend(capabilities.sanitizer);

    debug!("Markdown processor capabilities: {capabilities:?}");

    Self {
      options,
      capabilities,
      syntax_manager,
      sanitizer,
    }
  }

  /// Use a specific syntax highlighting manager instead of the default one.
  #[must_use]
  pub fn with_syntax_manager(mut self, manager: SyntaxManager) -> Self {
    self.syntax_manager = Some(Arc::new(manager));
    self.capabilities.highlighter = true;
    self
  }

  /// Access processor options.
  #[must_use]
  pub const fn options(&self) -> &MarkdownOptions {
    &self.options
  }

  /// What this processor resolved to at construction.
  #[must_use]
  pub const fn capabilities(&self) -> Capabilities {
    self.capabilities
  }

  /// The sanitizer applied to rendered output.
  #[must_use]
  pub const fn sanitizer(&self) -> &Sanitizer {
    &self.sanitizer
  }

  /// Render Markdown to HTML using the processor's own options.
  #[must_use]
  pub fn render(&self, markdown: &str) -> MarkdownResult {
    self.render_with(markdown, self.options.render_options())
  }

  /// Render Markdown to HTML with per-call switches.
  ///
  /// Never fails: engine errors and panics fall back to the text
  /// substitution renderer, and blank input yields an empty result.
  #[must_use]
  pub fn render_with(
    &self,
    markdown: &str,
    render_options: RenderOptions,
  ) -> MarkdownResult {
    if markdown.trim().is_empty() {
      return MarkdownResult::empty(self.capabilities.engine);
    }

    match self.capabilities.engine {
      EngineMode::Full => {
        process_with_recovery(self, markdown, render_options)
      },
      EngineMode::FallbackOnly => {
        debug!("Engine forced to fallback, skipping comrak");
        self.render_fallback(markdown)
      },
    }
  }

  /// Render with the text substitution renderer. Output is always sanitized.
  #[must_use]
  pub fn render_fallback(&self, markdown: &str) -> MarkdownResult {
    let output = FallbackRenderer::new(&self.sanitizer)
      .inline_copy_threshold(self.options.inline_copy_threshold)
      .render(markdown);
    let title = output
      .headers
      .iter()
      .find(|h| h.level == 1)
      .map(|h| h.text.clone());

    MarkdownResult {
      html: output.html.html,
      headers: output.headers,
      title,
      engine: EngineMode::FallbackOnly,
      sanitizer: Some(output.html.backend),
    }
  }

  /// Render with comrak and the custom renderers.
  ///
  /// # Errors
  ///
  /// Returns [`RenderError::ParseFailure`] if comrak fails to format the
  /// document.
  pub fn render_full(
    &self,
    markdown: &str,
    render_options: RenderOptions,
  ) -> Result<MarkdownResult, RenderError> {
    let arena = Arena::new();
    let options = Self::comrak_options();
    let root = parse_document(&arena, markdown, &options);

    let headings = HeadingTransformer::new();
    headings.transform(root)?;
    trace!("Heading pass complete");

    let highlighter = if render_options.highlight_code {
      self.syntax_manager.as_deref()
    } else {
      None
    };
    let code = CodeRenderer::new(highlighter, &self.sanitizer)
      .auto_detect(self.options.auto_detect_language)
      .inline_copy_threshold(self.options.inline_copy_threshold);
    NodeTransformer::new(code, &options).transform(root)?;
    trace!("Node pass complete");

    let mut html = String::new();
    comrak::format_html(root, &options, &mut html)
      .map_err(|e| RenderError::ParseFailure(e.to_string()))?;

    let (html, sanitizer) = if render_options.sanitize {
      let sanitized = self.sanitizer.clean(&html);
      (sanitized.html, Some(sanitized.backend))
    } else {
      (html, None)
    };

    let headers = headings.into_headers();
    let title = headers
      .iter()
      .find(|h| h.level == 1)
      .map(|h| h.text.clone());

    Ok(MarkdownResult {
      html,
      headers,
      title,
      engine: EngineMode::Full,
      sanitizer,
    })
  }

  /// GitHub flavored options: tables, strikethrough, autolinks, footnotes,
  /// smart punctuation and newlines as `<br>`. Raw HTML is passed through to
  /// the sanitizer rather than dropped by comrak.
  fn comrak_options() -> Options<'static> {
    let mut options = Options::default();
    options.extension.table = true;
    options.extension.strikethrough = true;
    options.extension.autolink = true;
    options.extension.footnotes = true;
    options.parse.smart = true;
    options.render.hardbreaks = true;
    options.render.r#unsafe = true;
    options
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::sanitize::SanitizeOverride;

  fn plain() -> MarkdownProcessor {
    MarkdownProcessor::new(MarkdownOptions {
      highlight_code: false,
      ..MarkdownOptions::default()
    })
  }

  #[test]
  fn blank_input_is_empty() {
    let result = plain().render("   \n\n");
    assert!(result.html.is_empty());
    assert!(result.headers.is_empty());
    assert!(result.title.is_none());
  }

  #[test]
  fn headings_and_title() {
    let result = plain().render("# Main Title\n\n## Sub `code`\n\n## Sub `code`");
    assert_eq!(result.title.as_deref(), Some("Main Title"));
    let ids: Vec<_> = result.headers.iter().map(|h| h.id.as_str()).collect();
    assert_eq!(ids, ["main-title", "sub-code", "sub-code-1"]);
    assert!(result.html.contains("<h2 id=\"sub-code-1\">Sub code<a"));
  }

  #[test]
  fn hard_breaks_and_smart_punctuation() {
    let result = plain().render("line one\nline two -- \"quoted\"");
    assert!(result.html.contains("line one<br>"));
    assert!(result.html.contains('\u{2013}'));
    assert!(result.html.contains('\u{201c}'));
  }

  #[test]
  fn autolinks_are_external() {
    let result = plain().render("see https://example.com now");
    assert!(result.html.contains(
      "<a href=\"https://example.com\" target=\"_blank\" rel=\"noopener \
       noreferrer\">https://example.com</a>"
    ));
  }

  #[test]
  fn links_keep_inner_markup() {
    let result = plain().render("[**bold** and `code`](/docs)");
    assert!(result.html.contains(
      "<a href=\"/docs\"><strong>bold</strong> and <code>code</code></a>"
    ));
  }

  #[test]
  fn images_are_wrapped() {
    let result = plain().render("![A cat](cat.png \"Cat\")");
    assert!(result.html.contains(
      "<span class=\"image-container\"><img src=\"cat.png\" alt=\"A cat\" \
       title=\"Cat\" loading=\"lazy\"><span class=\"image-caption\">A \
       cat</span></span>"
    ));
  }

  #[test]
  fn tables_are_wrapped_with_alignment() {
    let result = plain().render("| a | b |\n|:--|--:|\n| 1 | 2 |");
    let html = &result.html;
    assert!(html.contains("<div class=\"table-container\"><table>"));
    assert!(html.contains("<th align=\"left\">a</th>"));
    assert!(html.contains("<td align=\"right\">2</td>"));
    assert_eq!(html.matches("<thead>").count(), 1);
    assert_eq!(html.matches("<tbody>").count(), 1);
  }

  #[test]
  fn blockquotes_are_wrapped() {
    let result = plain().render("> quoted *text*");
    assert!(result.html.contains(
      "<blockquote><div class=\"quote-content\"><p>quoted \
       <em>text</em></p>\n</div></blockquote>"
    ));
  }

  #[test]
  fn unsanitized_output_is_available() {
    let result = plain().render_with("<u>raw</u>", RenderOptions {
      highlight_code: false,
      sanitize:       false,
    });
    assert!(result.sanitizer.is_none());
    assert!(result.html.contains("<u>raw</u>"));
  }

  #[test]
  fn forced_fallback_engine() {
    let processor = MarkdownProcessor::new(MarkdownOptions {
      engine: EngineMode::FallbackOnly,
      ..MarkdownOptions::default()
    });
    let result = processor.render("# Hi\n\n[x](javascript:alert(1))");
    assert_eq!(result.engine, EngineMode::FallbackOnly);
    assert_eq!(result.title.as_deref(), Some("Hi"));
    assert!(!result.html.contains("javascript:"));
  }

  #[test]
  fn sanitizer_override_applies() {
    let processor = MarkdownProcessor::new(MarkdownOptions {
      highlight_code: false,
      sanitize_override: SanitizeOverride {
        allowed_tags: Some(["p".to_string()].into_iter().collect()),
        ..SanitizeOverride::default()
      },
      ..MarkdownOptions::default()
    });
    let result = processor.render("hello *world*");
    if result.sanitizer == Some(SanitizerBackend::Ammonia) {
      assert_eq!(result.html, "<p>hello world</p>\n");
    }
  }
}
