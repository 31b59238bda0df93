//! Text-substitution Markdown renderer.
//!
//! Used when the full engine is disabled or fails on a document. It covers
//! headings, emphasis, fenced and inline code, links, images, unordered
//! lists, blockquotes, horizontal rules and paragraphs, applied in a fixed
//! order on the raw source:
//!
//! 1. fenced code blocks
//! 2. inline code
//! 3. images, then links
//! 4. escaping of everything that is left
//! 5. emphasis
//! 6. line-based block constructs
//!
//! Rendered code, images and links are parked behind private-use
//! placeholders between steps so later rules never see their markup. The
//! result is always sanitized.
use std::sync::LazyLock;

use log::warn;
use regex::{Captures, Regex};

use crate::{
  render::{
    CodeRenderer,
    DEFAULT_INLINE_COPY_THRESHOLD,
    HeadingSlugs,
    IdGenerator,
    render_blockquote,
    render_heading_html,
    render_image,
    render_link,
  },
  sanitize::{Sanitized, Sanitizer, default_sanitizer},
  types::Header,
  utils::{compile_or_never, escape_html, strip_private_use},
};

const INLINE_MARK: char = '\u{e000}';
const BLOCK_MARK: char = '\u{e001}';

static CODE_FENCE_RE: LazyLock<Regex> = LazyLock::new(|| {
  compile_or_never(
    "CODE_FENCE_RE",
    r"(?ms)^```[ \t]*([^\s`]*)[^\n]*\n(.*?)^```[ \t]*$",
  )
});

static INLINE_CODE_RE: LazyLock<Regex> =
  LazyLock::new(|| compile_or_never("INLINE_CODE_RE", r"`([^`\n]+)`"));

static IMAGE_RE: LazyLock<Regex> = LazyLock::new(|| {
  compile_or_never(
    "IMAGE_RE",
    r#"!\[([^\]\n]*)\]\(\s*([^)\s]+)(?:\s+"([^"\n]*)")?\s*\)"#,
  )
});

static LINK_RE: LazyLock<Regex> = LazyLock::new(|| {
  compile_or_never(
    "LINK_RE",
    r#"\[([^\]\n]+)\]\(\s*([^)\s]+)(?:\s+"([^"\n]*)")?\s*\)"#,
  )
});

static STRONG_STAR_RE: LazyLock<Regex> = LazyLock::new(|| {
  compile_or_never("STRONG_STAR_RE", r"\*\*([^*\s](?:[^*\n]*[^*\s])?)\*\*")
});

static STRONG_UNDERSCORE_RE: LazyLock<Regex> = LazyLock::new(|| {
  compile_or_never("STRONG_UNDERSCORE_RE", r"__([^_\s](?:[^_\n]*[^_\s])?)__")
});

static EM_STAR_RE: LazyLock<Regex> = LazyLock::new(|| {
  compile_or_never("EM_STAR_RE", r"\*([^*\s](?:[^*\n]*[^*\s])?)\*")
});

/// Word boundaries keep `snake_case_names` intact.
static EM_UNDERSCORE_RE: LazyLock<Regex> = LazyLock::new(|| {
  compile_or_never("EM_UNDERSCORE_RE", r"\b_([^_\s](?:[^_\n]*[^_\s])?)_\b")
});

static HEADING_RE: LazyLock<Regex> = LazyLock::new(|| {
  compile_or_never("HEADING_RE", r"^(#{1,6})[ \t]+(.*?)(?:[ \t]+#+)?[ \t]*$")
});

static RULE_RE: LazyLock<Regex> = LazyLock::new(|| {
  compile_or_never("RULE_RE", r"^(?:(?:\*[ \t]*){3,}|(?:-[ \t]*){3,}|(?:_[ \t]*){3,})$")
});

static LIST_ITEM_RE: LazyLock<Regex> =
  LazyLock::new(|| compile_or_never("LIST_ITEM_RE", r"^[ \t]*[*+-][ \t]+(.*)$"));

/// Quote markers have already been escaped by the time lines are examined.
static QUOTE_RE: LazyLock<Regex> =
  LazyLock::new(|| compile_or_never("QUOTE_RE", r"^[ \t]*&gt;[ \t]?(.*)$"));

static PLACEHOLDER_RE: LazyLock<Regex> = LazyLock::new(|| {
  compile_or_never("PLACEHOLDER_RE", "[\u{e000}\u{e001}]([0-9]+)[\u{e000}\u{e001}]")
});

static BLOCK_LINE_RE: LazyLock<Regex> = LazyLock::new(|| {
  compile_or_never("BLOCK_LINE_RE", "^\u{e001}[0-9]+\u{e001}$")
});

static TAG_RE: LazyLock<Regex> =
  LazyLock::new(|| compile_or_never("TAG_RE", r"<[^>]*>"));

/// Rendered fragments parked behind placeholders.
#[derive(Debug, Default)]
struct Stash {
  items: Vec<String>,
}

impl Stash {
  fn park(&mut self, html: String, mark: char) -> String {
    let index = self.items.len();
    self.items.push(html);
    format!("{mark}{index}{mark}")
  }

  fn inline(&mut self, html: String) -> String {
    self.park(html, INLINE_MARK)
  }

  /// Block fragments get a line of their own so they are never wrapped in
  /// a paragraph.
  fn block(&mut self, html: String) -> String {
    format!("\n{}\n", self.park(html, BLOCK_MARK))
  }

  fn restore(&self, text: &str) -> String {
    PLACEHOLDER_RE
      .replace_all(text, |caps: &Captures| {
        caps[1]
          .parse::<usize>()
          .ok()
          .and_then(|i| self.items.get(i))
          .cloned()
          .unwrap_or_default()
      })
      .into_owned()
  }
}

/// Visible text of an HTML fragment.
fn plain_text(html: &str) -> String {
  let stripped = TAG_RE.replace_all(html, "");
  html_escape::decode_html_entities(&stripped).trim().to_string()
}

/// Accumulates line-based block constructs.
#[derive(Debug, Default)]
struct Blocks {
  out:       String,
  paragraph: Vec<String>,
  list:      Vec<String>,
  quote:     Vec<String>,
}

impl Blocks {
  fn flush_paragraph(&mut self) {
    if !self.paragraph.is_empty() {
      self.out.push_str(&format!("<p>{}</p>\n", self.paragraph.join("<br>\n")));
      self.paragraph.clear();
    }
  }

  fn flush_list(&mut self) {
    if !self.list.is_empty() {
      self.out.push_str("<ul>\n");
      for item in self.list.drain(..) {
        self.out.push_str(&format!("<li>{item}</li>\n"));
      }
      self.out.push_str("</ul>\n");
    }
  }

  fn flush_quote(&mut self) {
    if !self.quote.is_empty() {
      let inner = format!("<p>{}</p>", self.quote.join("<br>\n"));
      self.out.push_str(&render_blockquote(&inner));
      self.out.push('\n');
      self.quote.clear();
    }
  }

  fn flush(&mut self) {
    self.flush_paragraph();
    self.flush_list();
    self.flush_quote();
  }

  fn push_raw(&mut self, html: &str) {
    self.flush();
    self.out.push_str(html);
    self.out.push('\n');
  }
}

/// Output of the fallback renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallbackOutput {
  pub html:    Sanitized,
  pub headers: Vec<Header>,
}

/// Renders Markdown by direct text substitution.
#[derive(Debug, Clone, Copy)]
pub struct FallbackRenderer<'a> {
  sanitizer:             &'a Sanitizer,
  inline_copy_threshold: usize,
}

impl<'a> FallbackRenderer<'a> {
  #[must_use]
  pub const fn new(sanitizer: &'a Sanitizer) -> Self {
    Self {
      sanitizer,
      inline_copy_threshold: DEFAULT_INLINE_COPY_THRESHOLD,
    }
  }

  /// Set the length above which inline code gets a copy button.
  #[must_use]
  pub const fn inline_copy_threshold(mut self, threshold: usize) -> Self {
    self.inline_copy_threshold = threshold;
    self
  }

  /// Render `markdown` to sanitized HTML, collecting its headings.
  #[must_use]
  pub fn render(&self, markdown: &str) -> FallbackOutput {
    warn!("Rendering {} bytes with the fallback renderer", markdown.len());

    let text = strip_private_use(markdown).replace("\r\n", "\n");
    let code = CodeRenderer::new(None, self.sanitizer)
      .inline_copy_threshold(self.inline_copy_threshold);
    let mut ids = IdGenerator::new();
    let mut stash = Stash::default();

    let text = CODE_FENCE_RE.replace_all(&text, |caps: &Captures| {
      let language = caps.get(1).map(|m| m.as_str()).filter(|l| !l.is_empty());
      let body = caps[2].strip_suffix('\n').unwrap_or(&caps[2]);
      stash.block(code.render_code_block(&mut ids, body, language))
    });

    let text = INLINE_CODE_RE.replace_all(&text, |caps: &Captures| {
      stash.inline(code.render_inline_code(&mut ids, &caps[1]))
    });

    let text = IMAGE_RE.replace_all(&text, |caps: &Captures| {
      let alt = plain_text(&stash.restore(&caps[1]));
      let title = caps.get(3).map_or("", |m| m.as_str());
      stash.inline(render_image(&caps[2], &alt, title))
    });

    let text = LINK_RE.replace_all(&text, |caps: &Captures| {
      let inner = stash.restore(&escape_html(&caps[1]));
      let title = caps.get(3).map_or("", |m| m.as_str());
      stash.inline(render_link(&caps[2], title, &inner))
    });

    let text = escape_html(&text);
    let text = STRONG_STAR_RE.replace_all(&text, "<strong>$1</strong>");
    let text = STRONG_UNDERSCORE_RE.replace_all(&text, "<strong>$1</strong>");
    let text = EM_STAR_RE.replace_all(&text, "<em>$1</em>");
    let text = EM_UNDERSCORE_RE.replace_all(&text, "<em>$1</em>");

    let (html, headers) = Self::render_blocks(&text, &stash);
    let html = stash.restore(&html);

    FallbackOutput {
      html: self.sanitizer.clean(&html),
      headers,
    }
  }

  fn render_blocks(text: &str, stash: &Stash) -> (String, Vec<Header>) {
    let mut blocks = Blocks::default();
    let mut slugs = HeadingSlugs::new();
    let mut headers = Vec::new();

    for line in text.lines() {
      let trimmed = line.trim();

      if trimmed.is_empty() {
        blocks.flush();
      } else if BLOCK_LINE_RE.is_match(trimmed) {
        blocks.push_raw(trimmed);
      } else if let Some(caps) = HEADING_RE.captures(trimmed) {
        #[allow(
          clippy::cast_possible_truncation,
          reason = "The pattern allows at most six hashes"
        )]
        let level = caps[1].len() as u8;
        let inner = caps[2].trim();
        let heading_text = plain_text(&stash.restore(inner));
        let id = slugs.unique(&heading_text);
        blocks.push_raw(&render_heading_html(level, inner, &id));
        headers.push(Header {
          text: heading_text,
          level,
          id,
        });
      } else if RULE_RE.is_match(trimmed) {
        blocks.push_raw("<hr>");
      } else if let Some(caps) = LIST_ITEM_RE.captures(line) {
        blocks.flush_paragraph();
        blocks.flush_quote();
        blocks.list.push(caps[1].trim().to_string());
      } else if let Some(caps) = QUOTE_RE.captures(line) {
        blocks.flush_paragraph();
        blocks.flush_list();
        blocks.quote.push(caps[1].trim().to_string());
      } else {
        blocks.flush_list();
        blocks.flush_quote();
        blocks.paragraph.push(trimmed.to_string());
      }
    }
    blocks.flush();

    (blocks.out, headers)
  }
}

/// Render `markdown` with the fallback renderer and the default sanitizer.
#[must_use]
pub fn render_fallback(markdown: &str) -> String {
  if markdown.trim().is_empty() {
    return String::new();
  }
  FallbackRenderer::new(default_sanitizer())
    .render(markdown)
    .html
    .html
}
