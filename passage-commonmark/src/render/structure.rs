//! Heading, link, image, table and blockquote renderers.
//!
//! Every fragment produced here only uses tags and attributes from the
//! default sanitizer allow-list, so sanitizing it again leaves it unchanged.
use std::collections::HashMap;

use crate::{
  url::{is_dangerous_url, is_external},
  utils::{escape_html, slugify},
};

/// Slug used for headings whose text has no slug characters at all.
const EMPTY_SLUG: &str = "section";

/// Tracks heading ids within one render pass so repeated headings get
/// `-1`, `-2`, ... suffixes instead of duplicate ids.
#[derive(Debug, Default, Clone)]
pub struct HeadingSlugs {
  seen: HashMap<String, usize>,
}

impl HeadingSlugs {
  #[must_use]
  pub fn new() -> Self {
    Self::default()
  }

  /// Derive a unique id for a heading with this text.
  pub fn unique(&mut self, text: &str) -> String {
    let mut base = slugify(text);
    if base.is_empty() {
      base = EMPTY_SLUG.to_string();
    }

    let Some(count) = self.seen.get(&base).copied() else {
      self.seen.insert(base.clone(), 0);
      return base;
    };

    let mut n = count + 1;
    let mut candidate = format!("{base}-{n}");
    while self.seen.contains_key(&candidate) {
      n += 1;
      candidate = format!("{base}-{n}");
    }
    self.seen.insert(base, n);
    self.seen.insert(candidate.clone(), 0);
    candidate
  }
}

/// Percent-encode the characters that have no business in an attribute
/// value, then HTML-escape what remains.
fn encode_url_attr(url: &str) -> String {
  let mut out = String::with_capacity(url.len());
  for c in url.trim().chars() {
    if c.is_control() || matches!(c, ' ' | '"' | '\'' | '<' | '>' | '`' | '\\')
    {
      let mut buf = [0_u8; 4];
      for byte in c.encode_utf8(&mut buf).bytes() {
        out.push_str(&format!("%{byte:02X}"));
      }
    } else {
      out.push(c);
    }
  }
  escape_html(&out)
}

fn title_attr(title: &str) -> String {
  if title.is_empty() {
    String::new()
  } else {
    format!(" title=\"{}\"", escape_html(title))
  }
}

/// Render a heading with an id and a trailing anchor link.
///
/// `level` is clamped to 1..=6. `text` is plain text and is escaped here.
#[must_use]
pub fn render_heading(level: u8, text: &str, id: &str) -> String {
  render_heading_html(level, &escape_html(text), id)
}

/// Like [`render_heading`], for content that is already HTML.
#[must_use]
pub fn render_heading_html(level: u8, inner_html: &str, id: &str) -> String {
  let level = level.clamp(1, 6);
  let id = escape_html(id);
  format!(
    "<h{level} id=\"{id}\">{inner_html}<a href=\"#{id}\" class=\"anchor\" \
     aria-hidden=\"true\">#</a></h{level}>"
  )
}

/// Render a link around already-rendered `inner_html`.
///
/// Dangerous URLs become `#`. External links open in a new tab without
/// access to `window.opener`.
#[must_use]
pub fn render_link(href: &str, title: &str, inner_html: &str) -> String {
  let (href, external) = if is_dangerous_url(href) {
    log::debug!("Neutralized dangerous link target");
    ("#".to_string(), false)
  } else {
    (encode_url_attr(href), is_external(href))
  };

  let target = if external {
    " target=\"_blank\" rel=\"noopener noreferrer\""
  } else {
    ""
  };

  format!(
    "<a href=\"{href}\"{}{target}>{inner_html}</a>",
    title_attr(title)
  )
}

/// Render an image with lazy loading and an optional caption from `alt`.
///
/// A dangerous `src` is emptied; an `<img>` with an empty `src` is inert.
#[must_use]
pub fn render_image(src: &str, alt: &str, title: &str) -> String {
  let src = if is_dangerous_url(src) {
    log::debug!("Neutralized dangerous image source");
    String::new()
  } else {
    encode_url_attr(src)
  };
  let alt = escape_html(alt);

  let caption = if alt.trim().is_empty() {
    String::new()
  } else {
    format!("<span class=\"image-caption\">{alt}</span>")
  };

  format!(
    "<span class=\"image-container\"><img src=\"{src}\" alt=\"{alt}\"{} \
     loading=\"lazy\">{caption}</span>",
    title_attr(title)
  )
}

/// Wrap already-rendered table rows in a scroll container.
///
/// `header_rows` and `body_rows` are `<tr>` sequences; an empty body omits
/// the `<tbody>`.
#[must_use]
pub fn render_table(header_rows: &str, body_rows: &str) -> String {
  let body = if body_rows.trim().is_empty() {
    String::new()
  } else {
    format!("<tbody>\n{body_rows}</tbody>\n")
  };
  format!(
    "<div class=\"table-container\"><table>\n<thead>\n{header_rows}</thead>\n\
     {body}</table></div>"
  )
}

/// Wrap already-rendered blockquote content in a decorative container.
#[must_use]
pub fn render_blockquote(inner_html: &str) -> String {
  format!("<blockquote><div class=\"quote-content\">{inner_html}</div></blockquote>")
}
