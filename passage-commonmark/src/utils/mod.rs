//! Small text helpers shared by the renderers, the sanitizer and the fallback
//! path.
use comrak::nodes::{AstNode, NodeValue};
use regex::Regex;

/// Escape text for use in HTML text content and quoted attribute values.
///
/// Replaces `&`, `<`, `>`, `"` and `'` with `&amp;`, `&lt;`, `&gt;`,
/// `&quot;` and `&#039;`. The input is scanned once, so entities produced
/// for one character are never escaped again.
#[must_use]
pub fn escape_html(text: &str) -> String {
  let mut out = String::with_capacity(text.len() + text.len() / 8);
  for c in text.chars() {
    match c {
      '&' => out.push_str("&amp;"),
      '<' => out.push_str("&lt;"),
      '>' => out.push_str("&gt;"),
      '"' => out.push_str("&quot;"),
      '\'' => out.push_str("&#039;"),
      _ => out.push(c),
    }
  }
  out
}

/// Returns true for characters that survive slugification as-is: ASCII word
/// characters and CJK Unified Ideographs.
const fn is_slug_char(c: char) -> bool {
  c.is_ascii_alphanumeric() || c == '_' || matches!(c, '\u{4e00}'..='\u{9fa5}')
}

/// Slugify a string for use as an anchor ID.
///
/// Lowercases the text, collapses every run of characters that are neither
/// word characters nor CJK ideographs into a single `-`, and trims leading
/// and trailing dashes. May return an empty string.
#[must_use]
pub fn slugify(text: &str) -> String {
  let mut slug = String::with_capacity(text.len());
  let mut pending_dash = false;

  for c in text.chars().flat_map(char::to_lowercase) {
    if is_slug_char(c) {
      if pending_dash && !slug.is_empty() {
        slug.push('-');
      }
      pending_dash = false;
      slug.push(c);
    } else {
      pending_dash = true;
    }
  }

  slug
}

/// Capitalize the first letter of a string.
#[must_use]
pub fn capitalize_first(s: &str) -> String {
  let mut chars = s.chars();
  chars.next().map_or_else(String::new, |c| {
    c.to_uppercase().collect::<String>() + chars.as_str()
  })
}

/// Remove Unicode private-use characters. The fallback renderer uses a
/// private-use code point as its placeholder marker, so author text must not
/// be able to forge one.
#[must_use]
pub fn strip_private_use(text: &str) -> String {
  text
    .chars()
    .filter(|c| !matches!(*c, '\u{e000}'..='\u{f8ff}'))
    .collect()
}

/// Keep only the characters that are safe inside a `class` token, used for
/// the `language-*` class on code blocks.
#[must_use]
pub fn sanitize_class_token(token: &str) -> String {
  token
    .chars()
    .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '+' | '#' | '.'))
    .collect()
}

/// Compile a regex, logging and substituting [`never_matching_regex`] when
/// the pattern is rejected.
#[must_use]
pub fn compile_or_never(name: &str, pattern: &str) -> Regex {
  Regex::new(pattern).unwrap_or_else(|e| {
    log::error!(
      "Failed to compile {name} regex: {e}\n Falling back to never matching \
       regex."
    );
    never_matching_regex()
  })
}

/// Create a regex that never matches anything.
///
/// This is used as a fallback pattern when a regex fails to compile.
/// It will never match any input, which is safer than using a trivial regex
/// like `^$` which would match empty strings.
#[must_use]
pub fn never_matching_regex() -> Regex {
  // Asserts something impossible, the pattern itself is always valid
  #[allow(
    clippy::expect_used,
    reason = "This pattern is guaranteed to be valid"
  )]
  Regex::new(r"[^\s\S]").expect("regex pattern [^\\s\\S] should always compile")
}

/// Extract all inline text from a node, ignoring markup.
///
/// Used for heading text and image alt text.
pub fn extract_inline_text<'a>(node: &'a AstNode<'a>) -> String {
  let mut text = String::new();
  for child in node.children() {
    match &child.data.borrow().value {
      NodeValue::Text(t) => text.push_str(t),
      NodeValue::Code(t) => text.push_str(&t.literal),
      NodeValue::SoftBreak | NodeValue::LineBreak => text.push(' '),
      NodeValue::Link(..)
      | NodeValue::Image(..)
      | NodeValue::Emph
      | NodeValue::Strong
      | NodeValue::Strikethrough
      | NodeValue::Superscript => {
        text.push_str(&extract_inline_text(child));
      },
      _ => {},
    }
  }
  text
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn escapes_all_five_characters() {
    assert_eq!(
      escape_html(r#"<a href="x">Tom & 'Jerry'</a>"#),
      "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#039;Jerry&#039;&lt;/a&gt;"
    );
  }

  #[test]
  fn escaping_is_single_pass() {
    assert_eq!(escape_html("<script>"), "&lt;script&gt;");
    // A second pass escapes the ampersands produced by the first
    assert_eq!(escape_html(&escape_html("<")), "&amp;lt;");
    assert_eq!(escape_html("&amp;"), "&amp;amp;");
  }

  #[test]
  fn slugify_collapses_runs_and_trims() {
    assert_eq!(slugify("Hello, World!"), "hello-world");
    assert_eq!(slugify("  --Leading and trailing--  "), "leading-and-trailing");
    assert_eq!(slugify("snake_case stays"), "snake_case-stays");
    assert_eq!(slugify("C++ & Rust"), "c-rust");
  }

  #[test]
  fn slugify_keeps_cjk() {
    assert_eq!(slugify("安装 指南"), "安装-指南");
    assert_eq!(slugify("Rust 入门"), "rust-入门");
  }

  #[test]
  fn slugify_drops_other_scripts() {
    assert_eq!(slugify("Über"), "ber");
    assert_eq!(slugify("!!!"), "");
  }

  #[test]
  fn capitalize() {
    assert_eq!(capitalize_first("kotlin"), "Kotlin");
    assert_eq!(capitalize_first(""), "");
  }

  #[test]
  fn class_tokens_are_filtered() {
    assert_eq!(sanitize_class_token("c++"), "c++");
    assert_eq!(sanitize_class_token("js\" onclick=\"x"), "jsonclickx");
  }

  #[test]
  fn private_use_is_stripped() {
    assert_eq!(strip_private_use("a\u{e000}0\u{e000}b"), "a0b");
  }

  #[test]
  fn never_matching() {
    let re = never_matching_regex();
    assert!(!re.is_match(""));
    assert!(!re.is_match("anything"));
  }
}
