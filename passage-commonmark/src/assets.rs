//! Stylesheet and copy handler for rendered output.
//!
//! The renderers only emit class names and `data-copy-target` references.
//! Pages that show rendered Markdown include [`STYLESHEET`] once and
//! [`COPY_SCRIPT`] once.
use std::borrow::Cow;

/// Styles for code blocks, copy buttons, anchors, tables, images and quotes.
pub const STYLESHEET: &str = include_str!("../assets/passage.css");

/// A single delegated click listener that copies the text of the element
/// named by a button's `data-copy-target`.
pub const COPY_SCRIPT: &str = include_str!("../assets/copy.js");

/// Attribute marking the injected `<style>` element.
pub const STYLE_MARKER: &str = "data-passage-markdown";

/// The stylesheet wrapped in a marked `<style>` element.
#[must_use]
pub fn stylesheet_tag() -> String {
  format!("<style {STYLE_MARKER}>\n{STYLESHEET}</style>")
}

/// The copy handler wrapped in a `<script>` element.
#[must_use]
pub fn copy_script_tag() -> String {
  format!("<script>\n{COPY_SCRIPT}</script>")
}

/// Append the stylesheet to `head_html` unless it is already there.
#[must_use]
pub fn inject_stylesheet(head_html: &str) -> Cow<'_, str> {
  if head_html.contains(STYLE_MARKER) {
    return Cow::Borrowed(head_html);
  }
  Cow::Owned(format!("{head_html}{}", stylesheet_tag()))
}
