//! URL classification for links, images and anchors.
//!
//! Every URL that ends up in an `href` or `src` attribute goes through
//! [`is_dangerous_url`] first. Dangerous URLs are never passed through; the
//! renderers substitute `#` for links and an empty `src` for images.
use serde::{Deserialize, Serialize};

/// Schemes that execute script or smuggle a document when followed.
///
/// `data:` is blocked wholesale rather than only `data:text/html`, since
/// SVG and XML payloads can script just as well.
const DANGEROUS_SCHEMES: &[&str] = &["javascript:", "vbscript:", "data:"];

/// Coarse classification of a URL for rendering decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UrlKind {
  Http,
  Https,
  /// No scheme: paths, fragments, queries and protocol-relative URLs.
  Relative,
  /// A non-script scheme such as `mailto:` or `tel:`.
  Other,
  Dangerous,
}

/// Normalize a URL the way browsers do before scheme dispatch: leading
/// whitespace and control characters are ignored, and tabs and newlines
/// anywhere in the scheme are dropped.
fn normalized_prefix(url: &str) -> String {
  url
    .trim_start_matches(|c: char| c.is_whitespace() || c.is_control())
    .chars()
    .filter(|c| !matches!(c, '\t' | '\n' | '\r') && !c.is_control())
    .take(16)
    .flat_map(char::to_lowercase)
    .collect()
}

/// Returns true when following `url` could execute script.
///
/// Matching is case-insensitive and ignores leading whitespace, so
/// `"  JavaScript:alert(1)"` and `"java\tscript:"` are both caught.
#[must_use]
pub fn is_dangerous_url(url: &str) -> bool {
  let prefix = normalized_prefix(url);
  DANGEROUS_SCHEMES
    .iter()
    .any(|scheme| prefix.starts_with(scheme))
}

/// Extract the scheme (without the colon) if the URL has one.
fn scheme_of(url: &str) -> Option<&str> {
  let url = url.trim_start();
  let end = url.find(':')?;
  let scheme = &url[..end];
  let mut chars = scheme.chars();
  let valid = chars.next().is_some_and(|c| c.is_ascii_alphabetic())
    && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
  valid.then_some(scheme)
}

/// Classify a URL.
#[must_use]
pub fn classify_url(url: &str) -> UrlKind {
  if is_dangerous_url(url) {
    return UrlKind::Dangerous;
  }

  match scheme_of(url) {
    None => UrlKind::Relative,
    Some(s) if s.eq_ignore_ascii_case("http") => UrlKind::Http,
    Some(s) if s.eq_ignore_ascii_case("https") => UrlKind::Https,
    Some(_) => UrlKind::Other,
  }
}

/// Returns true for URLs that leave the current site and should open with
/// `target="_blank" rel="noopener noreferrer"`.
#[must_use]
pub fn is_external(url: &str) -> bool {
  matches!(classify_url(url), UrlKind::Http | UrlKind::Https)
    || url.trim_start().starts_with("//")
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn javascript_scheme_is_dangerous_in_any_case() {
    assert!(is_dangerous_url("javascript:alert(1)"));
    assert!(is_dangerous_url("JavaScript:alert(1)"));
    assert!(is_dangerous_url("   javascript:void(0)"));
    assert!(is_dangerous_url("\u{0001}javascript:x"));
    assert!(is_dangerous_url("java\tscript:x"));
    assert!(is_dangerous_url("java\nscript:x"));
  }

  #[test]
  fn other_script_schemes_are_dangerous() {
    assert!(is_dangerous_url("vbscript:msgbox"));
    assert!(is_dangerous_url("data:text/html,<script>alert(1)</script>"));
    assert!(is_dangerous_url("DATA:image/svg+xml;base64,AAAA"));
  }

  #[test]
  fn ordinary_urls_are_safe() {
    assert!(!is_dangerous_url("https://example.com/javascript:"));
    assert!(!is_dangerous_url("/docs/javascript.html"));
    assert!(!is_dangerous_url("#javascript"));
    assert!(!is_dangerous_url(""));
  }

  #[test]
  fn classification() {
    assert_eq!(classify_url("http://example.com"), UrlKind::Http);
    assert_eq!(classify_url("HTTPS://example.com"), UrlKind::Https);
    assert_eq!(classify_url("/about"), UrlKind::Relative);
    assert_eq!(classify_url("#top"), UrlKind::Relative);
    assert_eq!(classify_url("page.html?a=b:c"), UrlKind::Relative);
    assert_eq!(classify_url("mailto:me@example.com"), UrlKind::Other);
    assert_eq!(classify_url("javascript:evil()"), UrlKind::Dangerous);
  }

  #[test]
  fn external_detection() {
    assert!(is_external("https://example.com"));
    assert!(is_external("http://example.com"));
    assert!(is_external("//cdn.example.com/x.png"));
    assert!(!is_external("/local"));
    assert!(!is_external("#anchor"));
    assert!(!is_external("mailto:me@example.com"));
  }
}
