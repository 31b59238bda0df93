//! Parser-backed sanitizer built on ammonia (html5ever underneath).
use std::{
  borrow::Cow,
  collections::{HashMap, HashSet},
};

use ammonia::Builder;

use super::types::SanitizeConfig;
use crate::url::is_dangerous_url;

/// Schemes allowed in URL-bearing attributes. Anything else, including
/// unknown schemes, drops the attribute.
const URL_SCHEMES: &[&str] = &["http", "https", "mailto", "tel"];

/// Elements whose content is removed along with the tag. These are never
/// allowed through, whatever the configuration says.
const CLEAN_CONTENT_TAGS: &[&str] = &["script", "style"];

/// Clean `html` against `config`.
///
/// ammonia panics on contradictory configurations; callers are expected to
/// run this under `catch_unwind`.
pub(super) fn clean(config: &SanitizeConfig, html: &str) -> String {
  let tags: HashSet<&str> = config
    .allowed_tags
    .iter()
    .map(String::as_str)
    .filter(|tag| !CLEAN_CONTENT_TAGS.contains(tag))
    .collect();

  let attributes: HashSet<&str> = config
    .allowed_attributes
    .iter()
    .map(String::as_str)
    .filter(|name| config.attribute_allowed(name))
    .collect();

  let mut builder = Builder::default();
  builder
    .tags(tags)
    .clean_content_tags(CLEAN_CONTENT_TAGS.iter().copied().collect())
    .generic_attributes(attributes)
    .tag_attributes(HashMap::new())
    .url_schemes(URL_SCHEMES.iter().copied().collect())
    // `rel` is a regular allowed attribute, the renderers set it themselves
    .link_rel(None)
    .strip_comments(true);

  if config.allow_data_attributes {
    builder.generic_attribute_prefixes(HashSet::from(["data-"]));
  }

  let filter_config = config.clone();
  builder.attribute_filter(move |_element, attribute, value| {
    if !filter_config.attribute_allowed(attribute) {
      return None;
    }
    if matches!(attribute, "href" | "src") && is_dangerous_url(value) {
      return None;
    }
    Some(Cow::Borrowed(value))
  });

  builder.clean(html).to_string()
}

#[cfg(test)]
mod tests {
  use std::collections::BTreeSet;

  use super::*;

  fn clean_default(html: &str) -> String {
    clean(SanitizeConfig::global(), html)
  }

  #[test]
  fn strips_script_with_content() {
    let out = clean_default("<p>hi</p><script>alert(1)</script>");
    assert_eq!(out, "<p>hi</p>");
  }

  #[test]
  fn drops_event_handlers_and_style() {
    let out =
      clean_default(r#"<p onclick="x()" style="color:red" class="a">t</p>"#);
    assert_eq!(out, r#"<p class="a">t</p>"#);
  }

  #[test]
  fn drops_dangerous_hrefs() {
    let out = clean_default(r#"<a href="javascript:alert(1)">x</a>"#);
    assert!(!out.contains("javascript:"));
    assert!(out.contains(">x</a>"));
  }

  #[test]
  fn keeps_relative_and_fragment_urls() {
    let html = r##"<a href="#intro" class="anchor">#</a><a href="/docs/a">a</a>"##;
    assert_eq!(clean_default(html), html);
  }

  #[test]
  fn allows_data_attributes_when_enabled() {
    let html = r#"<span data-line="3">x</span>"#;
    assert_eq!(clean_default(html), html);

    let strict = SanitizeConfig {
      allow_data_attributes: false,
      ..SanitizeConfig::default()
    };
    assert_eq!(clean(&strict, html), "<span>x</span>");
  }

  #[test]
  fn script_can_never_be_allowed() {
    let mut tags = SanitizeConfig::default().allowed_tags;
    tags.insert("script".to_string());
    let config = SanitizeConfig {
      allowed_tags: tags,
      ..SanitizeConfig::default()
    };
    let out = clean(&config, "<script>alert(1)</script><p>ok</p>");
    assert_eq!(out, "<p>ok</p>");
  }

  #[test]
  fn unknown_tags_are_unwrapped() {
    let config = SanitizeConfig {
      allowed_tags: BTreeSet::from(["p".to_string()]),
      ..SanitizeConfig::default()
    };
    assert_eq!(clean(&config, "<p><em>kept text</em></p>"), "<p>kept text</p>");
  }
}
