//! Sanitizer configuration and per-call overrides.
use std::{collections::BTreeSet, sync::LazyLock};

use serde::{Deserialize, Serialize};

/// Tags the renderers emit, plus the common inline and block elements raw
/// HTML in a document may reasonably use.
const DEFAULT_TAGS: &[&str] = &[
  "p", "br", "hr", "pre", "code", "blockquote", "h1", "h2", "h3", "h4", "h5",
  "h6", "ul", "ol", "li", "table", "thead", "tbody", "tr", "th", "td", "a",
  "img", "strong", "em", "b", "i", "u", "s", "del", "span", "div", "section",
  "article", "header", "footer", "mark", "small", "sub", "sup", "button",
];

const DEFAULT_ATTRIBUTES: &[&str] = &[
  "class",
  "id",
  "title",
  "href",
  "target",
  "rel",
  "src",
  "alt",
  "width",
  "height",
  "loading",
  "align",
  "type",
  "aria-hidden",
  "aria-label",
  "data-copy-target",
];

/// Event handlers are blocked by prefix regardless of this list; it names the
/// common ones so a caller widening `allowed_attributes` cannot reintroduce
/// them, and blocks inline `style`.
const DEFAULT_FORBIDDEN: &[&str] = &[
  "onclick",
  "onload",
  "onerror",
  "onmouseover",
  "onmouseout",
  "onkeydown",
  "onkeypress",
  "onkeyup",
  "onsubmit",
  "onchange",
  "style",
];

fn to_set(items: &[&str]) -> BTreeSet<String> {
  items.iter().map(|s| (*s).to_string()).collect()
}

/// What the sanitizer lets through.
///
/// `forbidden_attributes` always wins over `allowed_attributes` for the same
/// name. Attribute names starting with `on` are dropped even when neither
/// list mentions them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SanitizeConfig {
  pub allowed_tags:          BTreeSet<String>,
  pub allowed_attributes:    BTreeSet<String>,
  pub forbidden_attributes:  BTreeSet<String>,
  /// Allow any `data-*` attribute not otherwise forbidden.
  pub allow_data_attributes: bool,
}

impl Default for SanitizeConfig {
  fn default() -> Self {
    Self {
      allowed_tags:          to_set(DEFAULT_TAGS),
      allowed_attributes:    to_set(DEFAULT_ATTRIBUTES),
      forbidden_attributes:  to_set(DEFAULT_FORBIDDEN),
      allow_data_attributes: true,
    }
  }
}

static GLOBAL_CONFIG: LazyLock<SanitizeConfig> =
  LazyLock::new(SanitizeConfig::default);

impl SanitizeConfig {
  /// The process-wide default configuration. Built once and never mutated;
  /// per-call changes go through [`SanitizeOverride`].
  #[must_use]
  pub fn global() -> &'static Self {
    &GLOBAL_CONFIG
  }

  /// Whether an attribute with this (lowercase) name may be kept.
  #[must_use]
  pub fn attribute_allowed(&self, name: &str) -> bool {
    if name.starts_with("on") || self.forbidden_attributes.contains(name) {
      return false;
    }
    self.allowed_attributes.contains(name)
      || (self.allow_data_attributes && name.starts_with("data-"))
  }

  /// Whether a tag with this (lowercase) name may be kept.
  #[must_use]
  pub fn tag_allowed(&self, name: &str) -> bool {
    self.allowed_tags.contains(name)
  }
}

/// A partial [`SanitizeConfig`].
///
/// Each field that is set replaces the corresponding default field
/// wholesale. Setting `allowed_tags` to `["p"]` yields a config that allows
/// only `<p>`; it does not add `p` to the defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SanitizeOverride {
  pub allowed_tags:          Option<BTreeSet<String>>,
  pub allowed_attributes:    Option<BTreeSet<String>>,
  pub forbidden_attributes:  Option<BTreeSet<String>>,
  pub allow_data_attributes: Option<bool>,
}

impl SanitizeOverride {
  /// Returns true when no field is set, so the global config can be used
  /// without cloning.
  #[must_use]
  pub const fn is_empty(&self) -> bool {
    self.allowed_tags.is_none()
      && self.allowed_attributes.is_none()
      && self.forbidden_attributes.is_none()
      && self.allow_data_attributes.is_none()
  }

  /// Shallow merge over `base`.
  #[must_use]
  pub fn merged(&self, base: &SanitizeConfig) -> SanitizeConfig {
    SanitizeConfig {
      allowed_tags:          self
        .allowed_tags
        .clone()
        .unwrap_or_else(|| base.allowed_tags.clone()),
      allowed_attributes:    self
        .allowed_attributes
        .clone()
        .unwrap_or_else(|| base.allowed_attributes.clone()),
      forbidden_attributes:  self
        .forbidden_attributes
        .clone()
        .unwrap_or_else(|| base.forbidden_attributes.clone()),
      allow_data_attributes: self
        .allow_data_attributes
        .unwrap_or(base.allow_data_attributes),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn deny_wins_over_allow() {
    let mut config = SanitizeConfig::default();
    config.allowed_attributes.insert("style".to_string());
    assert!(!config.attribute_allowed("style"));
  }

  #[test]
  fn event_handlers_are_always_blocked() {
    let config = SanitizeConfig {
      allowed_attributes: to_set(&["onfocus", "class"]),
      forbidden_attributes: BTreeSet::new(),
      ..SanitizeConfig::default()
    };
    assert!(!config.attribute_allowed("onfocus"));
    assert!(config.attribute_allowed("class"));
  }

  #[test]
  fn data_attributes_follow_the_flag() {
    let mut config = SanitizeConfig::default();
    assert!(config.attribute_allowed("data-line"));
    config.allow_data_attributes = false;
    assert!(!config.attribute_allowed("data-line"));
    // Explicitly listed data attributes stay allowed
    assert!(config.attribute_allowed("data-copy-target"));
  }

  #[test]
  fn override_replaces_whole_fields() {
    let over = SanitizeOverride {
      allowed_tags: Some(to_set(&["p"])),
      ..SanitizeOverride::default()
    };
    let merged = over.merged(SanitizeConfig::global());
    assert_eq!(merged.allowed_tags, to_set(&["p"]));
    assert_eq!(
      merged.allowed_attributes,
      SanitizeConfig::global().allowed_attributes
    );
    assert!(merged.allow_data_attributes);
  }

  #[test]
  fn empty_override_is_identity() {
    let over = SanitizeOverride::default();
    assert!(over.is_empty());
    assert_eq!(&over.merged(SanitizeConfig::global()), SanitizeConfig::global());
  }

  #[test]
  fn override_parses_from_toml() {
    let over: SanitizeOverride = toml::from_str(
      r#"
        allowed_tags = ["p", "em"]
        allow_data_attributes = false
      "#,
    )
    .expect("valid override");
    assert_eq!(over.allowed_tags, Some(to_set(&["p", "em"])));
    assert_eq!(over.allow_data_attributes, Some(false));
    assert!(over.forbidden_attributes.is_none());
  }
}
