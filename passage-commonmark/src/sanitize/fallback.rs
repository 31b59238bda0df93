//! Regex-based sanitizer used when the parser-backed one is unavailable.
//!
//! This is a best-effort filter over the raw string. It removes scripts,
//! embedded frames and objects, strips event handler attributes and
//! neutralizes script URLs, but it does not enforce the tag allow-list and
//! must not be treated as equivalent to the parser-backed path.
use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::{url::is_dangerous_url, utils::compile_or_never};

/// Elements removed together with everything between their tags.
const EMBEDDING_TAGS: &[&str] =
  &["iframe", "object", "embed", "frameset", "frame", "style"];

static SCRIPT_ELEMENT_RE: LazyLock<Regex> = LazyLock::new(|| {
  compile_or_never("SCRIPT_ELEMENT_RE", r"(?is)<script\b[^>]*>.*?</script\s*>")
});

/// Unterminated or stray script tags left over after element removal.
static SCRIPT_TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
  compile_or_never("SCRIPT_TAG_RE", r"(?i)</?script\b[^>]*>?")
});

/// An opening tag as browsers tokenize it. Quoted values may hold `>`,
/// unquoted values run to whitespace and may hold stray quotes, and an
/// attribute may follow a closing quote without whitespace.
static OPEN_TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
  compile_or_never(
    "OPEN_TAG_RE",
    r#"<([a-zA-Z][^\s/>]*)((?:[\s/]+|[^\s/>][^\s/>=]*(?:\s*=\s*(?:"[^"]*"|'[^']*'|[^\s>]*))?)*)>"#,
  )
});

/// One attribute inside the body captured by [`OPEN_TAG_RE`].
static ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
  compile_or_never(
    "ATTR_RE",
    r#"([^\s/>][^\s/>=]*)(?:\s*=\s*("[^"]*"|'[^']*'|[^\s>]*))?"#,
  )
});

/// Handler-shaped text inside anything tag-like, for markup malformed enough
/// that [`OPEN_TAG_RE`] does not see it as a tag. The leading quote, if any,
/// closes the previous value and is kept.
static LOOSE_EVENT_ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
  compile_or_never(
    "LOOSE_EVENT_ATTR_RE",
    r#"(?i)([\s/"'])on[a-z0-9_-]+\s*=\s*(?:"[^"]*"|'[^']*'|[^\s>"']+)"#,
  )
});

static LOOSE_TAG_RE: LazyLock<Regex> =
  LazyLock::new(|| compile_or_never("LOOSE_TAG_RE", r"<[a-zA-Z][^>]*>"));

/// Attributes whose value is loaded or navigated to.
const URL_ATTRS: &[&str] = &["href", "src", "xlink:href", "action", "formaction"];

static EMBEDDING_RES: LazyLock<Vec<(Regex, Regex)>> = LazyLock::new(|| {
  EMBEDDING_TAGS
    .iter()
    .map(|tag| {
      (
        compile_or_never(
          "EMBEDDING_ELEMENT_RE",
          &format!(r"(?is)<{tag}\b[^>]*>.*?</{tag}\s*>"),
        ),
        compile_or_never("EMBEDDING_TAG_RE", &format!(r"(?i)</?{tag}\b[^>]*>?")),
      )
    })
    .collect()
});

/// Strip surrounding quotes from a raw attribute value.
fn unquote(raw: &str) -> &str {
  raw
    .strip_prefix('"')
    .and_then(|v| v.strip_suffix('"'))
    .or_else(|| raw.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')))
    .unwrap_or(raw)
}

/// Drop handlers and neutralize dangerous URLs inside one opening tag.
///
/// Attributes are walked one by one. A tag with nothing to remove is returned
/// byte for byte; otherwise it is rebuilt from the surviving attributes.
/// URL values are entity-decoded first so `&#106;avascript:` is caught too.
fn clean_tag(caps: &Captures) -> String {
  let body = &caps[2];
  let mut kept = Vec::new();
  let mut changed = false;

  for attr in ATTR_RE.captures_iter(body) {
    let name = attr[1].to_ascii_lowercase();
    if name.starts_with("on") {
      changed = true;
      continue;
    }

    if URL_ATTRS.contains(&name.as_str()) {
      let value = attr.get(2).map_or("", |m| unquote(m.as_str()));
      if is_dangerous_url(&html_escape::decode_html_entities(value)) {
        changed = true;
        let inert = if name == "href" { "#" } else { "" };
        kept.push(format!("{name}=\"{inert}\""));
        continue;
      }
    }

    kept.push(attr[0].to_string());
  }

  if !changed {
    return caps[0].to_string();
  }

  let mut tag = format!("<{}", &caps[1]);
  for attr in kept {
    tag.push(' ');
    tag.push_str(&attr);
  }
  if body.trim_end().ends_with('/') {
    tag.push_str(" /");
  }
  tag.push('>');
  tag
}

/// Run the regex filter over `html`.
#[must_use]
pub fn sanitize(html: &str) -> String {
  // Scripts first, including their content
  let mut out = SCRIPT_ELEMENT_RE.replace_all(html, "").into_owned();
  out = SCRIPT_TAG_RE.replace_all(&out, "").into_owned();

  // Handlers and URLs, scoped to tags so prose is left alone
  out = OPEN_TAG_RE.replace_all(&out, clean_tag).into_owned();
  out = LOOSE_TAG_RE
    .replace_all(&out, |caps: &Captures| {
      LOOSE_EVENT_ATTR_RE
        .replace_all(&caps[0], |m: &Captures| match &m[1] {
          q @ ("\"" | "'") => q.to_string(),
          _ => String::new(),
        })
        .into_owned()
    })
    .into_owned();

  // Frames, objects and embeds
  for (element_re, tag_re) in EMBEDDING_RES.iter() {
    out = element_re.replace_all(&out, "").into_owned();
    out = tag_re.replace_all(&out, "").into_owned();
  }

  out
}
