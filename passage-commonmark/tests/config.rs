#![allow(clippy::expect_used, clippy::panic, reason = "Fine in tests")]
use std::fs;

use passage_commonmark::{
  ConfigError,
  EngineMode,
  MarkdownProcessor,
  RenderConfig,
  SanitizerBackend,
  assets::{COPY_SCRIPT, inject_stylesheet},
};

#[test]
fn config_file_drives_the_processor() {
  let dir = tempfile::tempdir().expect("temp dir");
  let path = dir.path().join("render.toml");
  fs::write(
    &path,
    r#"
highlight_code = false
inline_copy_threshold = 2
engine = "fallback"
sanitizer_backend = "regex"
"#,
  )
  .expect("write config");

  let options = RenderConfig::load(&path)
    .expect("config loads")
    .into_options()
    .expect("valid options");
  let processor = MarkdownProcessor::new(options);

  assert_eq!(processor.capabilities().engine, EngineMode::FallbackOnly);
  assert_eq!(processor.capabilities().sanitizer, SanitizerBackend::Regex);
  assert!(!processor.capabilities().highlighter);

  let result = processor.render("# Notes\n\nrun `abc` now");
  assert_eq!(result.engine, EngineMode::FallbackOnly);
  assert_eq!(result.sanitizer, Some(SanitizerBackend::Regex));
  assert!(result.html.contains("inline-copy-btn"));
}

#[test]
fn sanitizer_table_overrides_allow_lists() {
  let options = RenderConfig::from_toml_str(
    r#"
highlight_code = false

[sanitizer]
allowed_tags = ["p", "strong"]
"#,
  )
  .expect("valid config")
  .into_options()
  .expect("valid options");

  let result = MarkdownProcessor::new(options).render("**bold** *em*");
  if result.sanitizer == Some(SanitizerBackend::Ammonia) {
    assert_eq!(result.html, "<p><strong>bold</strong> em</p>\n");
  }
}

#[test]
fn malformed_config_is_an_error() {
  assert!(matches!(
    RenderConfig::from_toml_str("highlight_code = \"yes\""),
    Err(ConfigError::Toml(_))
  ));
  assert!(matches!(
    RenderConfig::from_toml_str("[sanitizer]\nallowed_tag = [\"p\"]"),
    Err(ConfigError::Toml(_))
  ));
}

#[test]
fn page_assets() {
  let head = inject_stylesheet("<meta charset=\"utf-8\">");
  assert!(head.contains("<style data-passage-markdown>"));
  assert!(head.contains(".code-block-wrapper"));
  assert_eq!(inject_stylesheet(&head), head);
  assert!(COPY_SCRIPT.contains("addEventListener(\"click\""));
}
