//! Error types.
//!
//! None of these escape the public rendering entry points: they are logged
//! and answered with a degraded but safe result. They are public so callers
//! driving the lower-level pieces can match on them.
use std::{any::Any, path::PathBuf};

/// Failures inside the rendering pipeline.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
  #[error("{0} is not available, using the fallback path")]
  EngineUnavailable(&'static str),

  #[error("Markdown engine failed: {0}")]
  ParseFailure(String),

  #[error("Highlighting failed for language '{language}': {message}")]
  HighlightFailure { language: String, message: String },

  #[error("Sanitizer failed, using the regex fallback: {0}")]
  SanitizeFailure(String),
}

/// Configuration loading errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
  #[error("Failed to read config file {path}: {source}")]
  Io {
    path:   PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("Failed to parse TOML: {0}")]
  Toml(#[from] toml::de::Error),

  #[error("Invalid configuration: {0}")]
  Invalid(String),
}

/// Best-effort description of a caught panic payload.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
  if let Some(msg) = payload.downcast_ref::<String>() {
    msg.clone()
  } else if let Some(msg) = payload.downcast_ref::<&str>() {
    (*msg).to_string()
  } else {
    "unknown panic".to_string()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn panic_payloads_are_described() {
    let owned: Box<dyn Any + Send> = Box::new(String::from("owned"));
    let borrowed: Box<dyn Any + Send> = Box::new("borrowed");
    let other: Box<dyn Any + Send> = Box::new(42_u8);
    assert_eq!(panic_message(owned.as_ref()), "owned");
    assert_eq!(panic_message(borrowed.as_ref()), "borrowed");
    assert_eq!(panic_message(other.as_ref()), "unknown panic");
  }

  #[test]
  fn messages_name_the_failure() {
    let e = RenderError::HighlightFailure {
      language: "rust".to_string(),
      message:  "boom".to_string(),
    };
    assert_eq!(e.to_string(), "Highlighting failed for language 'rust': boom");
  }
}
