//! Rendering with error recovery.
use log::{error, warn};

use super::types::{MarkdownProcessor, RenderOptions};
use crate::{
  error::{RenderError, panic_message},
  types::MarkdownResult,
};

/// Render with comrak, recovering from errors and panics.
///
/// Any failure in the full pipeline is logged and the document is rendered
/// again by the fallback renderer, so the caller always gets sanitized HTML.
///
/// # Arguments
///
/// * `processor` - The configured markdown processor
/// * `content` - The raw markdown content to process
/// * `render_options` - Per-call switches for highlighting and sanitizing
#[must_use]
pub fn process_with_recovery(
  processor: &MarkdownProcessor,
  content: &str,
  render_options: RenderOptions,
) -> MarkdownResult {
  let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
    processor.render_full(content, render_options)
  }))
  .unwrap_or_else(|e| Err(RenderError::ParseFailure(panic_message(e.as_ref()))));

  match outcome {
    Ok(result) => result,
    Err(e) => {
      error!("{e}");
      warn!("Rendering with the fallback renderer instead");
      processor.render_fallback(content)
    },
  }
}
