//! Markdown processing module.
//!
//! # Architecture
//!
//! - [`core`]: Main processor implementation and the comrak pipeline
//! - [`transform`]: AST transformers that apply the custom renderers
//! - [`fallback`]: Text-substitution renderer used when comrak is unavailable
//!   or fails
//! - [`process`]: Rendering with error recovery
//! - [`types`]: Core type definitions and configuration structures
pub mod core;
pub mod fallback;
pub mod process;
pub mod transform;
pub mod types;

pub use fallback::{FallbackOutput, FallbackRenderer, render_fallback};
pub use process::process_with_recovery;
pub use transform::{HeadingTransformer, NodeTransformer};
pub use types::{
  AstTransformer,
  Capabilities,
  EngineMode,
  MarkdownOptions,
  MarkdownOptionsBuilder,
  MarkdownProcessor,
  RenderOptions,
};
