//! Custom HTML renderers for the node types the Markdown engine hands over.
//!
//! These are plain functions over already-parsed values, usable on their own
//! and wired into the engine by [`crate::processor`].

pub mod code;
pub mod ids;
pub mod structure;

pub use code::{CodeRenderer, DEFAULT_INLINE_COPY_THRESHOLD, language_label};
pub use ids::IdGenerator;
pub use structure::{
  HeadingSlugs,
  render_blockquote,
  render_heading,
  render_heading_html,
  render_image,
  render_link,
  render_table,
};
