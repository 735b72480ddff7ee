//! # treemirror-renderer
//!
//! Converts local Markdown sources into storage-format pages and renders the
//! landing page created for every folder that holds documents.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::path::Path;
//! use treemirror_renderer::{ContentRenderer, MarkdownRenderer};
//!
//! fn show(path: &Path) {
//!     let Ok(renderer) = MarkdownRenderer::new() else { return };
//!     if let Ok(raw) = std::fs::read(path) {
//!         if let Ok(page) = renderer.render(None, path, &raw) {
//!             println!("{}: {} bytes", page.title(), page.body.len());
//!         }
//!     }
//! }
//! ```

pub mod engine;
pub mod error;
pub mod markdown;

pub use engine::{ContentRenderer, MarkdownRenderer};
pub use error::RenderError;
