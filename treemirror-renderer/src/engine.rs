//! [`ContentRenderer`] trait and the Markdown implementation.
//!
//! # Title resolution
//!
//! | Source                               | Title                        |
//! |--------------------------------------|------------------------------|
//! | front matter `title: ...`            | that string                  |
//! | otherwise, first `# Heading`         | the heading text             |
//! | otherwise                            | the file stem                |

use std::path::Path;

use tera::{Context, Tera};

use treemirror_core::{PageContent, PageId};

use crate::error::RenderError;
use crate::markdown;

const FOLDER_TEMPLATE: &str = "folder.html";

/// Turns local sources into pages.
pub trait ContentRenderer {
    /// Render a source file. `parent` is the page the result will live under
    /// (`None` for the namespace root).
    fn render(
        &self,
        parent: Option<&PageId>,
        source: &Path,
        raw: &[u8],
    ) -> Result<PageContent, RenderError>;

    /// Landing page for a folder that has documents beneath it.
    fn folder_page(&self, title: &str, relative_path: &str) -> Result<PageContent, RenderError>;
}

/// Markdown renderer with an embedded Tera template for folder pages.
pub struct MarkdownRenderer {
    tera: Tera,
}

impl MarkdownRenderer {
    pub fn new() -> Result<Self, RenderError> {
        let mut tera = Tera::default();
        tera.add_raw_template(FOLDER_TEMPLATE, include_str!("templates/folder.html.tera"))?;
        Ok(Self { tera })
    }
}

impl ContentRenderer for MarkdownRenderer {
    fn render(
        &self,
        _parent: Option<&PageId>,
        source: &Path,
        raw: &[u8],
    ) -> Result<PageContent, RenderError> {
        let text = std::str::from_utf8(raw).map_err(|_| RenderError::NotUtf8 {
            path: source.to_path_buf(),
        })?;

        let (metadata, body_md) = match markdown::split_front_matter(text) {
            Some((yaml, rest)) => {
                let metadata =
                    markdown::parse_front_matter(yaml).map_err(|source_err| RenderError::FrontMatter {
                        path: source.to_path_buf(),
                        source: source_err,
                    })?;
                (metadata, rest)
            }
            None => (Default::default(), text),
        };

        let title = metadata
            .get("title")
            .and_then(|v| v.as_str())
            .map(str::to_owned)
            .filter(|t| !t.trim().is_empty())
            .or_else(|| markdown::first_heading(body_md))
            .or_else(|| {
                source
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
            })
            .unwrap_or_default();

        let body = markdown::to_storage(body_md);
        PageContent::new(title, body)
            .map(|page| page.with_metadata(metadata))
            .map_err(|e| RenderError::Page {
                path: source.to_path_buf(),
                source: e,
            })
    }

    fn folder_page(&self, title: &str, relative_path: &str) -> Result<PageContent, RenderError> {
        let mut ctx = Context::new();
        ctx.insert("title", title);
        ctx.insert("path", relative_path);
        let body = self.tera.render(FOLDER_TEMPLATE, &ctx)?;
        PageContent::new(title, body).map_err(|e| RenderError::Page {
            path: relative_path.into(),
            source: e,
        })
    }
}
