//! Error types for treemirror-renderer.

use std::path::PathBuf;

use thiserror::Error;

use treemirror_core::CoreError;

/// All errors that can arise while rendering a page.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Tera template engine error.
    #[error("template engine error: {0}")]
    Tera(#[from] tera::Error),

    /// Front matter block is not valid YAML.
    #[error("invalid front matter in {path}: {source}")]
    FrontMatter {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// Source bytes are not valid UTF-8.
    #[error("{path} is not valid UTF-8")]
    NotUtf8 { path: PathBuf },

    /// The rendered page was rejected (e.g. no usable title).
    #[error("{path}: {source}")]
    Page {
        path: PathBuf,
        #[source]
        source: CoreError,
    },
}
