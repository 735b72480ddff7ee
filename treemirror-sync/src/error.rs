//! Error types for treemirror-sync.

use std::path::PathBuf;

use thiserror::Error;

use treemirror_core::{CoreError, StoreError};
use treemirror_renderer::RenderError;

/// All errors that can arise from a sync run.
///
/// Only [`SyncError::RootNotDirectory`] and failures listing the root folder
/// abort a run; everything else is logged against the entry it concerns.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The mirrored root is missing or not a directory.
    #[error("root path {path} is not a directory")]
    RootNotDirectory { path: PathBuf },

    /// An error from the rendering engine.
    #[error("render error: {0}")]
    Render(#[from] RenderError),

    /// An error from the remote store.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Page tree or title invariant violated.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The page that should parent this entry failed to sync.
    #[error("parent page of {path} was not synchronized")]
    ParentUnsynced { path: PathBuf },
}

/// Convenience constructor for [`SyncError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> SyncError {
    SyncError::Io {
        path: path.into(),
        source,
    }
}
