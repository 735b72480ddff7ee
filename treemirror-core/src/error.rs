//! Error types for treemirror-core.

use std::path::PathBuf;

use thiserror::Error;

use crate::types::PageId;

/// Errors raised by domain types, the page tree and configuration loading.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Underlying I/O failure, annotated with the path involved.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// YAML parse error on load: includes file path and line context from serde_yaml.
    #[error("failed to parse config at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// An explicitly requested config file does not exist.
    #[error("config not found at {path}")]
    ConfigNotFound { path: PathBuf },

    /// `dirs::home_dir()` returned `None`.
    #[error("cannot determine home directory; set $HOME or equivalent")]
    HomeNotFound,

    /// A page was built without a usable title.
    #[error("page title is missing or empty")]
    EmptyTitle,

    /// A node already carries a remote id for this run.
    #[error("remote id for {path} already assigned ({existing})")]
    RemoteIdReassigned { path: PathBuf, existing: PageId },
}

/// Errors surfaced by a [`ContentStore`](crate::store::ContentStore) implementation.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store client could not be constructed.
    #[error("invalid store configuration: {0}")]
    Config(String),

    /// Connection, TLS or timeout failure after retries were exhausted.
    #[error("transport error: {0}")]
    Transport(String),

    /// The store answered with a non-success status.
    #[error("{method} {url} returned HTTP {status}: {body}")]
    Status {
        method: &'static str,
        url: String,
        status: u16,
        body: String,
    },

    /// The response body did not have the expected shape.
    #[error("unexpected response from store: {0}")]
    Decode(String),

    /// A local file (e.g. an attachment) could not be read.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience constructor for [`CoreError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> CoreError {
    CoreError::Io {
        path: path.into(),
        source,
    }
}
