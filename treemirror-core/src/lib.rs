//! treemirror core library: domain types, page tree, title registry, config.
//!
//! Public API surface:
//! - [`types`]: page ids and page payloads
//! - [`tree`]: arena of nodes with structural and logical parents
//! - [`registry`]: per-run [`TitleRegistry`]
//! - [`store`]: the [`ContentStore`] trait
//! - [`config`]: [`MirrorConfig`] load / defaults
//! - [`error`]: [`CoreError`], [`StoreError`]

pub mod config;
pub mod error;
pub mod registry;
pub mod store;
pub mod tree;
pub mod types;

pub use config::{HttpConfig, MirrorConfig};
pub use error::{CoreError, StoreError};
pub use registry::TitleRegistry;
pub use store::ContentStore;
pub use tree::{Node, NodeId, NodeKind, PageTree};
pub use types::{Metadata, PageContent, PageId, PageMatch, PageSummary};
