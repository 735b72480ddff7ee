//! # treemirror-sync
//!
//! Tree reconciliation engine: walks the local tree, decides which folders get
//! a page, creates/updates pages by title, uploads attachments, and scrubs
//! remote pages with no local counterpart.
//!
//! Call [`pipeline::run`] with a store, a renderer and [`SyncOptions`].

pub mod attachments;
pub mod context;
pub mod dry_run;
pub mod error;
pub mod pipeline;
pub mod reconcile;
pub mod scrub;

pub use context::{Failure, RunContext, RunReport, SyncOptions};
pub use dry_run::DryRunStore;
pub use error::SyncError;
pub use pipeline::{run, RunOutcome};
