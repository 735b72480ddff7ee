//! Run driver: reconcile, then scrub.

use chrono::Utc;

use treemirror_core::{ContentStore, PageTree, TitleRegistry};
use treemirror_renderer::ContentRenderer;

use crate::context::{RunContext, RunReport, SyncOptions};
use crate::error::SyncError;
use crate::{reconcile, scrub};

/// Everything a finished run leaves behind.
#[derive(Debug)]
pub struct RunOutcome {
    pub report: RunReport,
    pub tree: PageTree,
    pub titles: TitleRegistry,
}

/// Mirror `options.root` onto `store`.
///
/// Returns `Err` only for fatal setup problems (root missing or unreadable),
/// in which case nothing was sent to the store. Per-entry failures are
/// collected in [`RunReport::failures`] and do not fail the run.
pub fn run(
    store: &dyn ContentStore,
    renderer: &dyn ContentRenderer,
    options: &SyncOptions,
) -> Result<RunOutcome, SyncError> {
    if !options.root.is_dir() {
        return Err(SyncError::RootNotDirectory {
            path: options.root.clone(),
        });
    }

    let mut ctx = RunContext::new(store, renderer, options);

    tracing::info!(root = %options.root.display(), "reconciling");
    reconcile::reconcile(&mut ctx)?;

    tracing::info!(pages = ctx.titles.len(), "scrubbing");
    scrub::scrub(&mut ctx);

    ctx.report.finished_at = Some(Utc::now());
    Ok(RunOutcome {
        report: ctx.report,
        tree: ctx.tree,
        titles: ctx.titles,
    })
}
