//! Scrubber: delete remote pages that no longer have a local counterpart.
//!
//! For every synchronized node (and the master page, when one is set) the
//! remote children are listed. A child whose title was not synchronized in
//! this run is an orphan: its own children are scrubbed first, then it is
//! deleted. Kept pages are never touched.
//!
//! Must only run after reconciliation finished; an incomplete title registry
//! would make not-yet-synchronized pages look orphaned.

use treemirror_core::{NodeId, PageSummary};

use crate::context::RunContext;
use crate::error::SyncError;

/// Scrub the master page's children, then the whole page tree.
pub fn scrub(ctx: &mut RunContext<'_>) {
    if let Some(master) = ctx.options.master_page.clone() {
        match ctx.store.child_pages(&master) {
            Ok(children) => remove_orphans(ctx, &children),
            Err(err) => ctx.skip(format!("master page {master}"), &SyncError::from(err)),
        }
    }
    let root = ctx.tree.root();
    scrub_node(ctx, root);
}

fn scrub_node(ctx: &mut RunContext<'_>, node: NodeId) {
    let title = ctx.tree.node(node).title().map(str::to_owned);
    if let Some(title) = title {
        match ctx.store.find_page(&title, true) {
            Ok(Some(found)) => remove_orphans(ctx, &found.children),
            Ok(None) => tracing::warn!(title = %title, "synchronized page no longer found"),
            Err(err) => ctx.skip(&title, &SyncError::from(err)),
        }
    }

    let children = ctx.tree.node(node).structural_children.clone();
    for child in children {
        scrub_node(ctx, child);
    }
}

fn remove_orphans(ctx: &mut RunContext<'_>, children: &[PageSummary]) {
    for child in children {
        if ctx.titles.contains(&child.title) {
            continue;
        }
        delete_subtree(ctx, child);
    }
}

/// Scrub `page`'s children, then delete `page`.
///
/// When the children cannot be listed, `page` is kept for a later run.
fn delete_subtree(ctx: &mut RunContext<'_>, page: &PageSummary) {
    match ctx.store.child_pages(&page.id) {
        Ok(children) => remove_orphans(ctx, &children),
        Err(err) => {
            ctx.skip(&page.title, &SyncError::from(err));
            return;
        }
    }

    if let Err(err) = ctx.store.delete_page(&page.id) {
        ctx.skip(&page.title, &SyncError::from(err));
        return;
    }
    tracing::info!(title = %page.title, id = %page.id, "deleted orphaned page");
    ctx.report.deleted += 1;
}
