//! Attachment gate: which non-document files are uploaded, and where.
//!
//! A file is uploaded to the page of the nearest alive folder at or above the
//! folder that contains it. With no alive folder above it there is no page to
//! attach to, and the file is left alone.

use std::path::{Path, PathBuf};

use treemirror_core::{MirrorConfig, NodeId, PageTree};

use crate::context::RunContext;
use crate::error::SyncError;

/// Whether `path` has one of the configured attachment extensions.
pub fn is_eligible(config: &MirrorConfig, path: &Path) -> bool {
    config.is_attachment(path)
}

/// Node whose page receives attachments found in `folder`.
pub fn upload_target(tree: &PageTree, folder: NodeId) -> Option<NodeId> {
    tree.nearest_alive(folder)
}

/// Upload `files` (already filtered by [`is_eligible`]) found in `folder`.
pub(crate) fn route(ctx: &mut RunContext<'_>, folder: NodeId, files: &[PathBuf]) {
    if files.is_empty() {
        return;
    }
    if ctx.options.only_docs {
        tracing::debug!(count = files.len(), "documents-only run, attachments not uploaded");
        return;
    }

    let Some(target) = upload_target(&ctx.tree, folder) else {
        tracing::debug!(
            folder = %ctx.tree.node(folder).path.display(),
            count = files.len(),
            "no alive folder above, attachments not uploaded"
        );
        return;
    };

    let Some(page) = ctx.tree.node(target).remote_id().cloned() else {
        for file in files {
            let err = SyncError::ParentUnsynced { path: file.clone() };
            ctx.skip_path(file, &err);
        }
        return;
    };

    for file in files {
        match ctx.store.upload_attachment(file, &page) {
            Ok(()) => {
                tracing::info!(file = %file.display(), page = %page, "uploaded attachment");
                ctx.report.uploaded += 1;
            }
            Err(err) => ctx.skip_path(file, &SyncError::from(err)),
        }
    }
}
