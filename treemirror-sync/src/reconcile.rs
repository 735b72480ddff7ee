//! Tree reconciler.
//!
//! Each folder goes through two steps:
//!
//! 1. **probe**: look one level deep for a document. Finding one makes the
//!    folder *alive*. No remote calls, no nodes created.
//! 2. **commit**: an alive folder gets a landing page and one child page per
//!    document; attachments go through the gate; then every subfolder is
//!    walked the same way. Subfolders hang off the nearest alive ancestor, so
//!    dead folders never get a page.
//!
//! Failures below the root are logged against the entry and skipped.

use std::fs;
use std::path::{Path, PathBuf};

use treemirror_core::registry::title_candidates;
use treemirror_core::{MirrorConfig, NodeId, NodeKind, PageContent, PageId};

use crate::attachments;
use crate::context::{root_name, RunContext};
use crate::error::{io_err, SyncError};

/// Immediate entries of one folder, sorted by file name.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FolderListing {
    pub documents: Vec<PathBuf>,
    pub attachments: Vec<PathBuf>,
    pub folders: Vec<PathBuf>,
}

/// Classify the entries of `dir` one level deep.
///
/// Symlinks are not followed; ignored directory names are dropped; files that
/// are neither documents nor attachment candidates are dropped.
pub fn list_folder(dir: &Path, config: &MirrorConfig) -> Result<FolderListing, SyncError> {
    let mut entries = fs::read_dir(dir)
        .map_err(|e| io_err(dir, e))?
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| io_err(dir, e))?;
    entries.sort_by_key(|e| e.file_name());

    let mut listing = FolderListing::default();
    for entry in entries {
        let path = entry.path();
        let file_type = entry.file_type().map_err(|e| io_err(&path, e))?;
        if file_type.is_dir() {
            if !config.is_ignored(&entry.file_name().to_string_lossy()) {
                listing.folders.push(path);
            }
        } else if file_type.is_file() {
            if config.is_document(&path) {
                listing.documents.push(path);
            } else if attachments::is_eligible(config, &path) {
                listing.attachments.push(path);
            }
        }
    }
    Ok(listing)
}

/// First document directly inside `dir`, if any.
pub fn find_first_document(dir: &Path, config: &MirrorConfig) -> Result<Option<PathBuf>, SyncError> {
    for entry in fs::read_dir(dir).map_err(|e| io_err(dir, e))? {
        let entry = entry.map_err(|e| io_err(dir, e))?;
        let path = entry.path();
        let is_file = entry.file_type().map_err(|e| io_err(&path, e))?.is_file();
        if is_file && config.is_document(&path) {
            return Ok(Some(path));
        }
    }
    Ok(None)
}

/// Reconcile the whole tree starting at the run's root.
///
/// Only a failure to read the root folder itself is returned; anything deeper
/// is recorded in the run report.
pub fn reconcile(ctx: &mut RunContext<'_>) -> Result<(), SyncError> {
    let root = ctx.tree.root();
    walk(ctx, root)
}

fn walk(ctx: &mut RunContext<'_>, folder: NodeId) -> Result<(), SyncError> {
    probe_folder(ctx, folder)?;
    let path = ctx.tree.node(folder).path.clone();
    let listing = list_folder(&path, &ctx.options.config)?;
    commit_folder(ctx, folder, &listing);
    Ok(())
}

/// Settle the `alive` flag of `folder`.
pub(crate) fn probe_folder(ctx: &mut RunContext<'_>, folder: NodeId) -> Result<bool, SyncError> {
    let path = ctx.tree.node(folder).path.clone();
    let first = find_first_document(&path, &ctx.options.config)?;
    match &first {
        Some(doc) => tracing::debug!(folder = %path.display(), document = %doc.display(), "alive"),
        None => tracing::debug!(folder = %path.display(), "dead, elided from hierarchy"),
    }
    let alive = first.is_some();
    ctx.tree.set_alive(folder, alive);
    Ok(alive)
}

fn commit_folder(ctx: &mut RunContext<'_>, folder: NodeId, listing: &FolderListing) {
    if ctx.tree.node(folder).alive {
        if let Err(err) = sync_folder_page(ctx, folder) {
            let path = ctx.tree.node(folder).path.clone();
            ctx.skip_path(&path, &err);
        }
        for doc in &listing.documents {
            let file = ctx.tree.add_child(folder, doc.clone(), NodeKind::File);
            if let Err(err) = sync_document(ctx, file) {
                ctx.skip_path(doc, &err);
            }
        }
    }

    attachments::route(ctx, folder, &listing.attachments);

    for sub in &listing.folders {
        let child = ctx.tree.add_child(folder, sub.clone(), NodeKind::Folder);
        if let Err(err) = walk(ctx, child) {
            ctx.skip_path(sub, &err);
        }
    }
}

fn sync_folder_page(ctx: &mut RunContext<'_>, folder: NodeId) -> Result<PageId, SyncError> {
    let path = ctx.tree.node(folder).path.clone();
    let parent = parent_page(ctx, folder)?;
    let title = claim_title(ctx, &path, &root_name(&path));
    let content = ctx
        .renderer
        .folder_page(&title, &ctx.relative_display(&path))?;
    synchronize(ctx, folder, parent, content)
}

fn sync_document(ctx: &mut RunContext<'_>, file: NodeId) -> Result<PageId, SyncError> {
    let path = ctx.tree.node(file).path.clone();
    let parent = parent_page(ctx, file)?;
    let raw = fs::read(&path).map_err(|e| io_err(&path, e))?;
    let mut content = ctx.renderer.render(parent.as_ref(), &path, &raw)?;
    let title = claim_title(ctx, &path, content.title());
    content.retitle(title)?;
    synchronize(ctx, file, parent, content)
}

/// Page that `node`'s page is created under.
fn parent_page(ctx: &RunContext<'_>, node: NodeId) -> Result<Option<PageId>, SyncError> {
    let n = ctx.tree.node(node);
    match n.logical_parent {
        None => Ok(ctx.options.master_page.clone()),
        Some(parent) => ctx
            .tree
            .node(parent)
            .remote_id()
            .cloned()
            .map(Some)
            .ok_or_else(|| SyncError::ParentUnsynced {
                path: n.path.clone(),
            }),
    }
}

fn claim_title(ctx: &mut RunContext<'_>, path: &Path, base: &str) -> String {
    let ancestors = ancestor_names(&ctx.options.root, path);
    ctx.titles
        .claim(title_candidates(base, &ancestors))
        .unwrap_or_else(|| base.trim().to_owned())
}

/// Names of the folders containing `path`, root first. Empty for the root.
fn ancestor_names(root: &Path, path: &Path) -> Vec<String> {
    let Ok(rel) = path.strip_prefix(root) else {
        return Vec::new();
    };
    let parts: Vec<String> = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    if parts.is_empty() {
        return Vec::new();
    }
    let mut names = vec![root_name(root)];
    names.extend_from_slice(&parts[..parts.len() - 1]);
    names
}

/// Create or update the page for `node` and record its title.
///
/// A title already present remotely is updated in place (version + 1);
/// otherwise a new page is created under `parent`.
pub(crate) fn synchronize(
    ctx: &mut RunContext<'_>,
    node: NodeId,
    parent: Option<PageId>,
    content: PageContent,
) -> Result<PageId, SyncError> {
    let title = content.title().to_owned();
    let id = match ctx.store.find_page(&title, false)? {
        None => {
            let id = ctx.store.create_page(parent.as_ref(), &content)?;
            tracing::info!(title = %title, id = %id, "created page");
            ctx.report.created += 1;
            id
        }
        Some(existing) => {
            ctx.store
                .update_page(&existing.id, existing.version, &content)?;
            tracing::info!(
                title = %title,
                id = %existing.id,
                version = existing.version + 1,
                "updated page"
            );
            ctx.report.updated += 1;
            existing.id
        }
    };

    ctx.tree.assign_remote(node, id.clone(), title.clone())?;
    ctx.titles.record(&title);
    Ok(id)
}
