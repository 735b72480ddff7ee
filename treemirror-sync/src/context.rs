//! Per-run state shared by the reconciler, the attachment gate and the scrubber.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use treemirror_core::{ContentStore, MirrorConfig, PageId, PageTree, TitleRegistry};
use treemirror_renderer::ContentRenderer;

use crate::error::SyncError;

/// What to mirror and where.
#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// Local directory to mirror.
    pub root: PathBuf,
    /// Existing page the mirror hangs under; `None` creates top-level pages
    /// at the namespace root.
    pub master_page: Option<PageId>,
    /// Skip attachments and only push documents.
    pub only_docs: bool,
    pub config: MirrorConfig,
}

impl SyncOptions {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            master_page: None,
            only_docs: false,
            config: MirrorConfig::default(),
        }
    }

    pub fn with_master_page(mut self, master_page: Option<PageId>) -> Self {
        self.master_page = master_page;
        self
    }

    pub fn with_only_docs(mut self, only_docs: bool) -> Self {
        self.only_docs = only_docs;
        self
    }

    pub fn with_config(mut self, config: MirrorConfig) -> Self {
        self.config = config;
        self
    }
}

/// A recoverable failure, logged and skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    /// Path or page title the failure concerns.
    pub subject: String,
    pub error: String,
}

/// Counters and failures collected over one run.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub created: usize,
    pub updated: usize,
    pub deleted: usize,
    pub uploaded: usize,
    pub failures: Vec<Failure>,
}

impl RunReport {
    fn new() -> Self {
        Self {
            started_at: Utc::now(),
            finished_at: None,
            created: 0,
            updated: 0,
            deleted: 0,
            uploaded: 0,
            failures: Vec::new(),
        }
    }

    pub fn skipped(&self) -> usize {
        self.failures.len()
    }

    pub fn elapsed(&self) -> chrono::Duration {
        self.finished_at.unwrap_or_else(Utc::now) - self.started_at
    }
}

/// Explicit run context threaded through every sync step.
pub struct RunContext<'a> {
    pub store: &'a dyn ContentStore,
    pub renderer: &'a dyn ContentRenderer,
    pub options: &'a SyncOptions,
    pub tree: PageTree,
    pub titles: TitleRegistry,
    pub report: RunReport,
}

impl<'a> RunContext<'a> {
    pub fn new(
        store: &'a dyn ContentStore,
        renderer: &'a dyn ContentRenderer,
        options: &'a SyncOptions,
    ) -> Self {
        Self {
            store,
            renderer,
            options,
            tree: PageTree::with_root(options.root.clone()),
            titles: TitleRegistry::new(),
            report: RunReport::new(),
        }
    }

    /// Log a recoverable failure and keep going.
    pub(crate) fn skip(&mut self, subject: impl AsRef<str>, err: &SyncError) {
        let subject = subject.as_ref();
        tracing::warn!(subject, error = %err, "skipped");
        self.report.failures.push(Failure {
            subject: subject.to_owned(),
            error: err.to_string(),
        });
    }

    pub(crate) fn skip_path(&mut self, path: &Path, err: &SyncError) {
        self.skip(path.display().to_string(), err);
    }

    /// Path relative to the mirrored root, `/`-separated, root name first.
    pub(crate) fn relative_display(&self, path: &Path) -> String {
        let mut parts = vec![root_name(&self.options.root)];
        if let Ok(rel) = path.strip_prefix(&self.options.root) {
            parts.extend(rel.components().map(|c| c.as_os_str().to_string_lossy().into_owned()));
        }
        parts.join("/")
    }
}

/// Display name of a directory: its last component, or the whole path for `/`.
pub(crate) fn root_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
