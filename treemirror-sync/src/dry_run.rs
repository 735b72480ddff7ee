//! Read-only store wrapper for `--dry-run`.
//!
//! Lookups go to the wrapped store; creates, updates, deletes and uploads are
//! logged and counted but never sent. Pages "created" during the run get
//! synthetic ids and are answered locally by later lookups.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::path::Path;

use treemirror_core::{ContentStore, PageContent, PageId, PageMatch, PageSummary, StoreError};

const SYNTHETIC_PREFIX: &str = "dry-run-";

/// Wraps a store so that no mutation reaches it.
pub struct DryRunStore<S> {
    inner: S,
    created: RefCell<HashMap<String, PageId>>,
    next_id: Cell<u64>,
}

impl<S: ContentStore> DryRunStore<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            created: RefCell::new(HashMap::new()),
            next_id: Cell::new(1),
        }
    }

    fn is_synthetic(id: &PageId) -> bool {
        id.as_str().starts_with(SYNTHETIC_PREFIX)
    }
}

impl<S: ContentStore> ContentStore for DryRunStore<S> {
    fn find_page(&self, title: &str, with_children: bool) -> Result<Option<PageMatch>, StoreError> {
        if let Some(id) = self.created.borrow().get(title) {
            return Ok(Some(PageMatch {
                id: id.clone(),
                title: title.to_owned(),
                version: 1,
                children: Vec::new(),
            }));
        }
        self.inner.find_page(title, with_children)
    }

    fn child_pages(&self, id: &PageId) -> Result<Vec<PageSummary>, StoreError> {
        if Self::is_synthetic(id) {
            return Ok(Vec::new());
        }
        self.inner.child_pages(id)
    }

    fn create_page(&self, parent: Option<&PageId>, content: &PageContent) -> Result<PageId, StoreError> {
        let n = self.next_id.get();
        self.next_id.set(n + 1);
        let id = PageId::from(format!("{SYNTHETIC_PREFIX}{n}"));
        tracing::info!(
            title = content.title(),
            parent = parent.map(PageId::as_str).unwrap_or("<root>"),
            "[dry-run] would create page"
        );
        self.created
            .borrow_mut()
            .insert(content.title().to_owned(), id.clone());
        Ok(id)
    }

    fn update_page(&self, id: &PageId, current_version: u64, content: &PageContent) -> Result<(), StoreError> {
        tracing::info!(
            title = content.title(),
            id = %id,
            version = current_version + 1,
            "[dry-run] would update page"
        );
        Ok(())
    }

    fn delete_page(&self, id: &PageId) -> Result<(), StoreError> {
        tracing::info!(id = %id, "[dry-run] would delete page");
        Ok(())
    }

    fn upload_attachment(&self, file: &Path, page: &PageId) -> Result<(), StoreError> {
        tracing::info!(file = %file.display(), page = %page, "[dry-run] would upload attachment");
        Ok(())
    }
}
