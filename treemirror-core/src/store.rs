//! The remote content store seen by the sync engine.

use std::path::Path;

use crate::error::StoreError;
use crate::types::{PageContent, PageId, PageMatch, PageSummary};

/// Title-keyed CRUD over a single namespace of a hierarchical page store.
///
/// Every call is blocking. Implementations may retry transient transport
/// failures internally; callers never retry.
pub trait ContentStore {
    /// Exact title lookup. With `with_children`, the match also lists its
    /// direct child pages.
    fn find_page(&self, title: &str, with_children: bool) -> Result<Option<PageMatch>, StoreError>;

    /// Direct child pages of `id`.
    fn child_pages(&self, id: &PageId) -> Result<Vec<PageSummary>, StoreError>;

    /// Create a page under `parent`, or at the namespace root for `None`.
    fn create_page(&self, parent: Option<&PageId>, content: &PageContent) -> Result<PageId, StoreError>;

    /// Replace a page's content. `current_version` is the version last
    /// observed; the store writes `current_version + 1`.
    fn update_page(&self, id: &PageId, current_version: u64, content: &PageContent) -> Result<(), StoreError>;

    fn delete_page(&self, id: &PageId) -> Result<(), StoreError>;

    /// Attach a local file to a page, replacing an attachment of the same name.
    fn upload_attachment(&self, file: &Path, page: &PageId) -> Result<(), StoreError>;
}

impl<T: ContentStore + ?Sized> ContentStore for &T {
    fn find_page(&self, title: &str, with_children: bool) -> Result<Option<PageMatch>, StoreError> {
        (**self).find_page(title, with_children)
    }

    fn child_pages(&self, id: &PageId) -> Result<Vec<PageSummary>, StoreError> {
        (**self).child_pages(id)
    }

    fn create_page(&self, parent: Option<&PageId>, content: &PageContent) -> Result<PageId, StoreError> {
        (**self).create_page(parent, content)
    }

    fn update_page(&self, id: &PageId, current_version: u64, content: &PageContent) -> Result<(), StoreError> {
        (**self).update_page(id, current_version, content)
    }

    fn delete_page(&self, id: &PageId) -> Result<(), StoreError> {
        (**self).delete_page(id)
    }

    fn upload_attachment(&self, file: &Path, page: &PageId) -> Result<(), StoreError> {
        (**self).upload_attachment(file, page)
    }
}
