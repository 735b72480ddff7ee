//! In-memory `ContentStore` that records every call, for engine tests.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use treemirror_core::{ContentStore, PageContent, PageId, PageMatch, PageSummary, StoreError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FakePage {
    pub id: PageId,
    pub title: String,
    pub parent: Option<PageId>,
    pub version: u64,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Find { title: String, with_children: bool },
    Children(PageId),
    Create { title: String, parent: Option<PageId> },
    Update { id: PageId, new_version: u64 },
    Delete(PageId),
    Upload { file: String, page: PageId },
}

impl Call {
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            Call::Create { .. } | Call::Update { .. } | Call::Delete(_) | Call::Upload { .. }
        )
    }
}

#[derive(Default)]
struct State {
    pages: BTreeMap<u64, FakePage>,
    next_id: u64,
    calls: Vec<Call>,
    attachments: Vec<(String, PageId)>,
    fail_create: HashSet<String>,
    fail_delete: HashSet<PageId>,
    fail_upload: HashSet<String>,
    fail_children: HashSet<PageId>,
}

#[derive(Default)]
pub struct FakeStore {
    state: RefCell<State>,
}

fn failure(what: &str) -> StoreError {
    StoreError::Status {
        method: "TEST",
        url: what.to_owned(),
        status: 500,
        body: "injected failure".into(),
    }
}

impl FakeStore {
    pub fn new() -> Self {
        let store = Self::default();
        store.state.borrow_mut().next_id = 100;
        store
    }

    /// Insert a page directly, bypassing the call log.
    pub fn seed(&self, title: &str, parent: Option<&PageId>) -> PageId {
        let mut st = self.state.borrow_mut();
        let n = st.next_id;
        st.next_id += 1;
        let id = PageId::from(n);
        st.pages.insert(
            n,
            FakePage {
                id: id.clone(),
                title: title.to_owned(),
                parent: parent.cloned(),
                version: 1,
                body: String::new(),
            },
        );
        id
    }

    pub fn fail_create_for(&self, title: &str) {
        self.state.borrow_mut().fail_create.insert(title.to_owned());
    }

    pub fn fail_delete_for(&self, id: &PageId) {
        self.state.borrow_mut().fail_delete.insert(id.clone());
    }

    /// Uploads of files with this name fail.
    pub fn fail_upload_for(&self, file_name: &str) {
        self.state.borrow_mut().fail_upload.insert(file_name.to_owned());
    }

    /// Listing the children of `id` fails, whether by id or by title lookup.
    pub fn fail_children_for(&self, id: &PageId) {
        self.state.borrow_mut().fail_children.insert(id.clone());
    }

    pub fn page(&self, title: &str) -> Option<FakePage> {
        self.state
            .borrow()
            .pages
            .values()
            .find(|p| p.title == title)
            .cloned()
    }

    pub fn titles(&self) -> BTreeSet<String> {
        self.state.borrow().pages.values().map(|p| p.title.clone()).collect()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.borrow().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state.borrow_mut().calls.clear();
    }

    pub fn deleted(&self) -> Vec<PageId> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Delete(id) => Some(id),
                _ => None,
            })
            .collect()
    }

    pub fn created_titles(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Create { title, .. } => Some(title),
                _ => None,
            })
            .collect()
    }

    pub fn attachments(&self) -> Vec<(String, PageId)> {
        self.state.borrow().attachments.clone()
    }

    fn log(&self, call: Call) {
        self.state.borrow_mut().calls.push(call);
    }
}

impl ContentStore for FakeStore {
    fn find_page(&self, title: &str, with_children: bool) -> Result<Option<PageMatch>, StoreError> {
        self.log(Call::Find {
            title: title.to_owned(),
            with_children,
        });
        let st = self.state.borrow();
        let Some(page) = st.pages.values().find(|p| p.title == title) else {
            return Ok(None);
        };
        if with_children && st.fail_children.contains(&page.id) {
            return Err(failure(title));
        }
        let children = if with_children {
            st.pages
                .values()
                .filter(|c| c.parent.as_ref() == Some(&page.id))
                .map(|c| PageSummary {
                    id: c.id.clone(),
                    title: c.title.clone(),
                })
                .collect()
        } else {
            Vec::new()
        };
        Ok(Some(PageMatch {
            id: page.id.clone(),
            title: page.title.clone(),
            version: page.version,
            children,
        }))
    }

    fn child_pages(&self, id: &PageId) -> Result<Vec<PageSummary>, StoreError> {
        self.log(Call::Children(id.clone()));
        let st = self.state.borrow();
        if st.fail_children.contains(id) {
            return Err(failure(id.as_str()));
        }
        let children = st
            .pages
            .values()
            .filter(|c| c.parent.as_ref() == Some(id))
            .map(|c| PageSummary {
                id: c.id.clone(),
                title: c.title.clone(),
            })
            .collect();
        Ok(children)
    }

    fn create_page(&self, parent: Option<&PageId>, content: &PageContent) -> Result<PageId, StoreError> {
        self.log(Call::Create {
            title: content.title().to_owned(),
            parent: parent.cloned(),
        });
        if self.state.borrow().fail_create.contains(content.title()) {
            return Err(failure(content.title()));
        }
        let id = self.seed(content.title(), parent);
        let mut st = self.state.borrow_mut();
        if let Some(page) = st.pages.values_mut().find(|p| p.id == id) {
            page.body = content.body.clone();
        }
        Ok(id)
    }

    fn update_page(&self, id: &PageId, current_version: u64, content: &PageContent) -> Result<(), StoreError> {
        self.log(Call::Update {
            id: id.clone(),
            new_version: current_version + 1,
        });
        let mut st = self.state.borrow_mut();
        let page = st
            .pages
            .values_mut()
            .find(|p| &p.id == id)
            .ok_or_else(|| failure(id.as_str()))?;
        page.version = current_version + 1;
        page.title = content.title().to_owned();
        page.body = content.body.clone();
        Ok(())
    }

    fn delete_page(&self, id: &PageId) -> Result<(), StoreError> {
        self.log(Call::Delete(id.clone()));
        let mut st = self.state.borrow_mut();
        if st.fail_delete.contains(id) {
            return Err(failure(id.as_str()));
        }
        let key = st
            .pages
            .iter()
            .find(|(_, p)| &p.id == id)
            .map(|(k, _)| *k)
            .ok_or_else(|| failure(id.as_str()))?;
        let removed = st.pages.remove(&key).expect("present");
        // remaining children move up to the deleted page's parent
        for page in st.pages.values_mut() {
            if page.parent.as_ref() == Some(id) {
                page.parent = removed.parent.clone();
            }
        }
        Ok(())
    }

    fn upload_attachment(&self, file: &Path, page: &PageId) -> Result<(), StoreError> {
        let name = file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.log(Call::Upload {
            file: name.clone(),
            page: page.clone(),
        });
        let mut st = self.state.borrow_mut();
        if st.fail_upload.contains(&name) {
            return Err(failure(&name));
        }
        st.attachments.push((name, page.clone()));
        Ok(())
    }
}

/// Write `files` (relative path → contents) under `root`, creating folders.
/// A path ending in `/` creates an empty directory.
pub fn write_tree(root: &Path, files: &[(&str, &str)]) -> PathBuf {
    fs::create_dir_all(root).expect("create root");
    for (rel, contents) in files {
        let path = root.join(rel);
        if rel.ends_with('/') {
            fs::create_dir_all(&path).expect("mkdir");
            continue;
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("mkdir parent");
        }
        fs::write(&path, contents).expect("write file");
    }
    root.to_path_buf()
}
