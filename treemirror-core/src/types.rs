//! Domain types shared by the store client, the renderer and the sync engine.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// Opaque identifier of a remote page.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PageId(pub String);

impl PageId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for PageId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for PageId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<u64> for PageId {
    fn from(n: u64) -> Self {
        Self(n.to_string())
    }
}

// ---------------------------------------------------------------------------
// Page payloads
// ---------------------------------------------------------------------------

/// Front-matter style metadata attached to a rendered page.
pub type Metadata = BTreeMap<String, serde_yaml::Value>;

/// A rendered page ready to be pushed to the store.
///
/// The title is validated on construction and can never be empty.
#[derive(Debug, Clone, PartialEq)]
pub struct PageContent {
    title: String,
    pub metadata: Metadata,
    pub body: String,
}

impl PageContent {
    /// Build a page; fails with [`CoreError::EmptyTitle`] for a blank title.
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Result<Self, CoreError> {
        let title = validate_title(title.into())?;
        Ok(Self {
            title,
            metadata: Metadata::new(),
            body: body.into(),
        })
    }

    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Replace the title, e.g. after collision disambiguation.
    pub fn retitle(&mut self, title: impl Into<String>) -> Result<(), CoreError> {
        self.title = validate_title(title.into())?;
        Ok(())
    }
}

fn validate_title(title: String) -> Result<String, CoreError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(CoreError::EmptyTitle);
    }
    if trimmed.len() == title.len() {
        Ok(title)
    } else {
        Ok(trimmed.to_owned())
    }
}

/// A direct child page as reported by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSummary {
    pub id: PageId,
    pub title: String,
}

/// Result of an exact title lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageMatch {
    pub id: PageId,
    pub title: String,
    /// Version currently stored remotely.
    pub version: u64,
    /// Direct children; only populated when requested.
    pub children: Vec<PageSummary>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
