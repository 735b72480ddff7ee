//! Wire types for the Confluence content REST API.

use serde::{Deserialize, Serialize};

use treemirror_core::{PageContent, PageSummary};

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub(crate) struct NewPage<'a> {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub title: &'a str,
    pub space: SpaceRef<'a>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ancestors: Vec<AncestorRef<'a>>,
    pub body: Body<'a>,
}

#[derive(Debug, Serialize)]
pub(crate) struct PageUpdate<'a> {
    pub id: &'a str,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub title: &'a str,
    pub version: VersionRef,
    pub body: Body<'a>,
}

#[derive(Debug, Serialize)]
pub(crate) struct SpaceRef<'a> {
    pub key: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct AncestorRef<'a> {
    pub id: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct VersionRef {
    pub number: u64,
}

#[derive(Debug, Serialize)]
pub(crate) struct Body<'a> {
    pub storage: Storage<'a>,
}

#[derive(Debug, Serialize)]
pub(crate) struct Storage<'a> {
    pub value: &'a str,
    pub representation: &'static str,
}

impl<'a> Body<'a> {
    pub fn storage(content: &'a PageContent) -> Self {
        Self {
            storage: Storage {
                value: &content.body,
                representation: "storage",
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub(crate) struct ContentList {
    #[serde(default)]
    pub results: Vec<ContentItem>,
    #[serde(default)]
    pub start: usize,
    #[serde(default, rename = "_links")]
    pub links: Links,
}

impl ContentList {
    /// Offset of the following page, if the server advertises one.
    ///
    /// The server may return fewer results than requested, so only the
    /// `next` link says whether more remain.
    pub fn next_start(&self) -> Option<usize> {
        if self.links.next.is_none() || self.results.is_empty() {
            return None;
        }
        Some(self.start + self.results.len())
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct Links {
    #[serde(default)]
    pub next: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ContentItem {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub version: Option<Version>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Version {
    pub number: u64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Created {
    pub id: String,
}

impl From<ContentItem> for PageSummary {
    fn from(item: ContentItem) -> Self {
        PageSummary {
            id: item.id.into(),
            title: item.title,
        }
    }
}
