//! Blocking Confluence REST client implementing [`ContentStore`].
//!
//! | Operation          | Request                                               |
//! |--------------------|-------------------------------------------------------|
//! | find page          | `GET  /wiki/rest/api/content?spaceKey&title&type=page`|
//! | child pages        | `GET  /wiki/rest/api/content/{id}/child/page`         |
//! | create page        | `POST /wiki/rest/api/content`                         |
//! | update page        | `PUT  /wiki/rest/api/content/{id}`                    |
//! | delete page        | `DELETE /wiki/rest/api/content/{id}`                  |
//! | upload attachment  | `PUT  /wiki/rest/api/content/{id}/child/attachment`   |

use std::path::Path;
use std::time::Duration;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use treemirror_core::{
    ContentStore, HttpConfig, PageContent, PageId, PageMatch, PageSummary, StoreError,
};

use crate::api;
use crate::multipart;

const CHILD_PAGE_LIMIT: usize = 100;
const ERROR_BODY_LIMIT: usize = 512;

/// Everything needed to talk to one Confluence space.
#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub base_url: String,
    pub space: String,
    pub api_key: String,
    /// Basic auth user; bearer auth with `api_key` when `None`.
    pub username: Option<String>,
    pub timeout: Duration,
    pub retries: u32,
    pub backoff: Duration,
}

impl ClientSettings {
    pub fn new(base_url: impl Into<String>, space: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self::from_http(base_url, space, api_key, &HttpConfig::default())
    }

    pub fn from_http(
        base_url: impl Into<String>,
        space: impl Into<String>,
        api_key: impl Into<String>,
        http: &HttpConfig,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            space: space.into(),
            api_key: api_key.into(),
            username: None,
            timeout: Duration::from_secs(http.timeout_secs),
            retries: http.retries,
            backoff: Duration::from_millis(http.backoff_ms),
        }
    }

    pub fn with_username(mut self, username: Option<String>) -> Self {
        self.username = username.filter(|u| !u.trim().is_empty());
        self
    }
}

/// Confluence content API client.
pub struct ConfluenceClient {
    agent: ureq::Agent,
    base_url: String,
    space: String,
    authorization: String,
    retries: u32,
    backoff: Duration,
}

impl std::fmt::Debug for ConfluenceClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfluenceClient")
            .field("base_url", &self.base_url)
            .field("space", &self.space)
            .finish_non_exhaustive()
    }
}

impl ConfluenceClient {
    /// Validate settings and build the HTTP agent. No request is sent.
    pub fn new(settings: ClientSettings) -> Result<Self, StoreError> {
        if settings.api_key.trim().is_empty() {
            return Err(StoreError::Config("API key is empty".into()));
        }
        if settings.space.trim().is_empty() {
            return Err(StoreError::Config("space key is empty".into()));
        }
        let base_url = settings.base_url.trim().trim_end_matches('/').to_owned();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(StoreError::Config(format!(
                "base URL '{}' must start with http:// or https://",
                settings.base_url
            )));
        }

        let authorization = authorization_header(settings.username.as_deref(), &settings.api_key);
        let agent = ureq::AgentBuilder::new().timeout(settings.timeout).build();

        Ok(Self {
            agent,
            base_url,
            space: settings.space.trim().to_owned(),
            authorization,
            retries: settings.retries,
            backoff: settings.backoff,
        })
    }

    fn content_url(&self) -> String {
        format!("{}/wiki/rest/api/content", self.base_url)
    }

    fn page_url(&self, id: &PageId) -> String {
        format!("{}/{}", self.content_url(), id)
    }

    /// Run `call`, retrying transport errors, 429 and 5xx responses.
    fn execute<F>(&self, method: &'static str, url: &str, mut call: F) -> Result<ureq::Response, StoreError>
    where
        F: FnMut() -> Result<ureq::Response, ureq::Error>,
    {
        let mut attempt = 0u32;
        loop {
            match call() {
                Ok(resp) => return Ok(resp),
                Err(ureq::Error::Status(status, resp)) => {
                    if is_transient(status) && attempt < self.retries {
                        tracing::warn!(method, url, status, attempt, "transient HTTP status, retrying");
                    } else {
                        let body = resp.into_string().unwrap_or_default();
                        return Err(StoreError::Status {
                            method,
                            url: url.to_owned(),
                            status,
                            body: truncate(body),
                        });
                    }
                }
                Err(ureq::Error::Transport(t)) => {
                    if attempt < self.retries {
                        tracing::warn!(method, url, error = %t, attempt, "transport error, retrying");
                    } else {
                        return Err(StoreError::Transport(t.to_string()));
                    }
                }
            }
            attempt += 1;
            std::thread::sleep(self.backoff * attempt);
        }
    }
}

impl ContentStore for ConfluenceClient {
    fn find_page(&self, title: &str, with_children: bool) -> Result<Option<PageMatch>, StoreError> {
        let url = self.content_url();
        let resp = self.execute("GET", &url, || {
            self.agent
                .get(&url)
                .set("Authorization", &self.authorization)
                .set("Accept", "application/json")
                .query("spaceKey", &self.space)
                .query("title", title)
                .query("type", "page")
                .query("expand", "version")
                .call()
        })?;
        let list: api::ContentList = decode(resp)?;

        let Some(item) = list.results.into_iter().next() else {
            tracing::debug!(title, "page not found");
            return Ok(None);
        };

        let id = PageId::from(item.id);
        let version = item.version.map(|v| v.number).unwrap_or(1);
        let children = if with_children {
            self.child_pages(&id)?
        } else {
            Vec::new()
        };

        Ok(Some(PageMatch {
            id,
            title: item.title,
            version,
            children,
        }))
    }

    fn child_pages(&self, id: &PageId) -> Result<Vec<PageSummary>, StoreError> {
        let url = format!("{}/child/page", self.page_url(id));
        let limit = CHILD_PAGE_LIMIT.to_string();
        let mut start = 0usize;
        let mut children = Vec::new();

        loop {
            let start_param = start.to_string();
            let resp = self.execute("GET", &url, || {
                self.agent
                    .get(&url)
                    .set("Authorization", &self.authorization)
                    .set("Accept", "application/json")
                    .query("limit", &limit)
                    .query("start", &start_param)
                    .call()
            })?;
            let list: api::ContentList = decode(resp)?;
            let next = list.next_start();
            children.extend(list.results.into_iter().map(PageSummary::from));
            match next {
                Some(n) if n > start => start = n,
                _ => break,
            }
        }

        Ok(children)
    }

    fn create_page(&self, parent: Option<&PageId>, content: &PageContent) -> Result<PageId, StoreError> {
        let url = self.content_url();
        let payload = api::NewPage {
            kind: "page",
            title: content.title(),
            space: api::SpaceRef { key: &self.space },
            ancestors: parent
                .map(|p| vec![api::AncestorRef { id: p.as_str() }])
                .unwrap_or_default(),
            body: api::Body::storage(content),
        };
        let resp = self.execute("POST", &url, || {
            self.agent
                .post(&url)
                .set("Authorization", &self.authorization)
                .set("Accept", "application/json")
                .send_json(&payload)
        })?;
        let created: api::Created = decode(resp)?;
        tracing::debug!(title = content.title(), id = %created.id, "created page");
        Ok(PageId::from(created.id))
    }

    fn update_page(&self, id: &PageId, current_version: u64, content: &PageContent) -> Result<(), StoreError> {
        let url = self.page_url(id);
        let payload = api::PageUpdate {
            id: id.as_str(),
            kind: "page",
            title: content.title(),
            version: api::VersionRef {
                number: current_version + 1,
            },
            body: api::Body::storage(content),
        };
        self.execute("PUT", &url, || {
            self.agent
                .put(&url)
                .set("Authorization", &self.authorization)
                .set("Accept", "application/json")
                .send_json(&payload)
        })?;
        Ok(())
    }

    fn delete_page(&self, id: &PageId) -> Result<(), StoreError> {
        let url = self.page_url(id);
        self.execute("DELETE", &url, || {
            self.agent
                .delete(&url)
                .set("Authorization", &self.authorization)
                .call()
        })?;
        Ok(())
    }

    fn upload_attachment(&self, file: &Path, page: &PageId) -> Result<(), StoreError> {
        let data = std::fs::read(file).map_err(|source| StoreError::Io {
            path: file.to_path_buf(),
            source,
        })?;
        let file_name = file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "attachment".to_owned());
        let form = multipart::encode_file(&file_name, &data);
        let content_type = form.content_type();

        let url = format!("{}/child/attachment", self.page_url(page));
        self.execute("PUT", &url, || {
            self.agent
                .put(&url)
                .set("Authorization", &self.authorization)
                .set("X-Atlassian-Token", "no-check")
                .set("Content-Type", &content_type)
                .send_bytes(&form.body)
        })?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

fn authorization_header(username: Option<&str>, api_key: &str) -> String {
    match username {
        Some(user) => format!("Basic {}", STANDARD.encode(format!("{user}:{api_key}"))),
        None => format!("Bearer {api_key}"),
    }
}

fn is_transient(status: u16) -> bool {
    status == 429 || (500..600).contains(&status)
}

fn decode<T: serde::de::DeserializeOwned>(resp: ureq::Response) -> Result<T, StoreError> {
    resp.into_json::<T>()
        .map_err(|e| StoreError::Decode(e.to_string()))
}

fn truncate(mut body: String) -> String {
    if body.len() > ERROR_BODY_LIMIT {
        let mut cut = ERROR_BODY_LIMIT;
        while !body.is_char_boundary(cut) {
            cut -= 1;
        }
        body.truncate(cut);
        body.push('…');
    }
    body
}
