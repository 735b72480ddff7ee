//! # treemirror-confluence
//!
//! [`ContentStore`](treemirror_core::ContentStore) implementation backed by
//! the Confluence content REST API.
//!
//! ```rust,no_run
//! use treemirror_confluence::{ClientSettings, ConfluenceClient};
//! use treemirror_core::ContentStore;
//!
//! let settings = ClientSettings::new("https://example.atlassian.net", "ENG", "token")
//!     .with_username(Some("bot@example.com".into()));
//! if let Ok(client) = ConfluenceClient::new(settings) {
//!     if let Ok(Some(page)) = client.find_page("docs", false) {
//!         println!("docs is page {} (v{})", page.id, page.version);
//!     }
//! }
//! ```

mod api;
pub mod client;
mod multipart;

pub use client::{ClientSettings, ConfluenceClient};
