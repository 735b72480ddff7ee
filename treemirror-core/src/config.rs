//! Optional YAML configuration.
//!
//! # Storage layout
//!
//! ```text
//! ~/.treemirror/
//!   config.yaml      (optional; defaults apply when absent)
//! ```
//!
//! # API pattern
//!
//! - `load_at(home: &Path)`: explicit home; used in tests with `TempDir`
//! - `load()`: derives home from `dirs::home_dir()`, delegates to `load_at`
//! - `load_from(path)`: an explicitly requested file; absence is an error
//!
//! Command-line values always override what the file says.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{io_err, CoreError};

/// Tool configuration with defaults for every field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MirrorConfig {
    /// Store base URL, used when none is given on the command line.
    pub base_url: Option<String>,
    /// Account name for HTTP basic auth; bearer auth is used when absent.
    pub username: Option<String>,
    /// Directory names that are never descended into.
    pub ignore: Vec<String>,
    /// Extensions (without dot, case-sensitive) of files that become pages.
    pub document_extensions: Vec<String>,
    /// Extensions (without dot, case-insensitive) of files uploaded as attachments.
    pub attachment_extensions: Vec<String>,
    pub http: HttpConfig,
}

/// HTTP client tuning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub timeout_secs: u64,
    /// Extra attempts for transient failures (transport errors, 429, 5xx).
    pub retries: u32,
    pub backoff_ms: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            retries: 3,
            backoff_ms: 500,
        }
    }
}

impl Default for MirrorConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            username: None,
            ignore: to_strings(&["vendor", ".git", ".github", "node_modules", "target"]),
            document_extensions: to_strings(&["md", "MD", "markdown"]),
            attachment_extensions: to_strings(&["puml", "png", "jpg", "jpeg", "gif", "svg"]),
            http: HttpConfig::default(),
        }
    }
}

impl MirrorConfig {
    /// Whether a directory with this file name is skipped.
    pub fn is_ignored(&self, name: &str) -> bool {
        self.ignore.iter().any(|i| i == name)
    }

    /// Whether `path` is a document that becomes its own page.
    pub fn is_document(&self, path: &Path) -> bool {
        extension(path).is_some_and(|ext| self.document_extensions.iter().any(|d| d == ext))
    }

    /// Whether `path` may be uploaded as an attachment.
    pub fn is_attachment(&self, path: &Path) -> bool {
        extension(path).is_some_and(|ext| {
            self.attachment_extensions
                .iter()
                .any(|a| a.eq_ignore_ascii_case(ext))
        })
    }
}

fn extension(path: &Path) -> Option<&str> {
    path.extension().and_then(|e| e.to_str())
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_owned()).collect()
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// `<home>/.treemirror/config.yaml`: pure, no I/O.
pub fn config_path_at(home: &Path) -> PathBuf {
    home.join(".treemirror").join("config.yaml")
}

/// Load `<home>/.treemirror/config.yaml`, falling back to defaults when absent.
pub fn load_at(home: &Path) -> Result<MirrorConfig, CoreError> {
    let path = config_path_at(home);
    if !path.exists() {
        return Ok(MirrorConfig::default());
    }
    load_from(&path)
}

/// `load_at` convenience wrapper.
pub fn load() -> Result<MirrorConfig, CoreError> {
    let home = dirs::home_dir().ok_or(CoreError::HomeNotFound)?;
    load_at(&home)
}

/// Load an explicitly named config file.
///
/// Returns `CoreError::ConfigNotFound` if absent and `CoreError::Parse`
/// (with path + line context) if malformed.
pub fn load_from(path: &Path) -> Result<MirrorConfig, CoreError> {
    if !path.exists() {
        return Err(CoreError::ConfigNotFound {
            path: path.to_path_buf(),
        });
    }
    let contents = std::fs::read_to_string(path).map_err(|e| io_err(path, e))?;
    if contents.trim().is_empty() {
        return Ok(MirrorConfig::default());
    }
    serde_yaml::from_str(&contents).map_err(|source| CoreError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults_when_file_missing() {
        let home = TempDir::new().expect("tempdir");
        let cfg = load_at(home.path()).expect("load");
        assert_eq!(cfg, MirrorConfig::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let home = TempDir::new().expect("tempdir");
        let path = config_path_at(home.path());
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "username: bot@example.com\nhttp:\n  retries: 0\n").unwrap();

        let cfg = load_at(home.path()).expect("load");
        assert_eq!(cfg.username.as_deref(), Some("bot@example.com"));
        assert_eq!(cfg.http.retries, 0);
        assert_eq!(cfg.http.timeout_secs, 30);
        assert!(cfg.is_ignored(".git"));
    }

    #[test]
    fn extension_matching() {
        let cfg = MirrorConfig::default();
        assert!(cfg.is_document(Path::new("a/readme.md")));
        assert!(cfg.is_document(Path::new("a/README.MD")));
        assert!(!cfg.is_document(Path::new("a/readme.Md")));
        assert!(cfg.is_attachment(Path::new("a/diagram.PNG")));
        assert!(cfg.is_attachment(Path::new("a/flow.puml")));
        assert!(!cfg.is_attachment(Path::new("a/main.go")));
        assert!(!cfg.is_attachment(Path::new("a/png")));
    }
}
