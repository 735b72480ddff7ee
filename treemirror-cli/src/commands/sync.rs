//! The mirror run: validate arguments, build the client, reconcile, scrub.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Args;
use colored::Colorize;

use treemirror_confluence::{ClientSettings, ConfluenceClient};
use treemirror_core::{config, ContentStore, MirrorConfig, PageId};
use treemirror_renderer::MarkdownRenderer;
use treemirror_sync::{run, DryRunStore, RunReport, SyncOptions};

/// Positional arguments of a mirror run, in the order callers pass them.
#[derive(Args, Debug)]
pub struct SyncArgs {
    /// API token for the Confluence instance.
    pub api_key: String,

    /// Key of the target space.
    pub space: String,

    /// Directory to mirror.
    pub root_path: PathBuf,

    /// Page to hang top-level pages under; 0 for the space root.
    pub master_page_id: String,

    /// Confluence base URL; empty to use the config file.
    pub base_url: String,

    /// `true` to skip attachments and mirror documents only.
    pub only_docs: String,

    /// User for basic auth; bearer auth with the API key when absent.
    #[arg(long)]
    pub user: Option<String>,

    /// Read settings from this file instead of ~/.treemirror/config.yaml.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Log what would change without sending any mutation.
    #[arg(long)]
    pub dry_run: bool,
}

impl SyncArgs {
    pub fn run(self) -> Result<()> {
        let master_page = parse_master_page(&self.master_page_id)?;
        let only_docs = parse_bool(&self.only_docs)
            .with_context(|| format!("ONLY_DOCS must be a boolean, got '{}'", self.only_docs))?;
        let root = resolve_root(&self.root_path)?;
        let config = load_config(self.config.as_deref())?;

        let base_url = if self.base_url.trim().is_empty() {
            config.base_url.clone().unwrap_or_default()
        } else {
            self.base_url.clone()
        };
        let username = self.user.clone().or_else(|| config.username.clone());
        let settings = ClientSettings::from_http(base_url, &self.space, &self.api_key, &config.http)
            .with_username(username);
        let client = ConfluenceClient::new(settings).context("cannot set up the Confluence client")?;

        let store: Box<dyn ContentStore> = if self.dry_run {
            Box::new(DryRunStore::new(client))
        } else {
            Box::new(client)
        };
        let renderer = MarkdownRenderer::new().context("failed to load page templates")?;
        let options = SyncOptions::new(&root)
            .with_master_page(master_page)
            .with_only_docs(only_docs)
            .with_config(config);

        let outcome = run(store.as_ref(), &renderer, &options)
            .with_context(|| format!("mirror of {} failed", root.display()))?;

        print_summary(&root, &outcome.report, self.dry_run);
        Ok(())
    }
}

/// `0` means no master page.
fn parse_master_page(raw: &str) -> Result<Option<PageId>> {
    let id: u64 = raw
        .trim()
        .parse()
        .with_context(|| format!("MASTER_PAGE_ID must be a non-negative integer, got '{raw}'"))?;
    Ok((id != 0).then(|| PageId::from(id)))
}

/// Boolean spellings accepted for `ONLY_DOCS`.
fn parse_bool(raw: &str) -> Result<bool> {
    match raw.trim() {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Ok(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Ok(false),
        other => bail!("invalid boolean '{other}'"),
    }
}

fn resolve_root(path: &Path) -> Result<PathBuf> {
    let root = path
        .canonicalize()
        .with_context(|| format!("cannot resolve root path {}", path.display()))?;
    if !root.is_dir() {
        bail!("root path {} is not a directory", root.display());
    }
    Ok(root)
}

fn load_config(explicit: Option<&Path>) -> Result<MirrorConfig> {
    match explicit {
        Some(path) => config::load_from(path)
            .with_context(|| format!("failed to load config {}", path.display())),
        None => config::load().context("failed to load ~/.treemirror/config.yaml"),
    }
}

fn print_summary(root: &Path, report: &RunReport, dry_run: bool) {
    let prefix = if dry_run { "[dry-run] " } else { "" };
    let mark = if report.failures.is_empty() {
        "✓".green().bold()
    } else {
        "!".yellow().bold()
    };
    println!(
        "{prefix}{mark} {}: {} created, {} updated, {} deleted, {} uploaded, {} skipped ({}s)",
        root.display(),
        report.created,
        report.updated,
        report.deleted,
        report.uploaded,
        report.skipped(),
        report.elapsed().num_seconds(),
    );
    for failure in &report.failures {
        println!("  {}  {}: {}", "✗".red(), failure.subject, failure.error);
    }
}
