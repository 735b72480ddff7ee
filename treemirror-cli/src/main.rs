//! treemirror: mirror a directory tree of Markdown into a Confluence space.
//!
//! # Usage
//!
//! ```text
//! treemirror API_KEY SPACE ROOT_PATH MASTER_PAGE_ID BASE_URL ONLY_DOCS
//!            [--user <name>] [--config <file>] [--dry-run] [--verbose]
//! ```
//!
//! `MASTER_PAGE_ID` 0 puts top-level pages at the space root. An empty
//! `BASE_URL` falls back to the config file.

mod commands;
mod logging;

use anyhow::Result;
use clap::Parser;

use commands::sync::SyncArgs;

#[derive(Parser, Debug)]
#[command(
    name = "treemirror",
    version,
    about = "Mirror a directory tree of Markdown files into a Confluence space",
    long_about = None,
)]
struct Cli {
    #[command(flatten)]
    sync: SyncArgs,

    /// Log every page decision.
    #[arg(long, short)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_tracing(cli.verbose);
    cli.sync.run()
}
