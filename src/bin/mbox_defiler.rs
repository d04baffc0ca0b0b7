//! mbox-defiler CLI - extract named attachments from an mbox into a dedup directory
//!
//! The directory is deduped on open, like `dir-dedup`, before anything is
//! added to it.

use anyhow::Context;
use clap::Parser;
use filededup::{Admission, MboxSource, StoreRegistry};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "mbox-defiler")]
#[command(about = "Extract attachments from an mbox to a directory")]
#[command(version)]
struct Cli {
    /// mbox to defile
    mbox: PathBuf,

    /// Dedup directory to save to
    dir: PathBuf,

    /// Debug level: 0 warnings, 1 dedup activity, 2 internals
    #[arg(short = 'd', default_value_t = 0, value_parser = clap::value_parser!(u8).range(0..=2))]
    debug: u8,

    /// Output format
    #[arg(short = 'o', long, default_value = "none")]
    output: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
enum OutputFormat {
    None,
    Json,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    filededup::logging::init(cli.debug);

    let mut registry = StoreRegistry::new();
    let store = registry
        .open(&cli.dir)
        .with_context(|| format!("Unable to process directory: {}", cli.dir.display()))?;

    let source = MboxSource::new(&cli.mbox);
    let blobs = source
        .blobs()
        .with_context(|| format!("Unable to process mailbox: {}", cli.mbox.display()))?;

    let (mut stored, mut duplicates) = (0usize, 0usize);
    for blob in blobs {
        let blob =
            blob.with_context(|| format!("Unable to process mailbox: {}", cli.mbox.display()))?;
        match store.lock().admit(blob)? {
            Admission::Stored { .. } => stored += 1,
            Admission::Duplicate { .. } => duplicates += 1,
        }
    }

    let store = store.lock();
    info!(stored, duplicates, unique = store.len(), "finished processing mbox");

    if cli.output == OutputFormat::Json {
        println!("{}", store.report().to_json_pretty()?);
    }

    Ok(())
}
