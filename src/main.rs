//! dir-dedup CLI - dedup a directory and optionally add files to it
//!
//! Scanning is destructive, so nothing happens without `--yes-sure`.

use anyhow::Context;
use clap::Parser;
use filededup::{Admission, DirectorySource, StoreConfig, StoreRegistry};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "dir-dedup")]
#[command(about = "Dedup files in a directory and add more unique files to it")]
#[command(version)]
struct Cli {
    /// Directory to dedup
    dir: PathBuf,

    /// Debug level: 0 warnings, 1 dedup activity, 2 internals
    #[arg(short = 'd', default_value_t = 0, value_parser = clap::value_parser!(u8).range(0..=2))]
    debug: u8,

    /// Output format
    #[arg(short = 'o', long, default_value = "none")]
    output: OutputFormat,

    /// Required safety check; the scan deletes files
    #[arg(long)]
    yes_sure: bool,

    /// Source directory whose files are added (may be repeated)
    #[arg(long = "ingest", value_name = "SRC")]
    ingest: Vec<PathBuf>,

    /// Walk ingest sources recursively
    #[arg(long)]
    recursive: bool,

    /// Regex whose first match is the extension kept on renamed files
    #[arg(long, value_name = "REGEX")]
    ext_pattern: Option<String>,

    /// Regex whose matches are replaced by `_` in incoming names
    #[arg(long, value_name = "REGEX")]
    sanitize_pattern: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
enum OutputFormat {
    None,
    Json,
    Text,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if !cli.yes_sure {
        eprintln!("Require --yes-sure parameter to know you really mean it");
        std::process::exit(1);
    }

    filededup::logging::init(cli.debug);

    let config = build_config(&cli)?;
    let mut registry = StoreRegistry::with_config(config);
    let store = registry
        .open(&cli.dir)
        .with_context(|| format!("Unable to process directory: {}", cli.dir.display()))?;

    let (mut stored, mut duplicates) = (0usize, 0usize);
    for src in &cli.ingest {
        let source = DirectorySource::new(src).recursive(cli.recursive);
        for blob in source.blobs() {
            let blob = blob.with_context(|| format!("Unable to read source: {}", src.display()))?;
            match store.lock().admit(blob)? {
                Admission::Stored { .. } => stored += 1,
                Admission::Duplicate { .. } => duplicates += 1,
            }
        }
    }

    let store = store.lock();
    if !cli.ingest.is_empty() {
        info!(stored, duplicates, unique = store.len(), "ingest finished");
    }

    let report = store.report();
    match cli.output {
        OutputFormat::None => {}
        OutputFormat::Json => println!("{}", report.to_json_pretty()?),
        OutputFormat::Text => {
            if !report.is_empty() {
                println!("{}", report.to_text());
            }
        }
    }

    Ok(())
}

fn build_config(cli: &Cli) -> anyhow::Result<StoreConfig> {
    let mut config = StoreConfig::default();
    if let Some(pattern) = &cli.sanitize_pattern {
        config = config
            .with_sanitize_pattern(pattern)
            .context("Unable to parse sanitize pattern")?;
    }
    if let Some(pattern) = &cli.ext_pattern {
        config = config
            .with_extension_pattern(pattern)
            .context("Unable to parse extension pattern")?;
    }
    Ok(config)
}
