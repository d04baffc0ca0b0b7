//! mbox-list-files CLI - list attachment file names found in an mbox

use anyhow::Context;
use clap::Parser;
use filededup::report::json_pretty;
use filededup::MboxSource;
use regex::{Regex, RegexBuilder};
use std::collections::BTreeMap;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "mbox-list-files")]
#[command(about = "List attachments in an mbox")]
#[command(version)]
struct Cli {
    /// mbox format mailbox
    mbox: PathBuf,

    /// File name regular expression (may be repeated; default matches all)
    #[arg(short = 'r', value_name = "REGEX")]
    regex: Vec<String>,

    /// Case insensitive matching
    #[arg(short = 'i')]
    caseless: bool,

    /// Output format
    #[arg(short = 'o', long, default_value = "txt")]
    output: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
enum OutputFormat {
    Txt,
    Count,
    Json,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    filededup::logging::init(0);

    let filters = build_filters(&cli.regex, cli.caseless).context("Unable to parse regex")?;
    let counts = MboxSource::new(&cli.mbox)
        .name_counts(&filters)
        .with_context(|| format!("Unable to open mbox file: {}", cli.mbox.display()))?;

    match cli.output {
        OutputFormat::Count => println!("{}", counts.values().sum::<usize>()),
        OutputFormat::Json => println!("{}", json_pretty(&counts)?),
        OutputFormat::Txt => {
            if !counts.is_empty() {
                println!("{}", to_text(&counts));
            }
        }
    }

    Ok(())
}

fn build_filters(patterns: &[String], caseless: bool) -> Result<Vec<Regex>, regex::Error> {
    if patterns.is_empty() {
        return Ok(vec![RegexBuilder::new(".*").build()?]);
    }
    patterns
        .iter()
        .map(|p| RegexBuilder::new(p).case_insensitive(caseless).build())
        .collect()
}

/// `count\tname` per line, sorted by name
fn to_text(counts: &BTreeMap<String, usize>) -> String {
    counts
        .iter()
        .map(|(name, count)| format!("{count}\t{name}"))
        .collect::<Vec<_>>()
        .join("\n")
}
