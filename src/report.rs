//! Report of a dedup directory's state
//!
//! Keys are on-disk names held in a `BTreeMap`, and entry fields serialize in
//! alphabetical order, so the JSON output is stable byte for byte.

use crate::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ops::Deref;

/// What is known about one stored file
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportEntry {
    /// Other names the same content arrived under, sorted
    pub duplicates: Vec<String>,
    /// Name the file arrived under, if it was stored under a different one
    pub original: Option<String>,
}

/// On-disk name → entry
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Report(BTreeMap<String, ReportEntry>);

impl Report {
    pub(crate) fn insert(&mut self, on_disk_name: String, entry: ReportEntry) {
        self.0.insert(on_disk_name, entry);
    }

    /// Total number of duplicate names across all files
    pub fn duplicate_count(&self) -> usize {
        self.0.values().map(|e| e.duplicates.len()).sum()
    }

    /// Pretty JSON with four space indentation
    pub fn to_json_pretty(&self) -> Result<String> {
        json_pretty(self)
    }

    /// One tab separated line per file: name, original, duplicates
    pub fn to_text(&self) -> String {
        self.0
            .iter()
            .map(|(name, entry)| {
                format!(
                    "{}\t{}\t{}",
                    name,
                    entry.original.as_deref().unwrap_or("-"),
                    entry.duplicates.join(",")
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Serialize any value as JSON with four space indentation
pub fn json_pretty<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    let mut out = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
    value.serialize(&mut serializer)?;
    Ok(String::from_utf8_lossy(&out).into_owned())
}

impl Deref for Report {
    type Target = BTreeMap<String, ReportEntry>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
