//! A directory in which every file has unique content
//!
//! Opening a [`DedupStore`] is destructive: the directory is scanned once,
//! symlinks and zero length files are unlinked, and every file whose content
//! was already seen is removed and remembered as a duplicate name. After the
//! scan the in-memory index mirrors what is on disk, one record per content
//! key. New content enters through [`DedupStore::admit`].

use crate::config::StoreConfig;
use crate::model::IdentityKey;
use crate::report::{Report, ReportEntry};
use crate::store::blob::Blob;
use crate::{Error, Result};
use std::collections::{BTreeSet, HashMap};
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info, warn};

/// Index entry for one file on disk
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Record {
    /// Name of the file as stored in the directory
    pub on_disk_name: String,
    /// Arrival name, kept only when it differs from `on_disk_name`
    pub original_name: Option<String>,
    /// Every other name the same content showed up under
    pub duplicate_names: BTreeSet<String>,
}

impl Record {
    fn new(on_disk_name: impl Into<String>, original_name: Option<&str>) -> Self {
        let on_disk_name = on_disk_name.into();
        let original_name = original_name
            .filter(|orig| *orig != on_disk_name)
            .map(str::to_string);
        Record {
            on_disk_name,
            original_name,
            duplicate_names: BTreeSet::new(),
        }
    }
}

/// Outcome of a single admission
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Admission {
    /// Content was new and now lives on disk under `on_disk_name`
    Stored {
        on_disk_name: String,
        renamed: bool,
    },
    /// Content was already present; nothing was written
    Duplicate { on_disk_name: String },
}

/// Content-unique directory
pub struct DedupStore {
    /// Canonical path of the directory
    directory: PathBuf,
    /// Content key → record
    index: HashMap<IdentityKey, Record>,
    config: StoreConfig,
}

impl DedupStore {
    /// Open a directory with the default naming strategies, deduping it
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with(path, StoreConfig::default())
    }

    /// Open a directory with explicit naming strategies, deduping it
    pub fn open_with(path: impl AsRef<Path>, config: StoreConfig) -> Result<Self> {
        let directory = canonical_directory(path.as_ref())?;
        debug!(directory = %directory.display(), "opening dedup store");

        let mut store = DedupStore {
            directory,
            index: HashMap::new(),
            config,
        };
        store.scan()?;
        Ok(store)
    }

    /// Scan, catalog and dedup the directory
    fn scan(&mut self) -> Result<()> {
        debug!(directory = %self.directory.display(), "scanning files already in directory");

        let entries = fs::read_dir(&self.directory).map_err(|source| {
            Error::DirectoryInaccessible {
                path: self.directory.clone(),
                source,
            }
        })?;

        let mut files = Vec::new();
        for entry in entries {
            let path = entry?.path();
            // `is_file` follows links, so links to regular files are listed too
            if path.is_file() {
                files.push(path);
            }
        }
        files.sort();

        for path in files {
            let file_name = file_name_of(&path);

            let link_meta = fs::symlink_metadata(&path).map_err(|source| Error::ScanRead {
                path: path.clone(),
                source,
            })?;
            if link_meta.file_type().is_symlink() {
                remove_scanned(&path)?;
                info!(path = %path.display(), "unlinked symlink");
                continue;
            }

            let content = read_scanned(&path)?;
            let blob = Blob::named(content, file_name.clone());
            if blob.size() == 0 {
                remove_scanned(&path)?;
                info!(path = %path.display(), "unlinked zero sized regular file");
                continue;
            }

            let key = blob.key();
            if let Some(record) = self.index.get_mut(&key) {
                remove_scanned(&path)?;
                info!(
                    path = %path.display(),
                    kept = %record.on_disk_name,
                    "unlinked duplicate regular file"
                );
                record.duplicate_names.insert(file_name);
            } else {
                info!(path = %path.display(), "leaving unique regular file");
                self.index.insert(key, Record::new(file_name, None));
            }
        }

        debug!(unique = self.index.len(), "finished processing pre-existing files");
        Ok(())
    }

    /// Add a blob to the directory
    ///
    /// Known content only records the blob's name as a duplicate and touches
    /// nothing on disk. New content is sanitized, renamed to a content derived
    /// name if the sanitized name is taken or would leave the directory,
    /// written, and only then indexed.
    pub fn admit(&mut self, mut blob: Blob) -> Result<Admission> {
        let key = blob.key();

        if let Some(record) = self.index.get_mut(&key) {
            let name = blob.name().to_string();
            info!(name = %name, on_disk = %record.on_disk_name, "skipped duplicate of on disk file");
            record.duplicate_names.insert(name);
            return Ok(Admission::Duplicate {
                on_disk_name: record.on_disk_name.clone(),
            });
        }

        blob.sanitize_name(self.config.sanitizer());
        let sanitized = blob.name().to_string();
        if let Some(original) = blob.original_name().filter(|orig| *orig != sanitized) {
            info!(original = %original, name = %sanitized, "sanitising file name");
        }

        let mut renamed = false;
        if !is_plain_file_name(&sanitized) {
            warn!(name = %sanitized, "renaming unique file with path components in its name");
            blob.infer_extension(self.config.inferer());
            blob.cook_name();
            renamed = true;
        } else if entry_exists(&self.directory.join(&sanitized)) {
            info!(name = %sanitized, "renaming unique file with name collision");
            blob.infer_extension(self.config.inferer());
            blob.cook_name();
            renamed = true;
        }

        let on_disk_name = blob.name().to_string();
        self.commit_file(&on_disk_name, blob.content())?;

        let record = Record::new(on_disk_name.clone(), blob.original_name());
        self.index.insert(key, record);
        info!(name = %on_disk_name, key = %key.short(), "adding unique file");

        Ok(Admission::Stored {
            on_disk_name,
            renamed,
        })
    }

    /// Write a new file, never replacing an existing one
    fn commit_file(&self, name: &str, content: &[u8]) -> Result<()> {
        let path = self.directory.join(name);
        let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                return Err(Error::NameCollision(name.to_string()));
            }
            Err(source) => return Err(Error::Write { path, source }),
        };

        let written = file.write_all(content).and_then(|_| file.sync_all());
        drop(file);
        if let Err(source) = written {
            // A half written file must not outlive the failed admission
            let _ = fs::remove_file(&path);
            return Err(Error::Write { path, source });
        }
        Ok(())
    }

    /// Describe every stored file with its original and duplicate names
    pub fn report(&self) -> Report {
        let mut report = Report::default();
        for record in self.index.values() {
            report.insert(
                record.on_disk_name.clone(),
                ReportEntry {
                    original: record.original_name.clone(),
                    duplicates: record.duplicate_names.iter().cloned().collect(),
                },
            );
        }
        report
    }

    /// Canonical path of the directory
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Number of unique files
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Check if content with this key is already stored
    pub fn contains(&self, key: &IdentityKey) -> bool {
        self.index.contains_key(key)
    }

    pub fn record(&self, key: &IdentityKey) -> Option<&Record> {
        self.index.get(key)
    }
}

/// Resolve a directory path the same way for every spelling of it
pub(crate) fn canonical_directory(path: &Path) -> Result<PathBuf> {
    let directory = fs::canonicalize(path).map_err(|source| Error::DirectoryInaccessible {
        path: path.to_path_buf(),
        source,
    })?;
    if !directory.is_dir() {
        return Err(Error::DirectoryInaccessible {
            path: path.to_path_buf(),
            source: std::io::Error::new(ErrorKind::Other, "not a directory"),
        });
    }
    Ok(directory)
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// A name that stays inside the directory when joined to it
fn is_plain_file_name(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

/// Any directory entry counts, dangling symlinks included
fn entry_exists(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}

fn read_scanned(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|source| Error::ScanRead {
        path: path.to_path_buf(),
        source,
    })
}

fn remove_scanned(path: &Path) -> Result<()> {
    fs::remove_file(path).map_err(|source| Error::ScanDelete {
        path: path.to_path_buf(),
        source,
    })
}
