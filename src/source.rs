//! Blobs from an existing directory tree
//!
//! Yields one [`Blob`] per regular file, named by its file name alone. The
//! source tree is only read, never modified.

use crate::store::Blob;
use crate::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Files under a root directory, in file name order
#[derive(Clone, Debug)]
pub struct DirectorySource {
    root: PathBuf,
    recursive: bool,
}

impl DirectorySource {
    /// Direct children of `root` only
    pub fn new(root: impl AsRef<Path>) -> Self {
        DirectorySource {
            root: root.as_ref().to_path_buf(),
            recursive: false,
        }
    }

    /// Descend into subdirectories too
    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// Iterate the files as blobs
    ///
    /// Symlinks are not followed. Zero length files are yielded like any
    /// other; the store decides what to do with them.
    pub fn blobs(&self) -> impl Iterator<Item = Result<Blob>> {
        let max_depth = if self.recursive { usize::MAX } else { 1 };
        WalkDir::new(&self.root)
            .min_depth(1)
            .max_depth(max_depth)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) if entry.file_type().is_file() => Some(read_blob(entry.path())),
                Ok(_) => None,
                Err(e) => Some(Err(e.into())),
            })
    }
}

fn read_blob(path: &Path) -> Result<Blob> {
    let content = fs::read(path)?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned());
    debug!(path = %path.display(), size = content.len(), "found source file");
    Ok(Blob::new(content, name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_flat_source() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("b.txt"), b"bee").unwrap();
        fs::write(dir.path().join("a.txt"), b"ay").unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("nested/c.txt"), b"sea").unwrap();

        let mut blobs: Vec<Blob> = DirectorySource::new(dir.path())
            .blobs()
            .collect::<Result<_>>()
            .unwrap();

        assert_eq!(blobs.len(), 2);
        assert_eq!(blobs[0].name(), "a.txt");
        assert_eq!(&blobs[1].content()[..], b"bee");
    }

    #[test]
    fn test_recursive_source() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), b"ay").unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("nested/c.txt"), b"sea").unwrap();

        let mut blobs: Vec<Blob> = DirectorySource::new(dir.path())
            .recursive(true)
            .blobs()
            .collect::<Result<_>>()
            .unwrap();

        let mut names: Vec<String> = blobs.iter_mut().map(|b| b.name().to_string()).collect();
        names.sort();
        assert_eq!(names, vec!["a.txt", "c.txt"]);
    }

    #[test]
    fn test_missing_root() {
        let dir = tempdir().unwrap();
        let source = DirectorySource::new(dir.path().join("absent"));
        let results: Vec<_> = source.blobs().collect();
        assert_eq!(results.len(), 1);
        assert!(matches!(results[0], Err(crate::Error::Walk(_))));
    }
}
