//! Directory traversal producing [`Entry`] snapshots.
//!
//! Paths are made relative to the catalog *root* rather than the starting
//! path, so entries from different assets share one relative-path space.
//! Traversal is depth-first and sorted by file name; a directory is always
//! yielded before anything beneath it.

use super::metadata::Entry;
use crate::utils::{MirrorError, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Lazy walk over `start` and everything below it
pub struct Catalog {
    root: PathBuf,
    walker: walkdir::IntoIter,
}

impl Catalog {
    /// Catalog `start`, reporting paths relative to `root`.
    ///
    /// `start` must lie under `root`. Symlinks are never followed below
    /// `start`.
    pub fn new(root: &Path, start: &Path) -> Self {
        let walker = WalkDir::new(start)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter();

        Self {
            root: root.to_path_buf(),
            walker,
        }
    }

    fn snapshot(&self, entry: walkdir::DirEntry) -> Result<Entry> {
        let relative_path = entry
            .path()
            .strip_prefix(&self.root)
            .map_err(|_| MirrorError::InvalidAsset(entry.path().display().to_string()))?
            .to_path_buf();
        let metadata = entry.metadata()?;

        Ok(Entry::from_metadata(relative_path, &metadata)?)
    }
}

impl Iterator for Catalog {
    type Item = Result<Entry>;

    fn next(&mut self) -> Option<Self::Item> {
        let entry = match self.walker.next()? {
            Ok(entry) => entry,
            Err(e) => return Some(Err(e.into())),
        };
        Some(self.snapshot(entry))
    }
}

/// Collect the whole catalog, failing on the first unreadable entry.
pub fn catalog(root: &Path, start: &Path) -> Result<Vec<Entry>> {
    Catalog::new(root, start).collect()
}
