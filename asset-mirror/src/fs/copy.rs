//! Copy execution for a single cataloged entry.

use super::metadata::{preserve_times, Entry, EntryKind};
use std::fs;
use std::io;
use std::path::Path;
use tracing::debug;

/// What a copy actually did at the destination
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyAction {
    /// Regular file written, with the number of bytes copied
    File { bytes: u64 },
    /// Empty directory created
    Directory,
    /// Symlink recreated
    Symlink,
    /// Entry kind not mirrored on this platform
    Skipped,
}

/// Copy `entry` from `source` to `dest`, replacing whatever is at `dest`,
/// and carry the source timestamps over.
pub fn copy_entry(entry: &Entry, source: &Path, dest: &Path) -> io::Result<CopyAction> {
    match entry.kind {
        EntryKind::File => {
            // Replace rather than write into: the old copy may be read-only
            // or a symlink that fs::copy would follow.
            remove_existing_file(dest)?;
            let bytes = fs::copy(source, dest)?;
            preserve_times(entry, dest)?;
            Ok(CopyAction::File { bytes })
        }
        EntryKind::Directory => {
            fs::create_dir_all(dest)?;
            preserve_times(entry, dest)?;
            Ok(CopyAction::Directory)
        }
        EntryKind::Symlink => copy_symlink(entry, source, dest),
        EntryKind::Other => {
            debug!("Skipping special file: {}", source.display());
            Ok(CopyAction::Skipped)
        }
    }
}

/// Remove whatever non-directory entry sits at `path`.
fn remove_existing_file(path: &Path) -> io::Result<()> {
    match fs::symlink_metadata(path) {
        Ok(existing) if !existing.is_dir() => fs::remove_file(path),
        Ok(_) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}

#[cfg(unix)]
fn copy_symlink(entry: &Entry, source: &Path, dest: &Path) -> io::Result<CopyAction> {
    let target = fs::read_link(source)?;
    std::os::unix::fs::symlink(&target, dest)?;
    preserve_times(entry, dest)?;
    Ok(CopyAction::Symlink)
}

#[cfg(not(unix))]
fn copy_symlink(_entry: &Entry, source: &Path, _dest: &Path) -> io::Result<CopyAction> {
    debug!("Skipping symlink: {}", source.display());
    Ok(CopyAction::Skipped)
}
