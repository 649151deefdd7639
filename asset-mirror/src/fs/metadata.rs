//! Entry snapshots and attribute preservation.
//!
//! An [`Entry`] captures the minimal metadata the change detector needs. Copies
//! get the source timestamps applied so the next run sees matching times and
//! leaves unchanged files alone.

use filetime::FileTime;
use std::fs::{self, FileType, Metadata};
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Kind of a cataloged entry. Only `File` is ever content-compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
    Symlink,
    Other,
}

impl EntryKind {
    pub fn from_file_type(file_type: FileType) -> Self {
        if file_type.is_symlink() {
            EntryKind::Symlink
        } else if file_type.is_dir() {
            EntryKind::Directory
        } else if file_type.is_file() {
            EntryKind::File
        } else {
            EntryKind::Other
        }
    }
}

/// Immutable snapshot of one file or directory under the source root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Path relative to the source root (empty for the root itself)
    pub relative_path: PathBuf,

    pub kind: EntryKind,

    /// Size in bytes, meaningful only for regular files
    pub size: u64,

    pub modified: SystemTime,

    /// Last access time, when the platform reports one
    pub accessed: Option<SystemTime>,
}

impl Entry {
    /// Build an entry from metadata read without following symlinks.
    pub fn from_metadata(relative_path: PathBuf, metadata: &Metadata) -> io::Result<Self> {
        let kind = EntryKind::from_file_type(metadata.file_type());
        let size = match kind {
            EntryKind::File => metadata.len(),
            _ => 0,
        };
        Ok(Self {
            relative_path,
            kind,
            size,
            modified: metadata.modified()?,
            accessed: metadata.accessed().ok(),
        })
    }

    pub fn is_regular_file(&self) -> bool {
        self.kind == EntryKind::File
    }

    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }
}

/// Attributes of an existing destination entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DestAttrs {
    pub size: u64,
    pub modified: SystemTime,
}

impl DestAttrs {
    /// Read the destination attributes, or `None` if nothing exists there.
    ///
    /// A dangling symlink counts as existing; its own attributes are used.
    pub fn probe(path: &Path) -> io::Result<Option<Self>> {
        let metadata = match fs::metadata(path) {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == io::ErrorKind::NotFound => match fs::symlink_metadata(path) {
                Ok(link) => link,
                Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
                Err(e) => return Err(e),
            },
            Err(e) => return Err(e),
        };

        Ok(Some(Self {
            size: metadata.len(),
            modified: metadata.modified()?,
        }))
    }
}

/// Stamp the entry's source timestamps onto `dest`.
pub fn preserve_times(entry: &Entry, dest: &Path) -> io::Result<()> {
    let mtime = FileTime::from_system_time(entry.modified);
    let atime = entry
        .accessed
        .map(FileTime::from_system_time)
        .unwrap_or(mtime);

    if entry.kind == EntryKind::Symlink {
        filetime::set_symlink_file_times(dest, atime, mtime)
    } else {
        filetime::set_file_times(dest, atime, mtime)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tempfile::TempDir;

    #[test]
    fn test_entry_from_file_metadata() -> io::Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("notes.txt");
        fs::write(&path, b"test content")?;

        let metadata = fs::symlink_metadata(&path)?;
        let entry = Entry::from_metadata(PathBuf::from("notes.txt"), &metadata)?;

        assert_eq!(entry.kind, EntryKind::File);
        assert_eq!(entry.size, 12);
        assert!(entry.is_regular_file());
        assert!(!entry.is_dir());
        Ok(())
    }

    #[test]
    fn test_directory_size_is_zero() -> io::Result<()> {
        let temp_dir = TempDir::new()?;
        let metadata = fs::symlink_metadata(temp_dir.path())?;
        let entry = Entry::from_metadata(PathBuf::new(), &metadata)?;

        assert_eq!(entry.kind, EntryKind::Directory);
        assert_eq!(entry.size, 0);
        assert!(!entry.is_regular_file());
        Ok(())
    }

    #[test]
    #[cfg(unix)]
    fn test_symlink_is_not_regular() -> io::Result<()> {
        let temp_dir = TempDir::new()?;
        let target = temp_dir.path().join("target.txt");
        let link = temp_dir.path().join("link.txt");
        fs::write(&target, b"data")?;
        std::os::unix::fs::symlink(&target, &link)?;

        let metadata = fs::symlink_metadata(&link)?;
        let entry = Entry::from_metadata(PathBuf::from("link.txt"), &metadata)?;
        assert_eq!(entry.kind, EntryKind::Symlink);
        assert!(!entry.is_regular_file());
        Ok(())
    }

    #[test]
    fn test_probe_missing_destination() -> io::Result<()> {
        let temp_dir = TempDir::new()?;
        assert_eq!(DestAttrs::probe(&temp_dir.path().join("absent"))?, None);
        Ok(())
    }

    #[test]
    fn test_preserve_times_copies_mtime() -> io::Result<()> {
        let temp_dir = TempDir::new()?;
        let src = temp_dir.path().join("src.txt");
        let dest = temp_dir.path().join("dest.txt");
        fs::write(&src, b"abc")?;
        fs::write(&dest, b"abc")?;

        let stamp = SystemTime::UNIX_EPOCH + Duration::from_secs(1_600_000_000);
        filetime::set_file_mtime(&src, FileTime::from_system_time(stamp))?;

        let metadata = fs::symlink_metadata(&src)?;
        let entry = Entry::from_metadata(PathBuf::from("src.txt"), &metadata)?;
        preserve_times(&entry, &dest)?;

        let attrs = DestAttrs::probe(&dest)?.expect("destination exists");
        assert_eq!(attrs.modified, stamp);
        assert_eq!(attrs.size, 3);
        Ok(())
    }
}
