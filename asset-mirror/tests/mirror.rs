//! End-to-end runs of the mirror engine against temporary trees.

use asset_mirror::{build_report, run, BackupEngine, Markup};
use filetime::FileTime;
use std::fs;
use std::path::Path;
use std::time::{Duration, SystemTime};
use tempfile::TempDir;

fn write(root: &Path, rel: &str, contents: &[u8]) -> std::io::Result<()> {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, contents)
}

/// A small home directory with nested folders and an empty folder
fn populate(src: &Path) -> std::io::Result<()> {
    write(src, "Documents/cv.pdf", b"curriculum")?;
    write(src, "Documents/taxes/2023.csv", b"1,2,3")?;
    write(src, "Documents/taxes/2024.csv", b"4,5,6")?;
    fs::create_dir_all(src.join("Documents/empty"))?;
    write(src, "Pictures/cat.png", b"meow")?;
    write(src, ".bashrc", b"export EDITOR=vim")?;
    Ok(())
}

fn rel(path: &str) -> String {
    Path::new(path).display().to_string()
}

#[test]
fn test_full_run_into_new_destination() -> anyhow::Result<()> {
    let src = TempDir::new()?;
    let dst = TempDir::new()?;
    populate(src.path())?;
    let dest_root = dst.path().join("mirror");

    let result = run(src.path(), &dest_root, &["Documents", "Pictures", ".bashrc"])?;

    assert_eq!(
        result.copied(),
        [
            rel("Documents/cv.pdf"),
            rel("Documents/taxes/2023.csv"),
            rel("Documents/taxes/2024.csv"),
            rel("Pictures/cat.png"),
            rel(".bashrc"),
        ]
    );
    assert!(result.failed().is_empty());
    assert!(dest_root.join("Documents/empty").is_dir());
    assert_eq!(fs::read(dest_root.join("Documents/taxes/2024.csv"))?, b"4,5,6");
    assert_eq!(result.bytes_copied(), 10 + 5 + 5 + 4 + 17);
    Ok(())
}

#[test]
fn test_second_run_copies_nothing() -> anyhow::Result<()> {
    let src = TempDir::new()?;
    let dst = TempDir::new()?;
    populate(src.path())?;
    let assets = ["Documents", "Pictures", ".bashrc"];

    let first = run(src.path(), dst.path(), &assets)?;
    assert_eq!(first.copied().len(), 5);

    let second = run(src.path(), dst.path(), &assets)?;
    assert!(second.copied().is_empty());
    assert_eq!(second.unchanged_files(), 5);
    assert!(second.report(Markup::Plain).contains("already up to date"));
    Ok(())
}

#[test]
fn test_modified_source_is_recopied() -> anyhow::Result<()> {
    let src = TempDir::new()?;
    let dst = TempDir::new()?;
    populate(src.path())?;
    let engine = BackupEngine::new(src.path(), dst.path());
    engine.run(&["Documents"])?;

    // same size, newer mtime
    write(src.path(), "Documents/cv.pdf", b"CURRICULUM")?;
    let later = SystemTime::now() + Duration::from_secs(120);
    filetime::set_file_mtime(
        src.path().join("Documents/cv.pdf"),
        FileTime::from_system_time(later),
    )?;
    // different size
    write(src.path(), "Documents/taxes/2023.csv", b"1,2,3,4")?;

    let result = engine.run(&["Documents"])?;

    assert_eq!(
        result.copied(),
        [rel("Documents/cv.pdf"), rel("Documents/taxes/2023.csv")]
    );
    assert_eq!(fs::read(dst.path().join("Documents/cv.pdf"))?, b"CURRICULUM");
    Ok(())
}

#[test]
fn test_one_missing_asset_does_not_stop_others() -> anyhow::Result<()> {
    let src = TempDir::new()?;
    let dst = TempDir::new()?;
    populate(src.path())?;

    let result = run(src.path(), dst.path(), &["Pictures", "Videos/holiday", ".bashrc"])?;

    assert_eq!(result.copied(), [rel("Pictures/cat.png"), rel(".bashrc")]);
    assert_eq!(
        result.failed(),
        [src.path().join("Videos/holiday").display().to_string()]
    );
    assert!(!result.all_failed());

    let report = result.report(Markup::Html);
    assert!(report.contains("Backup Partially Successful"));
    assert!(report.contains("holiday"));
    Ok(())
}

#[test]
fn test_every_asset_failing_reports_failure() -> anyhow::Result<()> {
    let src = TempDir::new()?;
    let dst = TempDir::new()?;

    let result = run(src.path(), dst.path(), &["a", "b"])?;

    assert!(result.all_failed());
    assert!(result.report(Markup::Plain).starts_with("Backup Failed"));
    Ok(())
}

#[test]
fn test_report_from_literal_lists() {
    let report = build_report(&["a.txt", "b/c.txt"], &[] as &[&str], false);
    assert!(report.contains("Backup Successful"));
    assert!(report.contains("2. b/c.txt"));
}

#[test]
#[cfg(unix)]
fn test_read_only_file_is_refreshed_on_next_run() -> anyhow::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let src = TempDir::new()?;
    let dst = TempDir::new()?;
    let key = src.path().join("key.pem");
    write(src.path(), "key.pem", b"old")?;
    fs::set_permissions(&key, fs::Permissions::from_mode(0o444))?;
    run(src.path(), dst.path(), &["key.pem"])?;

    fs::set_permissions(&key, fs::Permissions::from_mode(0o644))?;
    write(src.path(), "key.pem", b"rotated key")?;
    fs::set_permissions(&key, fs::Permissions::from_mode(0o444))?;

    let result = run(src.path(), dst.path(), &["key.pem"])?;

    assert_eq!(result.copied(), ["key.pem"]);
    assert!(result.failed().is_empty());
    assert_eq!(fs::read(dst.path().join("key.pem"))?, b"rotated key");
    Ok(())
}
