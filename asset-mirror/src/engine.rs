//! Backup engine - mirrors each asset into the destination root.
//!
//! Assets are processed strictly in order, entries strictly in catalog order.
//! An I/O failure anywhere inside an asset marks that asset as failed and the
//! run moves on; only a missing source root or an uncreatable destination
//! root stops the whole run.

use crate::detect::should_copy;
use crate::fs::metadata::preserve_times;
use crate::fs::{copy_entry, Catalog, CopyAction, DestAttrs};
use crate::report::{render_report, Markup};
use crate::utils::{MirrorError, Result};
use std::fs;
use std::path::{Component, Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Outcome of one engine run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunResult {
    copied: Vec<String>,
    failed: Vec<String>,
    total_assets: usize,
    bytes_copied: u64,
    unchanged_files: usize,
}

impl RunResult {
    /// Relative paths of regular files copied, in discovery order
    pub fn copied(&self) -> &[String] {
        &self.copied
    }

    /// Absolute source paths of assets that failed
    pub fn failed(&self) -> &[String] {
        &self.failed
    }

    pub fn total_assets(&self) -> usize {
        self.total_assets
    }

    pub fn bytes_copied(&self) -> u64 {
        self.bytes_copied
    }

    /// Regular files left alone because the destination was current
    pub fn unchanged_files(&self) -> usize {
        self.unchanged_files
    }

    pub fn all_failed(&self) -> bool {
        self.total_assets > 0 && self.failed.len() == self.total_assets
    }

    /// No asset failed
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn report(&self, markup: Markup) -> String {
        render_report(&self.copied, &self.failed, self.all_failed(), markup)
    }
}

/// Work recorded for one asset, kept only if the whole asset succeeds
#[derive(Debug, Default)]
struct AssetOutcome {
    copied: Vec<String>,
    bytes_copied: u64,
    unchanged_files: usize,
}

/// Mirrors assets from a source root into a destination root
#[derive(Debug, Clone)]
pub struct BackupEngine {
    source_root: PathBuf,
    dest_root: PathBuf,
}

impl BackupEngine {
    pub fn new(source_root: impl Into<PathBuf>, dest_root: impl Into<PathBuf>) -> Self {
        Self {
            source_root: source_root.into(),
            dest_root: dest_root.into(),
        }
    }

    pub fn source_root(&self) -> &Path {
        &self.source_root
    }

    pub fn dest_root(&self) -> &Path {
        &self.dest_root
    }

    /// Mirror every asset in order.
    ///
    /// Returns `Err` only for run-level failures; per-asset failures are
    /// recorded in the result.
    pub fn run<S: AsRef<str>>(&self, assets: &[S]) -> Result<RunResult> {
        let start_time = Instant::now();
        self.prepare()?;

        let mut result = RunResult {
            total_assets: assets.len(),
            ..RunResult::default()
        };

        for asset in assets {
            let asset = asset.as_ref();
            let source_path = self.source_root.join(asset);
            info!("Mirroring asset: {}", source_path.display());

            match self.mirror_asset(asset) {
                Ok(outcome) => {
                    info!(
                        "Asset done: {} ({} copied, {} unchanged)",
                        asset,
                        outcome.copied.len(),
                        outcome.unchanged_files
                    );
                    result.copied.extend(outcome.copied);
                    result.bytes_copied += outcome.bytes_copied;
                    result.unchanged_files += outcome.unchanged_files;
                }
                Err(e) => {
                    warn!("Asset failed: {}: {}", source_path.display(), e);
                    result.failed.push(source_path.display().to_string());
                }
            }
        }

        info!(
            "Run completed: {} files copied ({} bytes), {} unchanged, {}/{} assets failed, {}ms",
            result.copied.len(),
            result.bytes_copied,
            result.unchanged_files,
            result.failed.len(),
            result.total_assets,
            start_time.elapsed().as_millis()
        );

        Ok(result)
    }

    /// Check the source root and make sure the destination root exists
    fn prepare(&self) -> Result<()> {
        if fs::metadata(&self.source_root).is_err() {
            return Err(MirrorError::SourceRootMissing(self.source_root.clone()));
        }

        fs::create_dir_all(&self.dest_root).map_err(|source| MirrorError::DestinationRoot {
            path: self.dest_root.clone(),
            source,
        })
    }

    fn mirror_asset(&self, asset: &str) -> Result<AssetOutcome> {
        let relative = validate_asset(asset)?;
        let source_path = self.source_root.join(relative);

        // Fail before touching the destination if the asset is not there
        fs::symlink_metadata(&source_path)?;

        if let Some(parent) = relative.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(self.dest_root.join(parent))?;
        }

        let mut outcome = AssetOutcome::default();
        let mut created_dirs = Vec::new();
        for entry in Catalog::new(&self.source_root, &source_path) {
            let entry = entry?;
            let dest = self.dest_root.join(&entry.relative_path);
            let dest_attrs = DestAttrs::probe(&dest)?;

            if !should_copy(&entry, dest_attrs.as_ref()) {
                if entry.is_regular_file() {
                    outcome.unchanged_files += 1;
                }
                continue;
            }

            let source = self.source_root.join(&entry.relative_path);
            match copy_entry(&entry, &source, &dest)? {
                CopyAction::File { bytes } => {
                    debug!("Copied {} ({} bytes)", entry.relative_path.display(), bytes);
                    outcome.bytes_copied += bytes;
                    outcome.copied.push(entry.relative_path.display().to_string());
                }
                CopyAction::Directory => {
                    debug!("Created directory {}", entry.relative_path.display());
                    created_dirs.push((entry, dest));
                }
                CopyAction::Symlink => {
                    debug!("Recreated symlink {}", entry.relative_path.display());
                }
                CopyAction::Skipped => {}
            }
        }

        // Writing children bumps a directory's mtime; restamp deepest first
        for (entry, dest) in created_dirs.iter().rev() {
            preserve_times(entry, dest)?;
        }

        Ok(outcome)
    }
}

/// Mirror `assets` from `source_root` into `dest_root`.
pub fn run<S: AsRef<str>>(
    source_root: &Path,
    dest_root: &Path,
    assets: &[S],
) -> Result<RunResult> {
    BackupEngine::new(source_root, dest_root).run(assets)
}

/// Assets must stay inside the source root.
fn validate_asset(asset: &str) -> Result<&Path> {
    let path = Path::new(asset);
    let escapes = path.components().any(|c| {
        matches!(c, Component::ParentDir | Component::RootDir | Component::Prefix(_))
    });

    if escapes {
        return Err(MirrorError::InvalidAsset(asset.to_string()));
    }
    Ok(path)
}
