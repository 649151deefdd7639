//! Asset Mirror Library
//!
//! Incremental one-way mirroring of named files and folders from a source
//! root into a destination root, with a per-run status report.

pub mod config;
pub mod detect;
pub mod engine;
pub mod fs;
pub mod notify;
pub mod report;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use engine::{run, BackupEngine, RunResult};
pub use report::{build_report, fatal_report, render_report, Markup, RunStatus};
pub use utils::errors::MirrorError;
pub type Result<T> = std::result::Result<T, MirrorError>;
