//! Asset Mirror - Main entry point
//!
//! Mirrors the configured assets, prints the report and sends it to the
//! configured chat. Exits non-zero when the run could not start or any asset
//! failed.

use anyhow::Result;
use asset_mirror::notify::{self, TelegramNotifier};
use asset_mirror::{config::Config, fatal_report, utils, BackupEngine, Markup};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Source root (overrides config)
    #[arg(short, long)]
    source: Option<PathBuf>,

    /// Destination root (overrides config)
    #[arg(short, long)]
    destination: Option<PathBuf>,

    /// Asset to mirror, relative to the source root (repeatable, replaces configured assets)
    #[arg(short, long = "asset", value_name = "PATH")]
    assets: Vec<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long)]
    log_level: Option<String>,

    /// Do not send the report to the configured chat
    #[arg(long)]
    no_notify: bool,
}

impl Args {
    fn apply(&self, config: &mut Config) {
        if let Some(source) = &self.source {
            config.backup.source = source.clone();
        }
        if let Some(destination) = &self.destination {
            config.backup.destination = destination.clone();
        }
        if !self.assets.is_empty() {
            config.backup.assets = self.assets.clone();
        }
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();

    // Load configuration
    let mut config = if let Some(config_path) = &args.config {
        Config::from_file(config_path)?
    } else {
        Config::default()
    };
    config.apply_env();
    args.apply(&mut config);

    // Initialize logging
    let log_level = args.log_level.as_deref().unwrap_or(&config.log.level);
    utils::logger::init(log_level)?;

    config.validate()?;

    tracing::info!(
        "Starting asset-mirror v{}: {} -> {} ({} assets)",
        env!("CARGO_PKG_VERSION"),
        config.backup.source.display(),
        config.backup.destination.display(),
        config.backup.assets.len()
    );

    let notifier = if args.no_notify {
        None
    } else {
        config.notify.telegram.as_ref().map(TelegramNotifier::new)
    };

    let engine = BackupEngine::new(&config.backup.source, &config.backup.destination);
    let assets = config.backup.assets.clone();
    let outcome = tokio::task::spawn_blocking(move || engine.run(&assets)).await?;

    let (plain, html, success) = match outcome {
        Ok(result) => (
            result.report(Markup::Plain),
            result.report(Markup::Html),
            result.is_success(),
        ),
        Err(e) => {
            tracing::error!("Backup could not start: {}", e);
            (
                fatal_report(&e, Markup::Plain),
                fatal_report(&e, Markup::Html),
                false,
            )
        }
    };

    println!("{plain}");

    if let Some(notifier) = &notifier {
        notify::deliver(notifier, &html).await;
    }

    Ok(if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
