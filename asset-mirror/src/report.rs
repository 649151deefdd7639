//! Status message built from a run's copied and failed lists.
//!
//! Pure formatting, no I/O. The HTML rendering targets Telegram's `HTML`
//! parse mode; the plain rendering is for the terminal.

use crate::utils::MirrorError;

/// Overall outcome shown in the banner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Successful,
    PartiallySuccessful,
    Failed,
}

impl RunStatus {
    /// First match wins: all failed, then any failed, then success.
    pub fn select(failed_count: usize, all_failed: bool) -> Self {
        if all_failed {
            RunStatus::Failed
        } else if failed_count > 0 {
            RunStatus::PartiallySuccessful
        } else {
            RunStatus::Successful
        }
    }

    pub fn banner(&self) -> &'static str {
        match self {
            RunStatus::Successful => "Backup Successful ✅",
            RunStatus::PartiallySuccessful => "Backup Partially Successful ⚠️",
            RunStatus::Failed => "Backup Failed ❌",
        }
    }
}

/// Output flavour of the report text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Markup {
    #[default]
    Html,
    Plain,
}

impl Markup {
    fn banner(&self, text: &str) -> String {
        match self {
            Markup::Html => format!("<b>{text}</b>"),
            Markup::Plain => text.to_string(),
        }
    }

    fn heading(&self, text: &str) -> String {
        match self {
            Markup::Html => format!("<b><i>{text}</i></b>"),
            Markup::Plain => text.to_string(),
        }
    }

    fn escape(&self, text: &str) -> String {
        match self {
            Markup::Html => text
                .replace('&', "&amp;")
                .replace('<', "&lt;")
                .replace('>', "&gt;"),
            Markup::Plain => text.to_string(),
        }
    }
}

pub const COPIED_HEADING: &str = "List of files that were backed up in Hard Disk:";
pub const UP_TO_DATE_NOTICE: &str = "All files are already up to date!";
pub const FAILED_HEADING: &str = "Assets that failed to back up and need attention:";

/// Build the HTML report for the chat collaborator.
pub fn build_report<C, F>(copied_files: &[C], failed_assets: &[F], all_failed: bool) -> String
where
    C: AsRef<str>,
    F: AsRef<str>,
{
    render_report(copied_files, failed_assets, all_failed, Markup::Html)
}

/// Render the report in the given markup.
pub fn render_report<C, F>(
    copied_files: &[C],
    failed_assets: &[F],
    all_failed: bool,
    markup: Markup,
) -> String
where
    C: AsRef<str>,
    F: AsRef<str>,
{
    let status = RunStatus::select(failed_assets.len(), all_failed);
    let mut text = markup.banner(status.banner());
    text.push_str("\n\n");

    if !copied_files.is_empty() {
        text.push_str(&markup.heading(COPIED_HEADING));
        text.push('\n');
        push_numbered(&mut text, copied_files, markup);
    } else if !all_failed {
        text.push_str(&markup.heading(UP_TO_DATE_NOTICE));
        text.push('\n');
    }

    if !failed_assets.is_empty() {
        text.push('\n');
        text.push_str(&markup.heading(FAILED_HEADING));
        text.push('\n');
        push_numbered(&mut text, failed_assets, markup);
    }

    text
}

/// Report for a run that stopped before processing any asset.
pub fn fatal_report(error: &MirrorError, markup: Markup) -> String {
    format!(
        "{}\n\n{}\n{}\n",
        markup.banner(RunStatus::Failed.banner()),
        markup.heading("Backup could not start:"),
        markup.escape(&error.to_string())
    )
}

fn push_numbered<S: AsRef<str>>(text: &mut String, items: &[S], markup: Markup) {
    for (idx, item) in items.iter().enumerate() {
        text.push_str(&format!("{}. {}\n", idx + 1, markup.escape(item.as_ref())));
    }
}
