//! Progress display for long-running backups.

use console::Term;
use convoy_core::ProgressSink;
use indicatif::ProgressBar;
use indicatif::ProgressStyle;
use std::path::Path;
use std::time::Duration;

/// Spinner implementing `ProgressSink` for archive builds.
///
/// The total entry count is unknown up front (the walk is lazy), so this
/// shows a spinner with the current file and running byte count rather
/// than a bar. Cleans itself up on drop.
pub struct CliProgress {
    bar: ProgressBar,
    bytes_copied: u64,
    files_archived: usize,
}

impl CliProgress {
    #[must_use]
    pub fn new(message: &str) -> Self {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {prefix} {wide_msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.set_prefix(message.to_string());
        bar.enable_steady_tick(Duration::from_millis(100));

        Self {
            bar,
            bytes_copied: 0,
            files_archived: 0,
        }
    }

    /// Checks if we should show progress (TTY detection).
    #[must_use]
    pub fn should_show() -> bool {
        Term::stdout().is_term()
    }
}

impl Drop for CliProgress {
    fn drop(&mut self) {
        self.bar.finish_and_clear();
    }
}

impl ProgressSink for CliProgress {
    fn file_archived(&mut self, name: &Path) {
        self.files_archived += 1;
        self.bar.set_message(format!(
            "{} ({} files, {})",
            name.display(),
            self.files_archived,
            humanize_bytes(self.bytes_copied)
        ));
        self.bar.tick();
    }

    fn bytes_copied(&mut self, bytes: u64) {
        self.bytes_copied += bytes;
    }

    fn finished(&mut self) {
        self.bar.finish_and_clear();
    }
}

/// Converts bytes to human-readable format (KB, MB, GB, TB).
fn humanize_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;
    const TB: u64 = GB * 1024;

    if bytes >= TB {
        format!("{:.1} TB", bytes as f64 / TB as f64)
    } else if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{bytes} B")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_humanize_bytes() {
        assert_eq!(humanize_bytes(0), "0 B");
        assert_eq!(humanize_bytes(512), "512 B");
        assert_eq!(humanize_bytes(1024), "1.0 KB");
        assert_eq!(humanize_bytes(1536), "1.5 KB");
        assert_eq!(humanize_bytes(1024 * 1024), "1.0 MB");
        assert_eq!(humanize_bytes(1024_u64.pow(4)), "1.0 TB");
    }

    #[test]
    fn test_progress_sink_counts() {
        let mut progress = CliProgress::new("Archiving");

        progress.bytes_copied(1024);
        progress.file_archived(Path::new("data/app.db"));
        progress.finished();

        assert_eq!(progress.bytes_copied, 1024);
        assert_eq!(progress.files_archived, 1);
    }
}
