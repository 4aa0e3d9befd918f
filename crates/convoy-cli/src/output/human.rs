//! Human-readable output formatter with colors and styling.

use super::formatter::OutputFormatter;
use anyhow::Result;
use console::Term;
use console::style;
use convoy_core::ArchiveStats;
use convoy_core::ServiceRun;
use std::path::Path;

pub struct HumanFormatter {
    verbose: bool,
    quiet: bool,
    use_colors: bool,
    term: Term,
}

impl HumanFormatter {
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self {
            verbose,
            quiet,
            use_colors: console::colors_enabled(),
            term: Term::stdout(),
        }
    }

    fn format_size(bytes: u64) -> String {
        const KB: u64 = 1024;
        const MB: u64 = KB * 1024;
        const GB: u64 = MB * 1024;

        if bytes >= GB {
            format!("{:.1} GB", bytes as f64 / GB as f64)
        } else if bytes >= MB {
            format!("{:.1} MB", bytes as f64 / MB as f64)
        } else if bytes >= KB {
            format!("{:.1} KB", bytes as f64 / KB as f64)
        } else {
            format!("{bytes} B")
        }
    }

    fn format_number(n: usize) -> String {
        let s = n.to_string();
        let mut result = String::new();
        let mut count = 0;

        for c in s.chars().rev() {
            if count == 3 {
                result.push(',');
                count = 0;
            }
            result.push(c);
            count += 1;
        }

        result.chars().rev().collect()
    }

    fn run_outcome_line(&self, run: &ServiceRun) -> String {
        match &run.outcome {
            Ok(status) if status.success() => {
                if self.use_colors {
                    format!("{} {}", style("✓").green().bold(), run.dir.display())
                } else {
                    format!("ok: {}", run.dir.display())
                }
            }
            Ok(status) => {
                let code = status
                    .code()
                    .map_or_else(|| "signal".to_string(), |c| c.to_string());
                if self.use_colors {
                    format!(
                        "{} {} (exit {code})",
                        style("✗").red().bold(),
                        run.dir.display()
                    )
                } else {
                    format!("failed: {} (exit {code})", run.dir.display())
                }
            }
            Err(err) => {
                if self.use_colors {
                    format!("{} {} ({err})", style("✗").red().bold(), run.dir.display())
                } else {
                    format!("failed: {} ({err})", run.dir.display())
                }
            }
        }
    }
}

impl OutputFormatter for HumanFormatter {
    fn format_backup_result(&self, archive: &Path, stats: &ArchiveStats) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        if self.use_colors {
            let _ = self.term.write_line(&format!(
                "{} Backup created: {}",
                style("✓").green().bold(),
                archive.display()
            ));
        } else {
            let _ = self
                .term
                .write_line(&format!("Backup created: {}", archive.display()));
        }

        let _ = self.term.write_line("");
        let _ = self.term.write_line(&format!(
            "  Files added:      {}",
            Self::format_number(stats.files_added)
        ));
        let _ = self.term.write_line(&format!(
            "  Directories:      {}",
            Self::format_number(stats.directories_added)
        ));
        let _ = self.term.write_line(&format!(
            "  Total size:       {}",
            Self::format_size(stats.bytes_written)
        ));
        let _ = self.term.write_line(&format!(
            "  Compressed size:  {}",
            Self::format_size(stats.bytes_compressed)
        ));
        let _ = self.term.write_line(&format!(
            "  Compression:      {:.1}%",
            stats.compression_percentage()
        ));

        if self.verbose {
            let _ = self
                .term
                .write_line(&format!("  Symlinks:         {}", stats.symlinks_added));
            let _ = self
                .term
                .write_line(&format!("  Duration:         {:?}", stats.duration));
        }

        Ok(())
    }

    fn format_service_runs(&self, action: &str, runs: &[ServiceRun]) -> Result<()> {
        let failed = runs.iter().filter(|r| !r.succeeded()).count();

        if !self.quiet {
            for run in runs {
                let _ = self.term.write_line(&self.run_outcome_line(run));
            }
            let _ = self.term.write_line(&format!(
                "{action}: {} of {} services succeeded",
                runs.len() - failed,
                runs.len()
            ));
        } else if failed > 0 {
            // Failures surface even in quiet mode.
            for run in runs.iter().filter(|r| !r.succeeded()) {
                let _ = self.term.write_line(&self.run_outcome_line(run));
            }
        }

        Ok(())
    }

    fn format_error(&self, error: &anyhow::Error) {
        // Always show errors, even in quiet mode
        if self.use_colors {
            let _ = self
                .term
                .write_line(&format!("{} {error:?}", style("ERROR:").red().bold()));
        } else {
            let _ = self.term.write_line(&format!("ERROR: {error:?}"));
        }
    }

    fn format_success(&self, message: &str) {
        if self.quiet {
            return;
        }

        if self.use_colors {
            let _ = self
                .term
                .write_line(&format!("{} {message}", style("✓").green().bold()));
        } else {
            let _ = self.term.write_line(message);
        }
    }

    fn format_warning(&self, message: &str) {
        if self.quiet {
            return;
        }

        if self.use_colors {
            let _ = self
                .term
                .write_line(&format!("{} {message}", style("⚠").yellow().bold()));
        } else {
            let _ = self.term.write_line(&format!("WARNING: {message}"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size() {
        assert_eq!(HumanFormatter::format_size(512), "512 B");
        assert_eq!(HumanFormatter::format_size(1024), "1.0 KB");
        assert_eq!(HumanFormatter::format_size(1536), "1.5 KB");
        assert_eq!(HumanFormatter::format_size(1024 * 1024), "1.0 MB");
    }

    #[test]
    fn test_format_number() {
        assert_eq!(HumanFormatter::format_number(1), "1");
        assert_eq!(HumanFormatter::format_number(1234), "1,234");
        assert_eq!(HumanFormatter::format_number(1_234_567), "1,234,567");
    }
}
