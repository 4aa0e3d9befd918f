//! JSON output formatter for machine-readable results.

use super::formatter::JsonOutput;
use super::formatter::OutputFormatter;
use anyhow::Result;
use convoy_core::ArchiveStats;
use convoy_core::ServiceRun;
use serde::Serialize;
use std::io::Write;
use std::io::{self};
use std::path::Path;

pub struct JsonFormatter;

impl JsonFormatter {
    fn output<T: Serialize>(value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value)?;
        writeln!(io::stdout(), "{json}")?;
        Ok(())
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_backup_result(&self, archive: &Path, stats: &ArchiveStats) -> Result<()> {
        #[derive(Serialize)]
        struct BackupOutput {
            archive: String,
            files_added: usize,
            directories_added: usize,
            symlinks_added: usize,
            bytes_written: u64,
            bytes_compressed: u64,
            compression_ratio: f64,
            compression_percentage: f64,
            duration_ms: u128,
        }

        let data = BackupOutput {
            archive: archive.display().to_string(),
            files_added: stats.files_added,
            directories_added: stats.directories_added,
            symlinks_added: stats.symlinks_added,
            bytes_written: stats.bytes_written,
            bytes_compressed: stats.bytes_compressed,
            compression_ratio: stats.compression_ratio(),
            compression_percentage: stats.compression_percentage(),
            duration_ms: stats.duration.as_millis(),
        };

        let output = JsonOutput::success("backup", data);
        Self::output(&output)
    }

    fn format_service_runs(&self, action: &str, runs: &[ServiceRun]) -> Result<()> {
        #[derive(Serialize)]
        struct RunOutput {
            dir: String,
            success: bool,
            #[serde(skip_serializing_if = "Option::is_none")]
            exit_code: Option<i32>,
            #[serde(skip_serializing_if = "Option::is_none")]
            error: Option<String>,
        }

        #[derive(Serialize)]
        struct FanOutOutput {
            services: Vec<RunOutput>,
        }

        let data = FanOutOutput {
            services: runs
                .iter()
                .map(|run| match &run.outcome {
                    Ok(status) => RunOutput {
                        dir: run.dir.display().to_string(),
                        success: status.success(),
                        exit_code: status.code(),
                        error: None,
                    },
                    Err(err) => RunOutput {
                        dir: run.dir.display().to_string(),
                        success: false,
                        exit_code: None,
                        error: Some(err.to_string()),
                    },
                })
                .collect(),
        };

        let failed = runs.iter().filter(|r| !r.succeeded()).count();
        let output = if failed == 0 {
            JsonOutput::success(action, data)
        } else {
            JsonOutput::failure(
                action,
                data,
                format!("{failed} of {} services failed", runs.len()),
            )
        };
        Self::output(&output)
    }

    fn format_error(&self, error: &anyhow::Error) {
        let output = JsonOutput::<()>::error("unknown", format!("{error:?}"));
        let _ = Self::output(&output);
    }

    fn format_success(&self, message: &str) {
        #[derive(Serialize)]
        struct SuccessData {
            message: String,
        }

        let output = JsonOutput::success(
            "unknown",
            SuccessData {
                message: message.to_string(),
            },
        );
        let _ = Self::output(&output);
    }

    fn format_warning(&self, message: &str) {
        #[derive(Serialize)]
        struct WarningData {
            message: String,
        }

        let output = JsonOutput::success(
            "warning",
            WarningData {
                message: message.to_string(),
            },
        );
        let _ = Self::output(&output);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_json_envelope_shape() {
        #[derive(Serialize)]
        struct TestData {
            value: String,
        }

        let output = JsonOutput::success(
            "backup",
            TestData {
                value: "test".to_string(),
            },
        );
        let json = serde_json::to_string(&output).unwrap();

        assert!(json.contains("\"operation\":\"backup\""));
        assert!(json.contains("\"status\":\"success\""));
        assert!(!json.contains("\"error\""));
    }
}
