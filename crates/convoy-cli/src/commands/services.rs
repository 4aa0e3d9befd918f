//! Compose fan-out commands: up, down, pull, start, stop, restart,
//! status, and logs.
//!
//! Lifecycle commands run one compose process per enabled service
//! directory; status and logs run a single aggregated process spanning
//! every compose file. Child output goes straight to the operator's
//! terminal.

use crate::error::convert_service_error;
use crate::output::OutputFormatter;
use anyhow::Result;
use anyhow::bail;
use convoy_core::ComposeRunner;
use convoy_core::services::compose_files;
use convoy_core::services::find_enabled_services;
use std::path::Path;

pub fn up(root: &Path, formatter: &dyn OutputFormatter) -> Result<()> {
    fan_out(root, "up", &["up", "-d"], formatter)
}

pub fn down(root: &Path, formatter: &dyn OutputFormatter) -> Result<()> {
    fan_out(root, "down", &["down"], formatter)
}

pub fn pull(root: &Path, formatter: &dyn OutputFormatter) -> Result<()> {
    fan_out(root, "pull", &["pull"], formatter)
}

pub fn start(root: &Path, formatter: &dyn OutputFormatter) -> Result<()> {
    fan_out(root, "start", &["start"], formatter)
}

pub fn stop(root: &Path, formatter: &dyn OutputFormatter) -> Result<()> {
    fan_out(root, "stop", &["stop"], formatter)
}

pub fn restart(root: &Path, formatter: &dyn OutputFormatter) -> Result<()> {
    down(root, formatter)?;
    up(root, formatter)
}

pub fn status(root: &Path, formatter: &dyn OutputFormatter) -> Result<()> {
    aggregated(root, &["ps"], formatter)
}

pub fn logs(root: &Path, follow: bool, formatter: &dyn OutputFormatter) -> Result<()> {
    if follow {
        aggregated(root, &["logs", "-f"], formatter)
    } else {
        aggregated(root, &["logs"], formatter)
    }
}

/// Runs a compose subcommand once per enabled service directory.
///
/// A failing directory never blocks the rest; outcomes are reported
/// together at the end.
fn fan_out(
    root: &Path,
    action: &str,
    args: &[&str],
    formatter: &dyn OutputFormatter,
) -> Result<()> {
    let dirs = find_enabled_services(root).map_err(convert_service_error)?;
    if dirs.is_empty() {
        formatter.format_warning("No enabled services found.");
        return Ok(());
    }

    let runs = ComposeRunner::new().run_in_each(&dirs, args);
    formatter.format_service_runs(action, &runs)
}

/// Runs one compose process spanning every enabled compose file.
fn aggregated(root: &Path, args: &[&str], formatter: &dyn OutputFormatter) -> Result<()> {
    let dirs = find_enabled_services(root).map_err(convert_service_error)?;
    let files = compose_files(&dirs);
    if files.is_empty() {
        formatter.format_warning("No docker-compose.yml files found in enabled folders.");
        return Ok(());
    }

    let status = ComposeRunner::new()
        .run_aggregated(&files, args)
        .map_err(convert_service_error)?;
    if !status.success() {
        bail!("docker compose exited with {status}");
    }
    Ok(())
}
