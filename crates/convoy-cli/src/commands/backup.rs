//! Backup command implementation.
//!
//! Stops the enabled services, snapshots the stack root into a tar.gz
//! archive, and brings the services back up. The restart happens even
//! when the snapshot fails; a failed backup must not leave the stack
//! down.

use crate::cli::BackupArgs;
use crate::commands::services;
use crate::config::StackConfig;
use crate::error::convert_archive_error;
use crate::output::OutputFormatter;
use crate::progress::CliProgress;
use anyhow::Result;
use convoy_core::ArchiveBuilder;
use convoy_core::ArchiveStats;
use std::path::Path;
use std::path::PathBuf;

pub fn execute(
    args: &BackupArgs,
    root: &Path,
    config_path: &Path,
    formatter: &dyn OutputFormatter,
    quiet: bool,
    json: bool,
) -> Result<()> {
    let config = StackConfig::load(config_path)?;
    let archive = args
        .output
        .clone()
        .unwrap_or_else(|| root.join(&config.archive_name));

    if !args.skip_services {
        services::down(root, formatter)?;
    }

    let built = build_archive(args, root, &archive, quiet, json);

    let restarted = if args.skip_services {
        Ok(())
    } else {
        services::up(root, formatter)
    };

    let stats = built.map_err(|e| convert_archive_error(e, &archive))?;
    restarted?;

    formatter.format_backup_result(&archive, &stats)
}

fn build_archive(
    args: &BackupArgs,
    root: &Path,
    archive: &Path,
    quiet: bool,
    json: bool,
) -> convoy_core::Result<ArchiveStats> {
    let mut builder = ArchiveBuilder::new(root, archive);

    for path in &args.exclude {
        builder = builder.exclude(resolve_exclusion(root, path));
    }
    if let Some(level) = args.compression_level {
        builder = builder.compression_level(level);
    }

    if !quiet && !json && CliProgress::should_show() {
        let mut progress = CliProgress::new("Archiving");
        builder.build_with_progress(&mut progress)
    } else {
        builder.build()
    }
}

/// Relative exclusions are taken relative to the stack root.
fn resolve_exclusion(root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}
