//! Error conversion utilities for CLI.
//!
//! Converts convoy-core's typed errors (thiserror) into user-friendly
//! contextual errors (anyhow) with actionable guidance.

use anyhow::anyhow;
use convoy_core::ArchiveError;
use convoy_core::ServiceError;
use std::path::Path;

/// Converts `ArchiveError` to user-friendly anyhow error with context
pub fn convert_archive_error(err: ArchiveError, archive: &Path) -> anyhow::Error {
    match err {
        ArchiveError::CannotCreateDestination { path, source } => {
            anyhow!(
                "Cannot create archive '{}': {source}\n\
                 HINT: Check that the parent directory exists and is writable.",
                path.display()
            )
        }
        ArchiveError::WalkFailure { path, source } => {
            anyhow!(
                "Cannot read '{}' while building '{}': {source}\n\
                 HINT: The partial archive was removed; fix access to the path and rerun.",
                path.display(),
                archive.display()
            )
        }
        ArchiveError::SizeMismatch {
            path,
            expected,
            actual,
        } => {
            anyhow!(
                "File '{}' changed during backup ({expected} bytes expected, {actual} seen)\n\
                 HINT: Something is still writing to the stack. Back up with services \
                 stopped (avoid --skip-services) and rerun.",
                path.display()
            )
        }
        ArchiveError::EncodingFailure { path, source } => {
            anyhow!(
                "Cannot write archive data for '{}' into '{}': {source}\n\
                 HINT: The destination disk may be full.",
                path.display(),
                archive.display()
            )
        }
    }
}

/// Converts `ServiceError` to user-friendly anyhow error with context
pub fn convert_service_error(err: ServiceError) -> anyhow::Error {
    match err {
        ServiceError::DiscoveryFailure { path, source } => {
            anyhow!(
                "Cannot scan '{}' for enabled services: {source}\n\
                 HINT: Check that --root points at the stack directory.",
                path.display()
            )
        }
        ServiceError::SpawnFailure { program, source } => {
            anyhow!(
                "Cannot launch '{}': {source}\n\
                 HINT: Is Docker installed and on PATH?",
                program.display()
            )
        }
    }
}
