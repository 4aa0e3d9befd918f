//! Locating enabled service directories.

use crate::services::ServiceError;
use std::io;
use std::path::Path;
use std::path::PathBuf;
use walkdir::WalkDir;

/// Marker file whose presence enables a service directory.
pub const ENABLED_MARKER: &str = "enabled";

/// Compose file name expected inside a service directory.
pub const COMPOSE_FILE: &str = "docker-compose.yml";

/// Finds every directory under `root` (inclusive) that carries an
/// [`ENABLED_MARKER`] file.
///
/// The scan is recursive and deterministic: names are visited in sorted
/// order, so the returned list is stable across runs. Subtrees the process
/// cannot read are skipped rather than failing the scan; any other walk
/// error is fatal.
pub fn find_enabled_services(root: &Path) -> Result<Vec<PathBuf>, ServiceError> {
    let mut dirs = Vec::new();

    for entry in WalkDir::new(root).follow_links(false).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) if is_permission_denied(&err) => continue,
            Err(err) => {
                let path = err
                    .path()
                    .map_or_else(|| root.to_path_buf(), Path::to_path_buf);
                return Err(ServiceError::DiscoveryFailure {
                    path,
                    source: err.into(),
                });
            }
        };

        if entry.file_type().is_dir() && entry.path().join(ENABLED_MARKER).exists() {
            dirs.push(entry.path().to_path_buf());
        }
    }

    Ok(dirs)
}

/// Maps enabled directories to their compose files, dropping directories
/// that have the marker but no compose file.
#[must_use]
pub fn compose_files(dirs: &[PathBuf]) -> Vec<PathBuf> {
    dirs.iter()
        .map(|dir| dir.join(COMPOSE_FILE))
        .filter(|path| path.is_file())
        .collect()
}

fn is_permission_denied(err: &walkdir::Error) -> bool {
    err.io_error()
        .is_some_and(|io| io.kind() == io::ErrorKind::PermissionDenied)
}
