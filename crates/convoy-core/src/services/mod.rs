//! Discovery and orchestration of container-compose services.
//!
//! A service is a directory carrying an `enabled` marker file next to its
//! compose file. Discovery finds those directories under a root; the
//! runner fans a compose subcommand out across them. Nothing here prints
//! or exits; callers receive per-directory outcomes and decide how to
//! report them.

mod compose;
mod discovery;

pub use compose::ComposeRunner;
pub use compose::ServiceRun;
pub use discovery::COMPOSE_FILE;
pub use discovery::ENABLED_MARKER;
pub use discovery::compose_files;
pub use discovery::find_enabled_services;

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by service discovery and orchestration.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Scanning the service root failed for a reason other than a
    /// permission-denied subtree.
    #[error("cannot scan {path} for enabled services: {source}")]
    DiscoveryFailure {
        /// Path that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The compose program could not be launched at all.
    #[error("cannot launch {program}: {source}")]
    SpawnFailure {
        /// Program that failed to start.
        program: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}
