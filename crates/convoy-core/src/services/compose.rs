//! Fan-out execution of compose subcommands.

use crate::services::ServiceError;
use std::io;
use std::path::Path;
use std::path::PathBuf;
use std::process::Command;
use std::process::ExitStatus;

/// Outcome of one compose invocation in one service directory.
#[derive(Debug)]
pub struct ServiceRun {
    /// Directory the command ran in.
    pub dir: PathBuf,

    /// Exit status, or the error that prevented the launch.
    pub outcome: io::Result<ExitStatus>,
}

impl ServiceRun {
    /// Returns `true` if the command launched and exited successfully.
    #[must_use]
    pub fn succeeded(&self) -> bool {
        matches!(&self.outcome, Ok(status) if status.success())
    }
}

/// Runs `<program> compose ...` against enabled service directories.
///
/// Child processes inherit the parent's stdio so compose output reaches
/// the operator unmodified. The program defaults to `docker` and is
/// overridable, mostly so tests can substitute a stub.
#[derive(Debug, Clone)]
pub struct ComposeRunner {
    program: PathBuf,
}

impl Default for ComposeRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl ComposeRunner {
    /// Creates a runner invoking the `docker` binary from `PATH`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            program: PathBuf::from("docker"),
        }
    }

    /// Creates a runner invoking a specific program.
    #[must_use]
    pub fn with_program<P: Into<PathBuf>>(program: P) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Runs the subcommand once per directory, in order.
    ///
    /// A failure in one directory never aborts the fan-out; every
    /// directory gets its attempt and its own [`ServiceRun`] outcome.
    #[must_use]
    pub fn run_in_each(&self, dirs: &[PathBuf], args: &[&str]) -> Vec<ServiceRun> {
        dirs.iter()
            .map(|dir| ServiceRun {
                dir: dir.clone(),
                outcome: Command::new(&self.program)
                    .arg("compose")
                    .args(args)
                    .current_dir(dir)
                    .status(),
            })
            .collect()
    }

    /// Runs one aggregated command spanning several compose files, as
    /// `compose -f a.yml -f b.yml <args>`.
    ///
    /// Used for read-only views (`ps`, `logs`) where a single merged
    /// invocation beats one process per directory.
    pub fn run_aggregated(
        &self,
        compose_files: &[PathBuf],
        args: &[&str],
    ) -> Result<ExitStatus, ServiceError> {
        let mut command = Command::new(&self.program);
        command.arg("compose");
        for file in compose_files {
            command.arg("-f").arg(file);
        }
        command.args(args);

        command.status().map_err(|e| ServiceError::SpawnFailure {
            program: self.program.clone(),
            source: e,
        })
    }

    /// The program this runner launches.
    #[must_use]
    pub fn program(&self) -> &Path {
        &self.program
    }
}
