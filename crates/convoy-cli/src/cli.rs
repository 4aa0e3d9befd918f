//! CLI argument parsing using clap.

use clap::Parser;
use clap::Subcommand;
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "convoy")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Stack root containing the service directories
    #[arg(short = 'r', long, global = true, default_value = ".", value_name = "DIR")]
    pub root: PathBuf,

    /// Config file path (default: <root>/infra.json)
    #[arg(short = 'c', long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output results in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start all enabled services in the background
    Up,
    /// Stop and remove all enabled services
    Down,
    /// Pull the latest images for all enabled services
    Pull,
    /// Start previously created service containers
    Start,
    /// Stop running service containers without removing them
    Stop,
    /// Restart all enabled services (down, then up)
    Restart,
    /// Show container status across all enabled services
    Status,
    /// Show aggregated logs across all enabled services
    Logs(LogsArgs),
    /// Snapshot the stack root into a tar.gz archive
    Backup(BackupArgs),
    /// Create a default config file in the stack root
    Init,
    /// Generate shell completions
    Completion(CompletionArgs),
}

#[derive(clap::Args)]
pub struct LogsArgs {
    /// Follow log output
    #[arg(short, long)]
    pub follow: bool,
}

#[derive(clap::Args)]
pub struct BackupArgs {
    /// Archive output path (default: <root>/<archive_name> from config)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Compression level (1-9)
    #[arg(short = 'l', long, value_parser = clap::value_parser!(u8).range(1..=9))]
    pub compression_level: Option<u8>,

    /// Exclude a path from the archive (can be repeated)
    #[arg(long = "exclude", short = 'x', value_name = "PATH")]
    pub exclude: Vec<PathBuf>,

    /// Archive without stopping services first
    #[arg(long)]
    pub skip_services: bool,
}

#[derive(clap::Args)]
pub struct CompletionArgs {
    /// Target shell
    #[arg(value_enum)]
    pub shell: Shell,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_backup_args_parse() {
        let cli = Cli::try_parse_from([
            "convoy",
            "backup",
            "--skip-services",
            "-l",
            "9",
            "-x",
            "cache",
        ])
        .unwrap();

        match cli.command {
            Commands::Backup(args) => {
                assert!(args.skip_services);
                assert_eq!(args.compression_level, Some(9));
                assert_eq!(args.exclude, vec![PathBuf::from("cache")]);
            }
            _ => panic!("expected backup subcommand"),
        }
    }

    #[test]
    fn test_verbose_conflicts_with_quiet() {
        let result = Cli::try_parse_from(["convoy", "up", "--verbose", "--quiet"]);
        assert!(result.is_err());
    }
}
