//! Convoy - operator CLI for compose-managed service stacks with
//! built-in backup.

mod cli;
mod commands;
mod config;
mod error;
mod output;
mod progress;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    let formatter = output::create_formatter(cli.json, cli.verbose, cli.quiet);
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| cli.root.join(config::DEFAULT_CONFIG_NAME));

    match &cli.command {
        cli::Commands::Up => commands::services::up(&cli.root, &*formatter),
        cli::Commands::Down => commands::services::down(&cli.root, &*formatter),
        cli::Commands::Pull => commands::services::pull(&cli.root, &*formatter),
        cli::Commands::Start => commands::services::start(&cli.root, &*formatter),
        cli::Commands::Stop => commands::services::stop(&cli.root, &*formatter),
        cli::Commands::Restart => commands::services::restart(&cli.root, &*formatter),
        cli::Commands::Status => commands::services::status(&cli.root, &*formatter),
        cli::Commands::Logs(args) => {
            commands::services::logs(&cli.root, args.follow, &*formatter)
        }
        cli::Commands::Backup(args) => commands::backup::execute(
            args,
            &cli.root,
            &config_path,
            &*formatter,
            cli.quiet,
            cli.json,
        ),
        cli::Commands::Init => commands::init::execute(&config_path, &*formatter),
        cli::Commands::Completion(args) => {
            commands::completion::execute(args.shell);
            Ok(())
        }
    }
}
