//! eqlens CLI - Main entry point

use clap::Parser;
use eqlens_cli::{commands, Cli, Commands};
use eqlens_common::logging::{init_logging, LogConfig, LogLevel, LogOutput};
use std::io;
use std::process;
use tracing::error;

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose { LogLevel::Debug } else { LogLevel::Warn };
    let log_config = LogConfig::builder()
        .level(level)
        .output(LogOutput::Console)
        .console_stderr(true)
        .log_file_prefix("eqlens-cli")
        .build();
    let log_config = log_config.clone().merge_env().unwrap_or(log_config);

    // the CLI works without logging
    let _guard = init_logging(&log_config).ok();

    if let Err(e) = execute_command(&cli) {
        error!(error = %e, "Command failed");
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn execute_command(cli: &Cli) -> eqlens_cli::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match &cli.command {
        Commands::Summary { input } => commands::summary::run(input, &mut out),
        Commands::Distribution { input } => commands::distribution::run(input, &mut out),
        Commands::Charts { input, equipment } => {
            commands::charts::run(input, *equipment, &mut out)
        }
        Commands::Report {
            input,
            output,
            force,
        } => commands::report::run(input, output, *force, &mut out),
    }
}
