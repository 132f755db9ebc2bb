//! vrg CLI Binary
//!
//! Command-line client for VergeOS. Prints command output to stdout, errors
//! to stderr, and exits with the error's stable exit code.

use clap::Parser;
use std::process;
use tracing::{debug, error};
use vrg::cli::{exit_code, map_error, Cli, RunContext};
use vrg::config::ConfigLoader;
use vrg::error::VrgError;
use vrg::logging::{init_logging, LoggingConfig};

fn main() {
    let cli = Cli::parse();

    let config = match ConfigLoader::load_with(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => fail(&e),
    };

    let logging_config = build_logging_config(&cli, &config.logging);
    if let Err(e) = init_logging(Some(&logging_config)) {
        eprintln!("Failed to initialize logging: {}", e);
        process::exit(exit_code(&e));
    }

    debug!("vrg starting");

    let context = match RunContext::from_cli(&cli, config) {
        Ok(ctx) => ctx,
        Err(e) => fail(&e),
    };

    match context.execute(&cli.command) {
        Ok(output) => println!("{}", output),
        Err(e) => {
            error!("Command failed: {}", e);
            fail(&e)
        }
    }
}

fn fail(e: &VrgError) -> ! {
    eprintln!("{}", map_error(e));
    process::exit(exit_code(e));
}

/// Build logging configuration from CLI args on top of the config file.
/// Precedence: CLI flags override config file override defaults.
fn build_logging_config(cli: &Cli, base: &LoggingConfig) -> LoggingConfig {
    let mut config = base.clone();

    if cli.quiet {
        config.enabled = false;
    }
    if cli.verbose {
        config.level = "debug".to_string();
    }
    if let Some(ref level) = cli.log_level {
        config.level = level.clone();
    }
    if let Some(ref format) = cli.log_format {
        config.format = format.clone();
    }
    if let Some(ref output) = cli.log_output {
        config.output = output.clone();
    }
    if let Some(ref file) = cli.log_file {
        config.file = Some(file.clone());
    }
    if cli.no_color {
        config.color = false;
    }

    config
}
