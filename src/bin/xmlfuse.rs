//! xmlfuse CLI binary.

use clap::Parser;
use std::process;
use tracing::{debug, error};
use xmlfuse::cli::{self, Cli};
use xmlfuse::config::MergeConfig;
use xmlfuse::logging;

fn main() {
    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {:#}", e);
            process::exit(2);
        }
    };

    if let Err(e) = logging::init_logging(&config.logging) {
        eprintln!("failed to initialize logging: {}", e);
        process::exit(2);
    }

    debug!("configuration loaded");

    match cli::execute(&cli.command, &config) {
        Ok((message, code)) => {
            println!("{}", message);
            process::exit(code);
        }
        Err(e) => {
            error!("command failed: {}", e);
            eprintln!("error: {}", e);
            process::exit(2);
        }
    }
}

/// Merge config-file settings with logging flags; flags win.
fn load_config(cli: &Cli) -> anyhow::Result<MergeConfig> {
    let mut config = match &cli.config {
        Some(path) => MergeConfig::load_from_file(path)?,
        None => MergeConfig::default(),
    };

    if cli.verbose {
        config.logging.level = "debug".to_string();
    }
    if let Some(level) = &cli.log_level {
        config.logging.level = level.clone();
    }
    if let Some(format) = &cli.log_format {
        config.logging.format = format.clone();
    }

    Ok(config)
}
