//! `synnerdata` command-line tool

mod commands;
mod config;
mod error;
mod output;

use clap::Parser;
use simplelog::ColorChoice;
use simplelog::Config;
use simplelog::LevelFilter;
use simplelog::TermLogger;
use simplelog::TerminalMode;

use crate::commands::Cli;
use crate::config::CliConfig;
use crate::output::print_error;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match CliConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            print_error(&e.notice().to_string());
            std::process::exit(1);
        }
    };

    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        config.log_level()
    };
    // stderr only, stdout carries command output
    if let Err(e) = TermLogger::init(level, Config::default(), TerminalMode::Stderr, ColorChoice::Auto) {
        eprintln!("Failed to initialize logger: {}", e);
    }

    if let Err(e) = cli.execute(&config).await {
        log::debug!("command failed: {:?}", e);
        print_error(&e.notice().to_string());
        std::process::exit(1);
    }
}
