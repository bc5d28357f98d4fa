mod app;
mod cli;
mod config;
mod consts;
mod core;
mod error;
mod output;
mod parser;
mod store;
mod utils;

use clap::Parser;
use log::LevelFilter;

use app::{CommandContext, run_command};
use cli::Cli;
use config::Config;
use error::AppError;

/// stderr logger. RUST_LOG wins over --debug and the config file.
fn init_logging(debug: bool) -> bool {
    let from_env = std::env::var_os("RUST_LOG").is_some();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug"))
        .format_timestamp(None)
        .init();
    if !from_env {
        log::set_max_level(level(debug));
    }
    from_env
}

fn level(debug: bool) -> LevelFilter {
    if debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    }
}

fn run(cli: &Cli) -> Result<(), AppError> {
    let mut ctx = CommandContext::new(cli)?;
    run_command(&mut ctx)
}

fn main() {
    let cli = Cli::parse();
    let from_env = init_logging(cli.debug);

    // Load config file and merge with CLI args (CLI takes precedence)
    let config = Config::load();
    let cli = cli.with_config(&config);
    if !from_env {
        log::set_max_level(level(cli.debug));
    }

    if let Err(e) = run(&cli) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
