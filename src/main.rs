mod app;
mod cli;
mod collector;
mod config;
mod consts;
mod core;
mod error;
mod input;
mod notify;
mod output;
mod source;
mod store;
mod utils;

use clap::Parser;
use tracing::debug;

use cli::Cli;
use config::Config;
use utils::init_logging;

fn main() {
    let cli = Cli::parse();

    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };
    let cli = cli.with_config(&config);

    init_logging(cli.debug, config.log_file.as_deref());
    if let Some(path) = &config.loaded_from {
        debug!("Loaded config from {}", path.display());
    }

    if let Err(e) = app::dispatch(&cli, &config) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
