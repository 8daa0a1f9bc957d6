//! movdash - Main Entry Point

use anyhow::Result;
use clap::Parser;
use movdash::commands::{load_config, run_options, run_render};
use movdash::watch::WatchSession;
use movdash::{Args, Command};
use movdash_common::init_logging;
use tracing::info;

fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = load_config(args.config.as_deref())?;
    if let Some(level) = &args.log_level {
        config.logging.level = level.clone();
    }

    init_logging(config.logging.to_logging_config())?;
    info!("Starting movdash {}", env!("CARGO_PKG_VERSION"));

    match &args.command {
        Command::Options(options) => print!("{}", run_options(&config, options)?),
        Command::Render(render) => println!("{}", run_render(&config, render)?),
        Command::Watch(watch) => WatchSession::new(&config, watch).run()?,
    }

    Ok(())
}
