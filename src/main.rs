mod backend;
mod cli;
mod cmd;
mod command;
mod config;
mod devbox;
mod error;
mod filesystem;
mod lifecycle;
mod logger;
mod manifest;
mod provision;
mod shell;
mod state;
mod template;

use anyhow::Result;
use clap::Parser;
use tracing::{error, info};

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    logger::init(cli.verbose)?;
    info!(args = ?std::env::args().collect::<Vec<_>>(), "devbox start");

    match cli::run(cli) {
        Ok(result) => {
            info!("devbox finished successfully");
            Ok(result)
        }
        Err(err) => {
            error!(error = ?err, "devbox failed");
            Err(err)
        }
    }
}
