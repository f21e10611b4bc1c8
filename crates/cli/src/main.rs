//! # lancache-sync
//!
//! Points AdGuard Home DNS rewrites for game and software CDNs at a LAN
//! cache server, using the domain lists published by the cache-domains
//! project.

mod bootstrap;
mod cli;
mod commands;
mod di;

use bootstrap::{init_logging, load_config};
use clap::Parser;
use cli::{Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let command = cli.command();

    let config = load_config(cli.config.as_deref(), cli.overrides(&command))?;
    init_logging(&config);

    let exit_code = match &command {
        Command::Run(args) => commands::run(&config, args).await?,
        Command::ListSources => commands::list_sources(&config).await?,
    };

    std::process::exit(exit_code);
}
