//! postdesk: headless admin client for a blog content API.
#![deny(clippy::all, clippy::pedantic)]

mod args;
mod client;
mod handlers;
mod io;
mod print;

use clap::Parser;
use postdesk::{config, infra::telemetry};

use args::{Cli, Commands};
use client::{CliError, build_ctx};
use handlers::{categories, posts, uploads};

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let cli = Cli::parse();
    let settings = config::load(cli.config_file.as_deref(), &cli.overrides)?;
    telemetry::init(&settings.logging)?;
    let ctx = build_ctx(&cli, &settings)?;

    match cli.command {
        Commands::Categories(cmd) => categories::handle(&ctx, cmd.action).await?,
        Commands::Posts(cmd) => posts::handle(&ctx, cmd.action).await?,
        Commands::Uploads(cmd) => uploads::handle(&ctx, cmd.action).await?,
    }

    Ok(())
}
