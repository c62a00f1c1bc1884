mod cli;
mod entry;
mod render;

use clap::Parser;
use env_logger::Env;

use crate::cli::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    cli::run(Cli::parse()).await
}
