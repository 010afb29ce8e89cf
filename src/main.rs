use clap::Parser;

use chaincanvas::cli::{self, Cli, Command};
use chaincanvas::infrastructure::logging;
use chaincanvas::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().unwrap_or_default();
    logging::init_logging(&config.logging);

    let cli = Cli::parse();

    match cli.command {
        Command::Run(args) => cli::run::run(args).await,
        Command::Validate(args) => cli::validate::run(args),
        Command::CheckKeys => cli::check_keys::run().await,
    }
}
