mod cli;

use anyhow::{Error, Result};
use clap::Parser;
use cli::{command, Cli};
use supram::{
    config::Settings,
    store::{HttpStore, LocalStore},
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Error> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_env("SUPRAM_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let mut settings = Settings::load(cli.config.as_deref())?;
    if let Some(base_url) = &cli.base_url {
        settings.base_url.clone_from(base_url);
    }
    if let Some(output_dir) = &cli.output_dir {
        settings.output_dir.clone_from(output_dir);
    }

    let outcome = match &cli.local {
        Some(root) => command::run(&cli.command, &settings, LocalStore::new(root)).await,
        None => command::run(&cli.command, &settings, HttpStore::new(&settings.base_url)).await,
    };

    match outcome {
        Ok(output) => println!("{}", output),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }

    Ok(())
}
