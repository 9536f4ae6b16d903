mod pipeline;

use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "oogoo-cli")]
#[command(about = "Collects oogoocar.com listings, exports spreadsheets, uploads them to Drive")]
struct Cli {
    /// Leave the CSV files on disk instead of uploading them.
    #[arg(long)]
    skip_upload: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Config first: a missing or malformed credential blob must abort the
    // run before any scraping starts.
    let config = oogoo_core::load_app_config_from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.log_level.clone())),
        )
        .init();

    pipeline::run(&config, cli.skip_upload).await
}
