use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use attrdb_cli::args::Cli;
use attrdb_cli::commands::{self, Output};
use attrdb_db::{AttributeCatalog, CatalogConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "attrdb_cli=info,attrdb_db=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    // --- Configuration ---
    let mut config = CatalogConfig::from_env().map_err(anyhow::Error::msg)?;
    if let Some(path) = cli.database {
        config.database_path = path;
    }
    tracing::debug!(
        database = %config.database_path.display(),
        strategy = config.remap_strategy.as_str(),
        revalidate = config.revalidate_on_apply,
        "Loaded catalog configuration"
    );

    // --- Database ---
    let catalog = AttributeCatalog::open(config).await?;

    commands::run(cli.command, &catalog, Output { json: cli.json }).await
}
