use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use marquee::cli::{self, Cli};
use marquee::config::Config;
use marquee::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays machine-readable
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "marquee=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = cli.global.apply(Config::from_env());
    tracing::debug!(
        storage = ?config.storage_backend,
        cache = ?config.cache_backend,
        invalidation = ?config.invalidation,
        "Loaded configuration"
    );

    let state = AppState::new(&config).await?;

    cli::run(cli, &state).await
}
