use allot_cli::{AllotConfig, Cli, tracing_setup};
use clap::Parser;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = AllotConfig::load()?;
    tracing_setup::init_tracing(&config.logging)?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        config = ?config.source,
        cache = config.engine.cache.enabled,
        "Starting allot"
    );

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    cli.execute(&config, &mut out).await
}
