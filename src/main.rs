use std::sync::Arc;

use clap::Parser;
use playlist_app::{
    api::{serve, AppState},
    config::Config,
    db::DB,
    options,
};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let args = options::Args::parse();
    let config = Config::load(&args)?;
    debug!("database {}, listening on {}", config.database_url, config.bind_addr);

    let db = Arc::new(DB::connect(&config.database_url).await?);
    let state = AppState::new(db, config.secret()?);
    serve(state, &config.bind_addr).await?;
    Ok(())
}
