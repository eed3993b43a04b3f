mod config;
mod wiring;

use std::error::Error;

use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use api::{rankings::RankingStore, state::AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = config::Config::from_env()?;

    let rankings = RankingStore::with_file(&config.rankings_path);
    let mut state = AppState::with_store(rankings);
    if let Some(seed) = config.session_seed {
        state = state.with_base_seed(seed);
    }

    let listener = TcpListener::bind(config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "game server listening");

    axum::serve(listener, wiring::build_app(state)).await?;
    Ok(())
}
