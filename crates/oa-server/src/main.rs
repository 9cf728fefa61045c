//! Orchard Advisor HTTP API server.
//!
//! Serves query classification, pest-risk prediction and conversational
//! advice over REST.

use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use oa_advisor::AdvisorService;
use oa_server::config::ServerConfig;
use oa_server::routes;
use oa_server::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "oa-server starting");

    let config = ServerConfig::from_env()?;
    let advisor = AdvisorService::from_config(&config.advisor)?;
    let state = AppState::new(advisor, config.advisor.history.capacity);

    let app = routes::build_router(state);

    let addr = config.addr();
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(addr = %addr, "listening");

    axum::serve(listener, app).await?;

    Ok(())
}
