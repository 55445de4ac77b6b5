//! Goat API server.
//!
//! Run from repo root: `cargo run -p goat-server`
//! Without PostgreSQL: `GOAT_STORE=memory cargo run -p goat-server` serves the three fixture goats.

use goat_api::{app, open_gateway, AppState, Settings};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("goat_api=info,goat_server=info,tower_http=info")),
        )
        .init();

    let settings = Settings::from_env()?;
    let gateway = open_gateway(&settings).await?;
    let state = AppState::with_gateway(gateway, settings.error_exposure);
    let router = app(state, &settings);

    let listener = TcpListener::bind(&settings.listen_addr).await?;
    tracing::info!("goat api listening on {}", listener.local_addr()?);
    axum::serve(listener, router).await?;
    Ok(())
}
