use nutrition_tracker::clock::SystemClock;
use nutrition_tracker::recognition::CannedRecognizer;
use nutrition_tracker::{load_log, router, AppState, Config, FoodStore};
use std::{net::SocketAddr, sync::Arc};
use tokio::fs;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let config = Config::from_env();
    if let Some(parent) = config.data_path.parent() {
        fs::create_dir_all(parent).await?;
    }

    let log = load_log(&config.data_path).await?;
    info!(
        entries = log.entries.len(),
        path = %config.data_path.display(),
        "loaded nutrition log"
    );
    let store = FoodStore::new(log, config.user_id.clone(), SystemClock);
    let state = AppState::new(
        config.data_path.clone(),
        store,
        Arc::new(CannedRecognizer::default()),
    );

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutting down");
    }
}
