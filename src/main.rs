use gym_tracker::{
    identity::LocalIdentityProvider, loader, persistence, router, schedule::TokioScheduler,
    AppState, Config, FileDocumentStore,
};
use std::{net::SocketAddr, sync::Arc};
use tokio::fs;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let config = Config::load()?;
    fs::create_dir_all(&config.data_dir).await?;

    let state = AppState::new(
        Arc::new(FileDocumentStore::new(config.data_dir.clone())),
        Arc::new(LocalIdentityProvider::new(config.account.clone())),
        Arc::new(TokioScheduler),
        config.debounce,
    );
    let identity_listener = loader::spawn_listener(state.clone());

    let app = router(state.clone());
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));

    info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    identity_listener.abort();
    if let Err(err) = persistence::flush(&state).await {
        error!("failed to save pending edits on shutdown: {err}");
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!("failed to listen for shutdown signal: {err}");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}
