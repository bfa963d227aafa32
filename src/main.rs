use since_counters::clock::{Clock, SystemClock};
use since_counters::ticker::spawn_ticker;
use since_counters::{load_counters, router, AppState, Config, CounterBook};
use std::sync::Arc;
use tokio::fs;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let config = Config::from_env();
    if let Some(parent) = config.data_path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).await?;
    }

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let counters = load_counters(&config.data_path, clock.now()).await;
    let state = AppState::new(config.data_path.clone(), CounterBook::new(counters), clock);

    spawn_ticker(state.clone(), config.tick_interval);
    let app = router(state);

    let addr = config.addr();
    info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {err}");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}
