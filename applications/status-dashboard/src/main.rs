use status_dashboard::{
    api::{create_router, AppState},
    config::{Config, LoggingConfig},
    poller::{PollStats, Poller},
    render::RenderState,
    source::HttpDashboardClient,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config_path =
        std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config/config.yaml".to_string());

    let config = Config::load(&config_path)?;

    init_tracing(&config.logging);

    info!("Starting status-dashboard");
    info!("Configuration loaded from: {}", config_path);

    let client = Arc::new(HttpDashboardClient::new(&config.source)?);
    info!("Polling status from {}", client.base_url());

    let render = RenderState::shared();
    let stats = PollStats::shared();

    // Spawn poller task
    let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
    let poller = Poller::new(
        client.clone(),
        render.clone(),
        stats.clone(),
        Duration::from_millis(config.poll.interval_ms),
    );
    let poller_handle = tokio::spawn(async move {
        poller.run(shutdown_rx).await;
    });

    let state = AppState::new(render, stats, client.clone(), client);
    let app = create_router(state);

    // Start HTTP server
    let addr = config.bind_address();
    info!("Starting HTTP server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Stop polling once the server is down
    let _ = shutdown_tx.send(());
    poller_handle.await?;

    info!("Server shutdown complete");
    Ok(())
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "{},status_dashboard=debug,tower_http=debug",
            logging.level
        ))
    });

    let registry = tracing_subscriber::registry().with(filter);

    if logging.format == "json" {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down gracefully");
        },
        _ = terminate => {
            info!("Received SIGTERM, shutting down gracefully");
        },
    }
}
