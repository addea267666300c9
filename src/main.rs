use anyhow::{Context, Result};
use clap::Parser;
use coursebase::cli::Cli;
use coursebase::config::{AppConfig, DEFAULT_LOG_FILTER};
use coursebase::web::router::build_router_with_cors;
use coursebase::{AppState, Database, ResourceKind};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::from_env()
        .context("failed to load application configuration")?
        .merge_cli(&cli);

    init_tracing(&config.log_filter);

    let db = match &config.data_file {
        Some(path) => Database::open_snapshot(path)
            .with_context(|| format!("failed to open snapshot {}", path.display()))?,
        None => {
            info!("no data file configured, records live in memory only");
            Database::new()
        }
    }
    .with_delete_policy(config.delete_policy);

    for kind in ResourceKind::ALL {
        info!(resource = kind.collection(), rows = db.row_count(kind).await, "table ready");
    }

    let app = build_router_with_cors(AppState::new(Arc::new(db)), &config.cors_origins);

    let addr = config.address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind to {addr}"))?;

    info!(
        address = %addr,
        delete_policy = %config.delete_policy,
        "coursebase started"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("coursebase stopped");
    Ok(())
}

// `filter` already reflects RUST_LOG and --log.
fn init_tracing(filter: &str) {
    tracing_subscriber::registry()
        .with(EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)))
        .with(tracing_subscriber::fmt::layer())
        .init();
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(error = %err, "unable to install Ctrl+C signal handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                error!(error = %err, "unable to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
