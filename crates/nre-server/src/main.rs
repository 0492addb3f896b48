mod api;
mod middleware;

use std::sync::Arc;

use nre_scraper::ScraperCommand;
use nre_ticks::ScoringEngine;
use tracing_subscriber::EnvFilter;

use crate::api::{build_app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = nre_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    tracing::info!(
        env = %config.env,
        backend = %config.embedding_backend,
        ticks_path = %config.ticks_path.display(),
        "starting narrative risk engine"
    );

    let engine = match ScoringEngine::bootstrap(&config).await {
        Ok(engine) => engine,
        Err(e) => {
            tracing::error!(error = %e, fatal = e.is_fatal(), "failed to build tick cache");
            return Err(e.into());
        }
    };
    let scraper = ScraperCommand::from_config(&config);

    let app = build_app(AppState {
        engine: Arc::new(engine),
        scraper: Arc::new(scraper),
    });

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
