// HTTP server startup

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use weather_core::{Config, WeatherService};

use crate::routes;

pub async fn start_server(config: Config) -> anyhow::Result<()> {
    let service = WeatherService::from_config(&config)?;
    let app = routes::router(Arc::new(service));

    let listener = TcpListener::bind(&config.server.bind)
        .await
        .with_context(|| format!("Failed to bind {}", config.server.bind))?;

    tracing::info!(
        "Weather API listening on {} (model {}, cache {}s, retries {})",
        listener.local_addr()?,
        config.open_meteo.model,
        config.http.cache_expire_secs,
        config.http.retries
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    tracing::info!("shut down");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("got SIGINT, draining connections"),
        Err(e) => {
            tracing::warn!("Could not listen for SIGINT: {}", e);
            std::future::pending::<()>().await;
        }
    }
}
