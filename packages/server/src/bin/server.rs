// Main entry point for the heat map API server

use std::sync::Arc;

use anyhow::{Context, Result};
use shelter_core::domains::heat_map::HeatMapService;
use shelter_core::kernel::ServerDeps;
use shelter_core::server::{build_app, AppState};
use shelter_core::Config;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,shelter_core=debug,sqlx=warn".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_line_number(true),
        )
        .init();

    tracing::info!("Starting Shelter Heat Map API");

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!("Configuration loaded");

    if let Some(database_url) = &config.database_url {
        run_migrations(database_url).await;
    }

    let deps = ServerDeps::from_config(&config).await?;

    // Held for the lifetime of the server; dropping it stops the producers
    let subscription = deps.open_feed().await;

    let heat_map = Arc::new(HeatMapService::new(
        deps.resolver.clone(),
        subscription.feed().clone(),
        deps.stream_hub.clone(),
    ));
    let publisher = heat_map.spawn_publisher();

    let app = build_app(
        AppState::new(heat_map, deps.stream_hub.clone()),
        &config.allowed_origins,
    );

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Starting server on {}", addr);
    tracing::info!("Heat map: http://localhost:{}/api/heat-map", config.port);
    tracing::info!("Health check: http://localhost:{}/health", config.port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app).await.context("Server error")?;

    publisher.abort();
    drop(subscription);

    Ok(())
}

/// Apply pending migrations. A database that cannot be reached is not fatal:
/// the server still starts and serves an empty heat map.
async fn run_migrations(database_url: &str) {
    tracing::info!("Running database migrations...");
    let pool = match PgPoolOptions::new()
        .max_connections(1)
        .connect(database_url)
        .await
    {
        Ok(pool) => pool,
        Err(e) => {
            tracing::warn!(error = %e, "Database unreachable, skipping migrations");
            return;
        }
    };

    match sqlx::migrate!("./migrations").run(&pool).await {
        Ok(()) => tracing::info!("Migrations complete"),
        Err(e) => tracing::warn!(error = %e, "Failed to run migrations"),
    }
    pool.close().await;
}
