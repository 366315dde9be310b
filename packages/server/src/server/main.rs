// Main entry point for the listing lifecycle service

use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use subly_core::domains::listings::ExpirationSchedule;
use subly_core::kernel::{start_scheduler, ServerDeps};
use subly_core::server::{build_app, AppState};
use subly_core::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,subly_core=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Subly listing lifecycle service");

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!("Configuration loaded");

    // Connect to database
    tracing::info!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Database connected");

    // Run migrations
    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;
    tracing::info!("Migrations complete");

    let deps = ServerDeps::from_config(pool.clone(), &config)
        .context("Failed to build server dependencies")?;

    // Expiration sweep: hourly plus once now
    let schedule = ExpirationSchedule {
        cron: config.expiration_cron.clone(),
        run_on_startup: config.expire_on_startup,
    };
    let (mut scheduler, lifecycle) = start_scheduler(&deps, schedule)
        .await
        .context("Failed to start scheduled tasks")?;

    let app = build_app(AppState::new(
        pool,
        lifecycle,
        config.admin_api_token.clone(),
    ));

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Starting server on {}", addr);
    tracing::info!("Health check: http://localhost:{}/health", config.port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Shutting down scheduler");
    scheduler
        .shutdown()
        .await
        .context("Failed to shut down scheduler")?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
