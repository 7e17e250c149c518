//! Barkeep Server — staff portal backend
//!
//! Main entry point that wires all crates together and starts the server.

use std::sync::Arc;

use tokio::sync::watch;
use tracing_subscriber::{fmt, EnvFilter};

use barkeep_core::config::AppConfig;
use barkeep_core::error::AppError;
use barkeep_entity::migration::{GateState, MigrationStatus};
use barkeep_entity::user::StaffRole;
use barkeep_store::migration::{JsonLegacySource, MigrationGate, PgMigrationTarget};
use barkeep_store::repositories::{
    BackgroundImageRepository, NotificationRepository, StaffUserRepository, TicketRepository,
};
use barkeep_sync::session::center_for_session;
use barkeep_sync::{NoopCenter, NotificationCenter, SessionContext, TracingAlertSink};

#[tokio::main]
async fn main() {
    let env = std::env::var("BARKEEP_ENV").unwrap_or_else(|_| "development".to_string());

    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting Barkeep v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Database connection + schema migrations ──────────
    let db = barkeep_store::DatabasePool::connect(&config.database).await?;
    barkeep_store::migrate::run_migrations(db.pool()).await?;
    let db_pool = db.pool().clone();

    // ── Step 2: Repositories ─────────────────────────────────────
    let notification_repo = Arc::new(NotificationRepository::new(db_pool.clone()));
    let user_repo = Arc::new(StaffUserRepository::new(db_pool.clone()));
    let ticket_repo = Arc::new(TicketRepository::new(db_pool.clone()));
    let image_repo = Arc::new(BackgroundImageRepository::new(db_pool.clone()));

    // ── Step 3: Legacy-data migration gate ───────────────────────
    let gate = MigrationGate::new(
        Arc::new(JsonLegacySource::new(&config.migration)),
        Arc::new(PgMigrationTarget::new(
            Arc::clone(&user_repo),
            Arc::clone(&ticket_repo),
        )),
    );
    let gate_state = gate.run().await;
    let migration_status = match gate.check_status().await {
        Ok(status) => status,
        Err(_) => MigrationStatus {
            users_migrated: false,
            tickets_migrated: false,
        },
    };
    if gate_state == GateState::Error {
        tracing::warn!("Migration gate failed; running degraded without the notification feed");
    }

    // ── Step 4: Object store + image manager ─────────────────────
    let object_store: Arc<dyn barkeep_core::traits::object_store::ObjectStore> =
        Arc::new(barkeep_storage::LocalObjectStore::new(&config.storage).await?);
    let images = Arc::new(barkeep_storage::BackgroundImageManager::new(
        Arc::clone(&object_store),
        Arc::clone(&image_repo) as _,
        &config.storage,
    ));

    // ── Step 5: Change feed + notification center ────────────────
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let center: Arc<dyn NotificationCenter> = if gate_state.is_completed() {
        let feed = Arc::new(barkeep_store::PgChangeFeed::new(&config.realtime));
        feed.spawn_listener(db_pool.clone(), shutdown_rx.clone());

        let session = SessionContext::new("portal", StaffRole::Admin);
        let center = center_for_session(
            &session,
            Arc::clone(&notification_repo) as _,
            feed as _,
            Arc::new(TracingAlertSink),
            &config.realtime,
        )
        .await?;

        if let Err(e) = center.fetch_initial().await {
            tracing::warn!("Initial notification fetch failed: {}", e);
        }
        center
    } else {
        Arc::new(NoopCenter)
    };

    // ── Step 6: Build and start HTTP server ──────────────────────
    let app_state = barkeep_api::AppState {
        config: Arc::new(config.clone()),
        db_pool,
        object_store,
        images,
        notifications: notification_repo,
        center: Arc::clone(&center),
        migration_state: gate_state,
        migration_status,
    };

    let app = barkeep_api::build_router(app_state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {}: {}", addr, e)))?;

    tracing::info!("Barkeep server listening on {}", addr);

    // ── Step 7: Graceful shutdown ────────────────────────────────
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            tracing::info!("Shutdown signal received, starting graceful shutdown...");
            let _ = shutdown_tx.send(true);
        })
        .await
        .map_err(|e| AppError::internal(format!("Server error: {}", e)))?;

    center.teardown();
    db.close().await;

    tracing::info!("Barkeep server shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
