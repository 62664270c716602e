//! # hasnapd — hasnap daemon
//!
//! Composition root that wires all adapters together and starts the server.
//!
//! ## Responsibilities
//! - Load configuration (`hasnap.toml` plus environment overrides)
//! - Install the `tracing` subscriber
//! - Initialize the `SQLite` connection pool, run migrations, and load the
//!   registry seed when configured
//! - Construct the registry, sink, and notifier adapters
//! - Construct the snapshot service, injecting adapters via port traits
//! - Build the axum router and serve it until SIGINT/SIGTERM
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer; no domain logic belongs here.

mod config;

use hasnap_adapter_fs::FsSnapshotSink;
use hasnap_adapter_http_axum::state::AppState;
use hasnap_adapter_storage_sqlite_sqlx::{
    RegistrySeed, SqliteAreaRepository, SqliteConfigEntryRepository, SqliteDeviceRepository,
    SqliteEntityRepository, SqliteNotificationStore,
};
use hasnap_app::services::SnapshotService;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::config::Config;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_new(&config.logging.filter)?)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "starting hasnapd");

    // Database
    let db = hasnap_adapter_storage_sqlite_sqlx::Config {
        database_url: config.database_url().to_string(),
    }
    .build()
    .await?;
    if let Some(path) = &config.database.seed {
        let seed = RegistrySeed::from_file(path)?;
        db.seed(seed).await?;
    }
    let pool = db.pool().clone();

    // Adapters
    let device_repo = SqliteDeviceRepository::new(pool.clone());
    let entity_repo = SqliteEntityRepository::new(pool.clone());
    let area_repo = SqliteAreaRepository::new(pool.clone());
    let config_entry_repo = SqliteConfigEntryRepository::new(pool.clone());
    let notifier = SqliteNotificationStore::new(pool);
    let sink = FsSnapshotSink::new(&config.snapshot.output_dir);

    // Services
    let settings = config.snapshot.settings();
    settings.validate()?;
    let snapshot_service = SnapshotService::new(
        device_repo,
        entity_repo,
        area_repo,
        config_entry_repo,
        sink,
        notifier,
        settings,
    );

    // HTTP
    let state = AppState::new(snapshot_service, config.snapshot.export_defaults());
    let app = hasnap_adapter_http_axum::router::build(state, &config.snapshot.output_dir);

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(
        %bind_addr,
        output_dir = %config.snapshot.output_dir.display(),
        "hasnapd listening"
    );
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("hasnapd stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "unable to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "unable to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("received Ctrl+C, shutting down"),
        () = terminate => tracing::info!("received terminate signal, shutting down"),
    }
}
