use std::{sync::Arc, time::Duration};

use roster_api::{build_router, state::AppState};
use roster_config::{Settings, StoreBackend};
use roster_db::{connect, indexes::ensure_indexes};
use roster_services::{InMemoryStore, MongoStore, ReviewStore};
use tokio::sync::Notify;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file (silently ignore if missing)
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            "roster_api=debug,roster_services=debug,roster_db=debug,tower_http=debug".into()
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load config
    let settings = Settings::load()?;
    info!("Starting reviewer roster API on {}:{}", settings.app.host, settings.app.port);
    info!(
        backend = ?settings.database.backend,
        no_candidate = ?settings.assignment.no_candidate,
        seeded = settings.assignment.rng_seed.is_some(),
        "Assignment config"
    );

    let store: Arc<dyn ReviewStore> = match settings.database.backend {
        StoreBackend::Mongodb => {
            let client = connect(&settings).await?;
            let db = client.database(&settings.database.name);
            ensure_indexes(&db).await?;
            Arc::new(MongoStore::new(&client, &db))
        }
        StoreBackend::Memory => {
            warn!("Using in-memory store; state is lost on restart");
            Arc::new(InMemoryStore::new())
        }
    };

    let app = build_router(AppState::new(store, settings.clone()));

    // Start server
    let addr = format!("{}:{}", settings.app.host, settings.app.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on {}", addr);

    let shutdown = Arc::new(Notify::new());
    let trigger = shutdown.clone();
    let server = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async move { trigger.notified().await })
            .await
    });

    shutdown_signal().await;
    info!("Shutdown signal received, draining connections");
    shutdown.notify_one();

    let grace = Duration::from_secs(settings.app.shutdown_grace_secs);
    match tokio::time::timeout(grace, server).await {
        Ok(joined) => joined??,
        Err(_) => warn!(grace_secs = grace.as_secs(), "Graceful shutdown timed out"),
    }
    info!("Server exiting");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to listen for SIGTERM");
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
