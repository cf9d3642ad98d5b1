//! Fairway Back binary entrypoint wiring the REST API to a storage backend.

use std::{env, net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use fairway_back::{
    config::AppConfig,
    dao::{
        game_store::{GameStore, memory::MemoryGameStore},
        storage::StorageError,
    },
    routes,
    services::storage_supervisor,
    state::{AppState, SharedState},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let catalog = AppConfig::load();
    let app_state = AppState::new(catalog);

    install_storage(app_state.clone()).await?;

    // Build the HTTP router once the shared state is ready.
    let app = build_router(app_state);

    let port = env::var("PORT")
        .or_else(|_| env::var("SERVER_PORT"))
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(8080);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!(%addr, "starting server");

    let listener = TcpListener::bind(addr).await.context("binding server")?;
    let service = app.into_make_service();
    axum::serve(listener, service)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving axum")?;

    Ok(())
}

/// Install the storage backend selected by `STORAGE_BACKEND`.
///
/// `memory` (the default) installs the in-process store immediately; `mongo`
/// hands connection management to the storage supervisor, which keeps the
/// application in degraded mode until MongoDB is reachable.
async fn install_storage(state: SharedState) -> anyhow::Result<()> {
    let backend = env::var("STORAGE_BACKEND").unwrap_or_else(|_| "memory".into());

    match backend.as_str() {
        "memory" => {
            state
                .set_game_store(Arc::new(MemoryGameStore::default()))
                .await;
            info!("using in-memory storage backend");
            Ok(())
        }
        #[cfg(feature = "mongo-store")]
        "mongo" => {
            tokio::spawn(storage_supervisor::run(state, || connect_mongo()));
            info!("using MongoDB storage backend");
            Ok(())
        }
        other => anyhow::bail!("unknown storage backend `{other}`"),
    }
}

/// Connect to MongoDB using `MONGO_URI` and optional `MONGO_DB`.
#[cfg(feature = "mongo-store")]
async fn connect_mongo() -> Result<Arc<dyn GameStore>, StorageError> {
    use fairway_back::dao::game_store::mongodb::{MongoConfig, MongoGameStore};

    let config = MongoConfig::from_env().await?;
    let store = MongoGameStore::connect(config).await?;

    Ok(Arc::new(store))
}

/// Build the top-level router and attach cross-cutting middleware layers.
fn build_router(state: SharedState) -> Router<()> {
    routes::router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Configure tracing subscribers so logs include spans by default.
fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,tower_http=debug".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Wait for Ctrl+C or SIGTERM and shut the server down gracefully.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let mut term = signal(SignalKind::terminate()).expect("install SIGTERM handler");
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {},
            _ = term.recv() => {},
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
