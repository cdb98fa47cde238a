//! Cyberoscope Back binary entrypoint wiring the REST routes to the team store.

use std::{env, net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::Router;
use cyberoscope_back::{
    config::{self, AppConfig},
    dao::team_store::memory::MemoryTeamStore,
    routes,
    state::{AppState, SharedState},
};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_PORT: u16 = 5000;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let app_state = AppState::new(AppConfig::load());

    match config::mongo_uri_from_env() {
        Some(uri) => start_mongo_supervisor(app_state.clone(), uri),
        None => {
            warn!(
                "MONGODB_URI / MONGO_URI not set; using the in-memory team store, data is lost on restart"
            );
            app_state
                .set_team_store(Arc::new(MemoryTeamStore::new()))
                .await;
        }
    }

    let app = build_router(app_state);

    let port = env::var("PORT")
        .or_else(|_| env::var("SERVER_PORT"))
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(DEFAULT_PORT);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!(%addr, "starting server");

    let listener = TcpListener::bind(addr).await.context("binding server")?;
    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving axum")?;

    Ok(())
}

/// Spawn the supervisor that connects to MongoDB and keeps degraded mode up to date.
#[cfg(feature = "mongo-store")]
fn start_mongo_supervisor(state: SharedState, uri: String) {
    use cyberoscope_back::{
        dao::{
            storage::StorageError,
            team_store::{
                TeamStore,
                mongodb::{MongoConfig, MongoTeamStore},
            },
        },
        services::storage_supervisor,
    };

    let db_name = env::var("MONGO_DB").ok();
    tokio::spawn(storage_supervisor::run(state, move || {
        let uri = uri.clone();
        let db_name = db_name.clone();
        async move {
            let config = MongoConfig::from_uri(&uri, db_name.as_deref())
                .await
                .map_err(StorageError::from)?;
            let store = MongoTeamStore::connect(config)
                .await
                .map_err(StorageError::from)?;
            Ok(Arc::new(store) as Arc<dyn TeamStore>)
        }
    }));
}

#[cfg(not(feature = "mongo-store"))]
fn start_mongo_supervisor(state: SharedState, _uri: String) {
    warn!("built without MongoDB support; ignoring the MongoDB URI and using the in-memory team store");
    tokio::spawn(async move {
        state.set_team_store(Arc::new(MemoryTeamStore::new())).await;
    });
}

/// Build the top-level router and attach cross-cutting middleware layers.
fn build_router(state: SharedState) -> Router<()> {
    routes::router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Configure tracing subscribers so logs include spans by default.
fn init_tracing() {
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

        match signal(SignalKind::terminate()) {
            Ok(mut term) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {},
                    _ = term.recv() => {},
                }
            }
            Err(err) => {
                warn!(error = %err, "failed to install SIGTERM handler; waiting for Ctrl+C only");
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
