//! BrainBurst Back binary entrypoint wiring REST, storage, and notification layers.

use std::{env, net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod dao;
mod dto;
mod error;
mod notify;
mod routes;
mod services;
mod state;

use config::AppConfig;
use state::{AppState, SharedState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let app_state = AppState::new(AppConfig::load());

    install_storage(app_state.clone()).await;
    install_notification_backends(&app_state).await;

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

/// Pick a storage backend: MongoDB under supervision when a URI is
/// configured, the in-memory store otherwise.
async fn install_storage(state: SharedState) {
    #[cfg(feature = "mongo-store")]
    {
        use dao::score_store::{ScoreStore, mongodb::{MONGO_URI_ENV, MongoConfig, MongoScoreStore}};
        use dao::storage::StorageError;

        if env::var(MONGO_URI_ENV).is_ok() {
            tokio::spawn(services::storage_supervisor::run(state, || async {
                let config = MongoConfig::from_env().await?;
                let store = MongoScoreStore::connect(config).await?;
                Ok::<_, StorageError>(Arc::new(store) as Arc<dyn ScoreStore>)
            }));
            return;
        }

        warn!("MONGO_URI not set; falling back to the in-memory score store");
    }

    state
        .install_score_store(Arc::new(dao::score_store::memory::MemoryScoreStore::new()))
        .await;
}

/// Wire the subscription registry and mailer clients when configured.
#[cfg(feature = "http-notify")]
async fn install_notification_backends(state: &SharedState) {
    use notify::http::{HttpMailer, HttpSubscriptionRegistry, MailerConfig, RegistryConfig};

    match RegistryConfig::from_env().and_then(HttpSubscriptionRegistry::new) {
        Ok(registry) => state.install_registry(Arc::new(registry)).await,
        Err(err) => warn!(error = %err, "subscription registry not configured; mail gating disabled"),
    }

    match MailerConfig::from_env().and_then(HttpMailer::new) {
        Ok(mailer) => state.install_notifier(Arc::new(mailer)).await,
        Err(err) => warn!(error = %err, "mailer not configured; high-score mail disabled"),
    }
}

/// Without the `http-notify` feature the submission path records scores and
/// skips mail.
#[cfg(not(feature = "http-notify"))]
async fn install_notification_backends(_state: &SharedState) {
    warn!("built without the http-notify feature; high-score mail disabled");
}

/// Build the top-level router and attach cross-cutting middleware layers.
fn build_router(state: state::SharedState) -> Router<()> {
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
