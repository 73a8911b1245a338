//! shelf-server
//!
//! Binds the page and action routes to Postgres and Supabase and serves them.

use std::sync::Arc;
use std::time::Duration;

use axum::{extract::DefaultBodyLimit, routing::get, Router};
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use shelf_api::{ApiConfig, AppState};
use shelf_auth::{CookieConfig, MemorySessionStore, SessionStore, SupabaseAuth};
use shelf_core::config::{AppConfig, ServerConfig};
use shelf_db::{AssetRepository, Database, LocationRepository, UserRepository};
use shelf_storage::{CropOptions, ProfilePictureService, SupabaseStorage};

mod health;

use health::{HealthChecker, HealthConfig};

/// How often expired sessions are dropped
const SESSION_CLEANUP_INTERVAL: Duration = Duration::from_secs(600);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    dotenvy::dotenv().ok();
    let config_path = std::env::var("SHELF_CONFIG").ok();
    let config = AppConfig::load(config_path.as_deref())?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        host = %config.server.host,
        port = config.server.port,
        "Starting shelf-server"
    );

    let db = match Database::connect(&config.database).await {
        Ok(db) => db,
        Err(e) => {
            warn!(error = %e, "Postgres unreachable at startup, connecting on first query");
            Database::connect_lazy(&config.database)?
        }
    };

    let sessions = Arc::new(MemorySessionStore::new());
    spawn_session_cleanup(sessions.clone());

    let health = Arc::new(HealthChecker::new(HealthConfig::default()).with_database(db.clone()));
    let state = build_state(&config, &db, sessions);
    let app = build_router(state, health, &config.server);

    let addr = config.server_addr();
    info!(%addr, "Listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db.close().await;
    info!("Stopped");
    Ok(())
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "info,shelf_server=debug,shelf_api=debug,tower_http=debug".into()
            }),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true),
        )
        .init();
}

/// Postgres stores and Supabase clients behind the API
fn build_state(config: &AppConfig, db: &Database, sessions: Arc<MemorySessionStore>) -> AppState {
    let base_url = config.supabase_base_url();

    let storage = Arc::new(SupabaseStorage::new(
        base_url,
        config.storage.service_role_key.as_str(),
    ));
    let pictures = ProfilePictureService::new(
        storage,
        config.storage.profile_pictures_bucket.as_str(),
        config.storage.max_upload_bytes,
    )
    .with_crop(CropOptions::square(config.storage.crop_size));

    AppState {
        locations: Arc::new(LocationRepository::new(db.pool().clone())),
        users: Arc::new(UserRepository::new(db.pool().clone())),
        assets: Arc::new(AssetRepository::new(db.pool().clone())),
        sessions,
        authenticator: Arc::new(SupabaseAuth::new(
            base_url,
            config.auth.supabase_anon_key.as_str(),
        )),
        pictures: Arc::new(pictures),
        config: Arc::new(ApiConfig {
            app_title: config.instance.app_title.clone(),
            cookie: CookieConfig::from(&config.auth),
            session_lifetime_seconds: config.auth.session_lifetime_seconds,
        }),
    }
}

fn build_router(state: AppState, health: Arc<HealthChecker>, server: &ServerConfig) -> Router {
    // Probes sit outside the session redirect
    let health_routes = Router::new()
        .route("/health", get(health::liveness))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .with_state(health);

    Router::new()
        .merge(health_routes)
        .merge(shelf_api::router().with_state(state))
        .layer(DefaultBodyLimit::max(server.max_body_size_bytes))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(TimeoutLayer::new(Duration::from_secs(
                    server.request_timeout_seconds,
                )))
                .layer(CompressionLayer::new())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any),
                ),
        )
}

fn spawn_session_cleanup(sessions: Arc<MemorySessionStore>) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(SESSION_CLEANUP_INTERVAL);
        loop {
            interval.tick().await;
            match sessions.cleanup_expired() {
                Ok(0) => {}
                Ok(removed) => info!(removed, "Expired sessions removed"),
                Err(e) => warn!(error = %e, "Session cleanup failed"),
            }
        }
    });
}

/// Resolves on Ctrl+C or SIGTERM
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
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Ctrl+C received, draining connections");
        }
        _ = terminate => {
            info!("SIGTERM received, draining connections");
        }
    }
}
