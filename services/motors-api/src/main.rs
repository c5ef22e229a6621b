//! M-Motors credential & session API
//!
//! Single-binary axum service that:
//! 1. Loads TOML config (JWT secret from env or secret file)
//! 2. Opens the file-backed session store
//! 3. Serves registration, login, refresh, and the authenticated endpoints
//! 4. Sweeps expired refresh tokens in the background

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use motors_api::config::Config;
use motors_api::routes::{AppState, build_router};
use motors_session::{SessionConfig, SessionManager, spawn_purge_task};
use motors_store::{FileStore, SessionStore};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing with JSON output and LOG_LEVEL / RUST_LOG support
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_env("LOG_LEVEL")
                .or_else(|_| EnvFilter::try_from_default_env())
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    info!("starting m-motors-api");

    // CLI: simple flag parsing
    let args: Vec<String> = std::env::args().collect();
    let cli_config_path = args
        .iter()
        .position(|a| a == "--config")
        .and_then(|i| args.get(i + 1))
        .map(|s| s.as_str());
    let seed_admin = args.iter().any(|a| a == "--seed-admin");

    let config_path = Config::resolve_path(cli_config_path);
    info!(path = %config_path.display(), "loading configuration");

    let mut config = Config::load(&config_path)
        .with_context(|| format!("failed to load config from {}", config_path.display()))?;

    info!(
        listen_addr = %config.server.listen_addr,
        store_path = %config.store.path.display(),
        "configuration loaded"
    );

    let store = FileStore::load(config.store.path.clone())
        .await
        .context("failed to open session store")?;
    let store: Arc<dyn SessionStore> = Arc::new(store);

    let jwt_secret = config
        .auth
        .jwt_secret
        .take()
        .context("JWT secret missing after config load")?;

    let sessions = Arc::new(SessionManager::new(
        store.clone(),
        SessionConfig {
            jwt_secret,
            access_token_ttl_secs: config.auth.access_token_ttl_secs,
            refresh_token_ttl_days: config.auth.refresh_token_ttl_days,
            bcrypt_cost: config.auth.bcrypt_cost,
        },
    ));

    // One-shot mode: create the admin account and exit
    if seed_admin {
        let email = std::env::var("ADMIN_EMAIL").context("ADMIN_EMAIL not set")?;
        let password = std::env::var("ADMIN_PASSWORD").context("ADMIN_PASSWORD not set")?;
        match sessions.seed_admin(&email, &password).await? {
            Some(user) => info!(user_id = user.id, "admin user seeded"),
            None => info!("admin user already exists, nothing to do"),
        }
        return Ok(());
    }

    let _purge_task = spawn_purge_task(
        store,
        Duration::from_secs(config.auth.purge_interval_secs),
    );

    let state = AppState::new(sessions, &config);
    let app = build_router(state, config.server.max_connections);

    let listener = TcpListener::bind(config.server.listen_addr)
        .await
        .with_context(|| format!("failed to bind to {}", config.server.listen_addr))?;

    info!(addr = %config.server.listen_addr, "accepting requests");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("shutdown complete");
    Ok(())
}

/// Wait for SIGTERM or SIGINT for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("received SIGINT, shutting down"),
        _ = terminate => info!("received SIGTERM, shutting down"),
    }
}
