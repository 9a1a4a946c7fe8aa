//! alembic-bot: Telegram distillation calculator with a JSON API.
//!
//! Receives Telegram updates on `/telegram/webhook` and answers each one
//! inline. The same calculations are exposed under `/api/*`. Per-user
//! constants persist in a JSON settings file.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

mod commands;
mod config;
mod input;
mod routes;
mod session;
mod telegram;

use alembic_core::settings::SettingsStore;
use alembic_store::JsonFileStore;
use config::{Config, LogFormat};
use session::Sessions;

/// How often timed-out chat sessions are swept.
const SESSION_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Shared application state passed to every Axum handler.
#[derive(Clone)]
pub struct AppState {
    /// Per-user constants.
    pub store: Arc<dyn SettingsStore>,
    /// Chats waiting for numeric input.
    pub sessions: Arc<Mutex<Sessions>>,
    /// Bot configuration.
    pub config: Arc<Config>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let mut config = Config::from_env().context("Failed to load bot configuration")?;
    init_logging(config.log_format);

    info!(
        bind = %config.bind_addr,
        settings = %config.settings_path.display(),
        session_timeout_secs = config.session_timeout_secs,
        webhook = config.webhook_url().as_deref().unwrap_or("<not registered>"),
        "Starting alembic-bot"
    );

    let store = JsonFileStore::open(&config.settings_path);
    info!(path = %store.path().display(), "Settings loaded ({} user(s))", store.len());

    // Register the webhook and command menu if we know our public URL.
    if let Some(url) = config.webhook_url() {
        if config.bot_username.is_none() {
            match telegram::fetch_username(&config.bot_token).await {
                Ok(name) => {
                    info!(username = %name, "Bot identity resolved");
                    config.bot_username = Some(name);
                }
                Err(e) => warn!("Failed to fetch bot username: {e}"),
            }
        }
        match telegram::register_webhook(&config.bot_token, &url, config.webhook_secret.as_deref())
            .await
        {
            Ok(()) => info!(%url, "Telegram webhook registered"),
            Err(e) => warn!("Failed to register Telegram webhook: {e}"),
        }
        match telegram::register_commands(&config.bot_token).await {
            Ok(()) => info!("Telegram command menu registered"),
            Err(e) => warn!("Failed to register Telegram commands: {e}"),
        }
    }

    let state = AppState {
        store: Arc::new(store),
        sessions: Arc::new(Mutex::new(Sessions::new(config.session_timeout()))),
        config: Arc::new(config.clone()),
    };

    let sessions = state.sessions.clone();
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(SESSION_SWEEP_INTERVAL);
        loop {
            ticker.tick().await;
            let expired = sessions.lock().await.prune();
            if expired > 0 {
                debug!(expired, "Pruned timed-out sessions");
            }
        }
    });

    let app = routes::router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", config.bind_addr))?;

    info!("Listening on http://{}", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    info!("alembic-bot shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Received Ctrl+C, shutting down..."),
        Err(e) => warn!("Failed to listen for Ctrl+C: {e}"),
    }
}

/// Install the global subscriber. `RUST_LOG` overrides the `info` default.
fn init_logging(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Text => builder.init(),
    }
}
