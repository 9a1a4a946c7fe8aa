//! Bot configuration loaded from environment variables.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};

/// Path the Telegram webhook is served on.
pub const WEBHOOK_PATH: &str = "/telegram/webhook";

/// Log output format.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown log format: {other}")),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    /// Telegram Bot API token.
    pub bot_token: String,
    /// The bot's @username, without the `@`. Commands addressed to another
    /// bot (`/start@OtherBot`) are ignored once this is known.
    pub bot_username: Option<String>,
    /// Address to bind the HTTP server.
    pub bind_addr: String,
    /// Per-user settings file.
    pub settings_path: PathBuf,
    /// Public base URL (e.g. `https://bot.example.com`). When set, the
    /// webhook and command list are registered with Telegram at startup.
    pub public_url: Option<String>,
    /// Secret Telegram echoes in `X-Telegram-Bot-Api-Secret-Token`.
    pub webhook_secret: Option<String>,
    /// How long a chat may wait between a command and its input.
    pub session_timeout_secs: u64,
    /// Log output format.
    pub log_format: LogFormat,
}

impl Config {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through `get`, which maps a variable name to its value.
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let bot_token = get("TELEGRAM_BOT_TOKEN").context("TELEGRAM_BOT_TOKEN is required")?;

        let bot_username = get("TELEGRAM_BOT_USERNAME")
            .map(|name| name.trim_start_matches('@').to_string())
            .filter(|name| !name.is_empty());

        let bind_addr = get("ALEMBIC_BIND_ADDR").unwrap_or_else(|| "0.0.0.0:8080".to_string());

        let settings_path = get("ALEMBIC_SETTINGS_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(alembic_store::default_settings_path);

        let public_url = get("ALEMBIC_PUBLIC_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty());

        let webhook_secret = get("TELEGRAM_WEBHOOK_SECRET").filter(|s| !s.is_empty());

        let session_timeout_secs = get("ALEMBIC_SESSION_TIMEOUT_SECS")
            .unwrap_or_else(|| "600".to_string())
            .parse::<u64>()
            .ok()
            .filter(|&secs| secs > 0)
            .context("ALEMBIC_SESSION_TIMEOUT_SECS must be a positive integer")?;

        let log_format = match get("ALEMBIC_LOG_FORMAT") {
            Some(value) => value
                .parse::<LogFormat>()
                .map_err(|e| anyhow!("ALEMBIC_LOG_FORMAT: {e}"))?,
            None => LogFormat::default(),
        };

        Ok(Config {
            bot_token,
            bot_username,
            bind_addr,
            settings_path,
            public_url,
            webhook_secret,
            session_timeout_secs,
            log_format,
        })
    }

    pub fn session_timeout(&self) -> Duration {
        Duration::from_secs(self.session_timeout_secs)
    }

    /// Full webhook URL, if a public URL is configured.
    pub fn webhook_url(&self) -> Option<String> {
        self.public_url
            .as_ref()
            .map(|base| format!("{base}{WEBHOOK_PATH}"))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::collections::HashMap;

    pub(crate) fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn token_is_required() {
        let err = Config::from_lookup(lookup(&[])).unwrap_err();
        assert!(err.to_string().contains("TELEGRAM_BOT_TOKEN"));
    }

    #[test]
    fn defaults() {
        let cfg = Config::from_lookup(lookup(&[("TELEGRAM_BOT_TOKEN", "t")])).unwrap();
        assert_eq!(cfg.bot_token, "t");
        assert_eq!(cfg.bind_addr, "0.0.0.0:8080");
        assert_eq!(cfg.session_timeout(), Duration::from_secs(600));
        assert_eq!(cfg.log_format, LogFormat::Text);
        assert_eq!(cfg.bot_username, None);
        assert!(cfg.settings_path.ends_with("alembic/user_data.json"));
        assert_eq!(cfg.webhook_url(), None);
        assert_eq!(cfg.webhook_secret, None);
    }

    #[test]
    fn overrides() {
        let cfg = Config::from_lookup(lookup(&[
            ("TELEGRAM_BOT_TOKEN", "t"),
            ("ALEMBIC_BIND_ADDR", "127.0.0.1:9000"),
            ("ALEMBIC_SETTINGS_PATH", "/tmp/alembic.json"),
            ("ALEMBIC_PUBLIC_URL", "https://bot.example.com/"),
            ("TELEGRAM_WEBHOOK_SECRET", "s3cret"),
            ("ALEMBIC_SESSION_TIMEOUT_SECS", "30"),
            ("ALEMBIC_LOG_FORMAT", "json"),
            ("TELEGRAM_BOT_USERNAME", "@AlembicBot"),
        ]))
        .unwrap();
        assert_eq!(cfg.bind_addr, "127.0.0.1:9000");
        assert_eq!(cfg.settings_path, PathBuf::from("/tmp/alembic.json"));
        assert_eq!(
            cfg.webhook_url().as_deref(),
            Some("https://bot.example.com/telegram/webhook")
        );
        assert_eq!(cfg.webhook_secret.as_deref(), Some("s3cret"));
        assert_eq!(cfg.session_timeout_secs, 30);
        assert_eq!(cfg.log_format, LogFormat::Json);
        assert_eq!(cfg.bot_username.as_deref(), Some("AlembicBot"));
    }

    #[test]
    fn bad_timeout_is_an_error() {
        for value in ["soon", "0", "-5"] {
            let err = Config::from_lookup(lookup(&[
                ("TELEGRAM_BOT_TOKEN", "t"),
                ("ALEMBIC_SESSION_TIMEOUT_SECS", value),
            ]))
            .unwrap_err();
            assert!(err.to_string().contains("ALEMBIC_SESSION_TIMEOUT_SECS"), "{value}");
        }
    }

    #[test]
    fn bad_log_format_is_an_error() {
        let err = Config::from_lookup(lookup(&[
            ("TELEGRAM_BOT_TOKEN", "t"),
            ("ALEMBIC_LOG_FORMAT", "xml"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("ALEMBIC_LOG_FORMAT"));
    }
}
