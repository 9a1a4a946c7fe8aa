//! Telegram Bot API support.
//!
//! Webhook update types, secret-token verification, and webhook/command
//! registration at startup.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::commands::COMMANDS;

const API_BASE: &str = "https://api.telegram.org";

/// Header Telegram uses to echo the webhook secret.
pub const SECRET_HEADER: &str = "x-telegram-bot-api-secret-token";

// ---------------------------------------------------------------------------
// Update types
// ---------------------------------------------------------------------------

/// An incoming webhook update. Only the fields the bot reads are decoded.
#[derive(Debug, Deserialize)]
pub struct Update {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<Message>,
}

#[derive(Debug, Deserialize)]
pub struct Message {
    pub chat: Chat,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Chat {
    pub id: i64,
}

/// A `sendMessage` call returned inline as the webhook response body.
#[derive(Debug, Serialize, PartialEq)]
pub struct SendMessage {
    pub method: &'static str,
    pub chat_id: i64,
    pub text: String,
}

impl SendMessage {
    pub fn new(chat_id: i64, text: String) -> Self {
        Self {
            method: "sendMessage",
            chat_id,
            text,
        }
    }
}

// ---------------------------------------------------------------------------
// Secret verification
// ---------------------------------------------------------------------------

/// Check the secret header against the configured secret.
///
/// With no secret configured every request is accepted.
pub fn verify_secret(expected: Option<&str>, header: Option<&str>) -> bool {
    match expected {
        None => true,
        Some(expected) => header.is_some_and(|got| {
            got.len() == expected.len()
                && got
                    .bytes()
                    .zip(expected.bytes())
                    .fold(0u8, |acc, (a, b)| acc | (a ^ b))
                    == 0
        }),
    }
}

// ---------------------------------------------------------------------------
// Registration
// ---------------------------------------------------------------------------

async fn call(token: &str, method: &str, body: &serde_json::Value) -> Result<serde_json::Value> {
    let url = format!("{API_BASE}/bot{token}/{method}");
    let resp = reqwest::Client::new()
        .post(&url)
        .json(body)
        .send()
        .await
        .with_context(|| format!("Failed to send Telegram {method} request"))?;

    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        anyhow::bail!("Telegram {method} returned {status}: {body}");
    }
    let reply: serde_json::Value = resp
        .json()
        .await
        .with_context(|| format!("Undecodable Telegram {method} response"))?;
    Ok(reply["result"].clone())
}

/// Point Telegram at `url` for updates.
pub async fn register_webhook(token: &str, url: &str, secret: Option<&str>) -> Result<()> {
    let mut body = json!({
        "url": url,
        "allowed_updates": ["message"],
    });
    if let Some(secret) = secret {
        body["secret_token"] = json!(secret);
    }
    call(token, "setWebhook", &body).await.map(drop)
}

/// Publish the command menu.
pub async fn register_commands(token: &str) -> Result<()> {
    call(token, "setMyCommands", &commands_payload()).await.map(drop)
}

/// The bot's own username, from `getMe`.
pub async fn fetch_username(token: &str) -> Result<String> {
    let me = call(token, "getMe", &json!({})).await?;
    username_from(&me).context("getMe response has no username")
}

fn username_from(me: &serde_json::Value) -> Option<String> {
    me["username"].as_str().map(str::to_string)
}

fn commands_payload() -> serde_json::Value {
    let commands: Vec<_> = COMMANDS
        .iter()
        .map(|(command, description)| json!({"command": command, "description": description}))
        .collect();
    json!({ "commands": commands })
}
