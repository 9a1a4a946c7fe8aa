//! Axum router and HTTP handlers.

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use tower_http::cors::{Any, CorsLayer};
use tracing::{debug, warn};

use alembic_core::fractions::{calculate_fractions, validate_batch};
use alembic_core::settings::{SettingsStore, UserId};
use alembic_core::speed::SpeedModel;
use alembic_core::strength::distillate_strength;

use crate::commands;
use crate::config::WEBHOOK_PATH;
use crate::telegram::{self, SendMessage, Update};
use crate::AppState;

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route(WEBHOOK_PATH, post(telegram_webhook))
        .route("/api/strength", post(api_strength))
        .route("/api/fractions", post(api_fractions))
        .route("/api/speed", post(api_speed))
        .route("/api/constants/:user", get(api_constants))
        .route("/api/status", get(api_status))
        .with_state(state)
        .layer(cors)
}

fn bad_request(error: impl ToString) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({"error": error.to_string()})),
    )
        .into_response()
}

// ---------------------------------------------------------------------------
// Telegram
// ---------------------------------------------------------------------------

/// `POST /telegram/webhook`: one update in, an inline `sendMessage` out.
async fn telegram_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let secret = headers
        .get(telegram::SECRET_HEADER)
        .and_then(|v| v.to_str().ok());
    if !telegram::verify_secret(state.config.webhook_secret.as_deref(), secret) {
        warn!("Rejected webhook call with a bad secret token");
        return (StatusCode::UNAUTHORIZED, Json(json!({"error": "Invalid secret token"})))
            .into_response();
    }

    let update: Update = match serde_json::from_slice(&body) {
        Ok(update) => update,
        Err(e) => {
            warn!(error = %e, "Undecodable webhook update");
            return bad_request("Invalid update");
        }
    };

    // Only text messages get a reply; everything else is acknowledged.
    let Some((chat_id, text)) = update
        .message
        .and_then(|m| m.text.map(|text| (m.chat.id, text)))
    else {
        debug!(update_id = update.update_id, "Ignoring non-text update");
        return StatusCode::OK.into_response();
    };

    if commands::addressed_elsewhere(&text, state.config.bot_username.as_deref()) {
        debug!(update_id = update.update_id, "Ignoring command for another bot");
        return StatusCode::OK.into_response();
    }

    let reply = {
        let mut sessions = state.sessions.lock().await;
        commands::respond(&mut sessions, state.store.as_ref(), UserId(chat_id), &text)
    };

    Json(SendMessage::new(chat_id, reply)).into_response()
}

// ---------------------------------------------------------------------------
// JSON API
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct StrengthRequest {
    cube_temp: f64,
    vapor_temp: f64,
    distillate_temp: f64,
}

/// `POST /api/strength`: distillate strength normalised to 20 °C.
async fn api_strength(Json(req): Json<StrengthRequest>) -> Response {
    match distillate_strength(req.cube_temp, req.vapor_temp, req.distillate_temp) {
        Ok(reading) => Json(reading).into_response(),
        Err(e) => bad_request(e),
    }
}

#[derive(Deserialize)]
struct FractionsRequest {
    volume: f64,
    strength: f64,
    /// Use this user's saved constants instead of the defaults.
    #[serde(default)]
    user: Option<i64>,
}

/// `POST /api/fractions`: cut volumes for a batch.
async fn api_fractions(
    State(state): State<AppState>,
    Json(req): Json<FractionsRequest>,
) -> Response {
    if let Err(e) = validate_batch(req.volume, req.strength) {
        return bad_request(e);
    }
    let constants = match req.user {
        Some(user) => state.store.resolve(UserId(user)),
        None => Default::default(),
    };
    Json(calculate_fractions(req.volume, req.strength, &constants)).into_response()
}

#[derive(Deserialize)]
struct SpeedRequest {
    /// Raw spirit charge (banded) or batch volume (flat), liters.
    volume: f64,
    #[serde(default)]
    cube_volume: Option<f64>,
    #[serde(default)]
    user: Option<i64>,
    #[serde(default)]
    model: SpeedModel,
}

/// `POST /api/speed`: recommended collection rates.
///
/// The cube volume comes from the request, else the user's constants,
/// else the defaults.
async fn api_speed(State(state): State<AppState>, Json(req): Json<SpeedRequest>) -> Response {
    let cube_volume = req.cube_volume.unwrap_or_else(|| match req.user {
        Some(user) => state.store.resolve(UserId(user)).cube_volume,
        None => alembic_core::get_default_constants().cube_volume,
    });

    match req.model.rates(cube_volume, req.volume) {
        Ok((min_rate, max_rate)) => Json(json!({
            "model": req.model,
            "cube_volume": cube_volume,
            "min_rate": min_rate,
            "max_rate": max_rate,
        }))
        .into_response(),
        Err(e) => bad_request(e),
    }
}

/// `GET /api/constants/:user`: a user's constants, or the defaults.
async fn api_constants(State(state): State<AppState>, Path(user): Path<i64>) -> Response {
    let user = UserId(user);
    let saved = state.store.load(user);
    Json(json!({
        "user": user,
        "saved": saved.is_some(),
        "constants": saved.unwrap_or_default(),
    }))
    .into_response()
}

/// `GET /api/status`: liveness and session count.
async fn api_status(State(state): State<AppState>) -> Response {
    let pending_sessions = state.sessions.lock().await.len();
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "pending_sessions": pending_sessions,
        "webhook_registered": state.config.public_url.is_some(),
    }))
    .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use alembic_core::settings::UserConstants;
    use alembic_store::MemoryStore;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tokio::sync::Mutex;
    use tower::ServiceExt;

    use crate::config::tests::lookup;
    use crate::config::Config;
    use crate::session::Sessions;

    fn state_with(vars: &[(&str, &str)]) -> (AppState, Arc<MemoryStore>) {
        let mut all = vec![("TELEGRAM_BOT_TOKEN", "t")];
        all.extend_from_slice(vars);
        let config = Config::from_lookup(lookup(&all)).unwrap();
        let store = Arc::new(MemoryStore::new());
        let state = AppState {
            store: store.clone() as Arc<dyn SettingsStore>,
            sessions: Arc::new(Mutex::new(Sessions::new(config.session_timeout()))),
            config: Arc::new(config),
        };
        (state, store)
    }

    async fn send(
        state: AppState,
        method: &str,
        uri: &str,
        headers: &[(&str, &str)],
        body: serde_json::Value,
    ) -> (StatusCode, serde_json::Value) {
        let mut req = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json");
        for (name, value) in headers {
            req = req.header(*name, *value);
        }
        let body = if body.is_null() {
            Body::empty()
        } else {
            Body::from(body.to_string())
        };
        let resp = router(state).oneshot(req.body(body).unwrap()).await.unwrap();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    fn text_update(chat: i64, text: &str) -> serde_json::Value {
        json!({
            "update_id": 1,
            "message": {"message_id": 1, "date": 0, "chat": {"id": chat, "type": "private"}, "text": text}
        })
    }

    #[tokio::test]
    async fn webhook_conversation() {
        let (state, _) = state_with(&[]);

        let (status, body) =
            send(state.clone(), "POST", WEBHOOK_PATH, &[], text_update(9, "/strength")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["method"], "sendMessage");
        assert_eq!(body["chat_id"], 9);

        let (_, body) =
            send(state, "POST", WEBHOOK_PATH, &[], text_update(9, "84.8 82.2 15")).await;
        assert_eq!(body["text"], "Strength at 20 °C: 82.33%");
    }

    #[tokio::test]
    async fn webhook_checks_secret() {
        let (state, _) = state_with(&[("TELEGRAM_WEBHOOK_SECRET", "s3cret")]);

        let (status, _) =
            send(state.clone(), "POST", WEBHOOK_PATH, &[], text_update(1, "/start")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = send(
            state.clone(),
            "POST",
            WEBHOOK_PATH,
            &[(telegram::SECRET_HEADER, "wrong")],
            text_update(1, "/start"),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, body) = send(
            state,
            "POST",
            WEBHOOK_PATH,
            &[(telegram::SECRET_HEADER, "s3cret")],
            text_update(1, "/start"),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["text"].as_str().unwrap().contains("/fractions"));
    }

    #[tokio::test]
    async fn webhook_ignores_commands_for_other_bots() {
        let (state, _) = state_with(&[("TELEGRAM_BOT_USERNAME", "AlembicBot")]);

        let (status, body) = send(
            state.clone(),
            "POST",
            WEBHOOK_PATH,
            &[],
            text_update(-100, "/fractions@OtherBot"),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.is_null());
        assert_eq!(state.sessions.lock().await.len(), 0);

        let (_, body) = send(
            state,
            "POST",
            WEBHOOK_PATH,
            &[],
            text_update(-100, "/fractions@AlembicBot"),
        )
        .await;
        assert!(body["text"].as_str().unwrap().contains("47 29"));
    }

    #[tokio::test]
    async fn webhook_acknowledges_non_text() {
        let (state, _) = state_with(&[]);
        let (status, body) = send(
            state,
            "POST",
            WEBHOOK_PATH,
            &[],
            json!({"update_id": 2, "message": {"message_id": 1, "date": 0, "chat": {"id": 3, "type": "private"}}}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.is_null());
    }

    #[tokio::test]
    async fn strength_endpoint() {
        let (state, _) = state_with(&[]);
        let (status, body) = send(
            state.clone(),
            "POST",
            "/api/strength",
            &[],
            json!({"cube_temp": 84.8, "vapor_temp": 82.2, "distillate_temp": 15}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!((body["corrected_pct"].as_f64().unwrap() - 82.328).abs() < 1e-9);

        let (status, body) = send(
            state,
            "POST",
            "/api/strength",
            &[],
            json!({"cube_temp": 70, "vapor_temp": 82.2, "distillate_temp": 15}),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("cube temperature"));
    }

    #[tokio::test]
    async fn fractions_endpoint_uses_user_constants() {
        let (state, store) = state_with(&[]);
        let (status, body) = send(
            state.clone(),
            "POST",
            "/api/fractions",
            &[],
            json!({"volume": 47, "strength": 29}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!((body["heads_by_volume"].as_f64().unwrap() - 2.35).abs() < 1e-9);

        let custom = UserConstants::from_values([50.0, 10.0, 18.0, 2.0, 10.0, 81.5]).unwrap();
        store.save(UserId(4), custom).unwrap();
        let (_, body) = send(
            state.clone(),
            "POST",
            "/api/fractions",
            &[],
            json!({"volume": 47, "strength": 29, "user": 4}),
        )
        .await;
        assert!((body["heads_by_volume"].as_f64().unwrap() - 4.7).abs() < 1e-9);

        let (status, _) = send(
            state,
            "POST",
            "/api/fractions",
            &[],
            json!({"volume": 0, "strength": 29}),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn speed_endpoint() {
        let (state, _) = state_with(&[]);
        let (status, body) =
            send(state.clone(), "POST", "/api/speed", &[], json!({"volume": 47})).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["model"], "banded");
        assert!((body["min_rate"].as_f64().unwrap() - 1.645).abs() < 1e-9);
        assert!((body["max_rate"].as_f64().unwrap() - 3.29).abs() < 1e-9);

        let (_, body) = send(
            state.clone(),
            "POST",
            "/api/speed",
            &[],
            json!({"volume": 100, "model": "flat"}),
        )
        .await;
        assert!((body["min_rate"].as_f64().unwrap() - 3.8).abs() < 1e-9);

        let (status, body) = send(
            state,
            "POST",
            "/api/speed",
            &[],
            json!({"volume": 47, "cube_volume": 150}),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("cube volume"));
    }

    #[tokio::test]
    async fn constants_endpoint() {
        let (state, store) = state_with(&[]);
        let (status, body) =
            send(state.clone(), "GET", "/api/constants/12", &[], serde_json::Value::Null).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["saved"], false);
        assert_eq!(body["constants"]["cube_volume"], 50.0);

        store
            .save(UserId(12), UserConstants::from_values([30.0, 5.0, 18.0, 2.0, 10.0, 80.0]).unwrap())
            .unwrap();
        let (_, body) =
            send(state, "GET", "/api/constants/12", &[], serde_json::Value::Null).await;
        assert_eq!(body["saved"], true);
        assert_eq!(body["user"], 12);
        assert_eq!(body["constants"]["cube_volume"], 30.0);
    }

    #[tokio::test]
    async fn status_endpoint() {
        let (state, _) = state_with(&[]);
        state.sessions.lock().await.begin(UserId(1), crate::session::Pending::Speed);
        let (status, body) =
            send(state, "GET", "/api/status", &[], serde_json::Value::Null).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["pending_sessions"], 1);
    }
}
