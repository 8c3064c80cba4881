//! REST client for the dialogue backend.
//!
//! DESIGN
//! ======
//! [`GameApi`] is the seam between the session controller and the network:
//! one method per backend endpoint, each returning a typed body. The
//! production [`HttpGameApi`] uses `reqwest` with a cookie store, because
//! the backend keeps the game in a cookie-backed session.
//!
//! ERROR HANDLING
//! ==============
//! Transport failures, non-2xx statuses and bodies that do not decode into
//! the expected shape all surface as [`ApiError`]. Callers decide how to
//! present them; nothing here retries.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use std::time::Duration;

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

use super::types::{
    ArgumentOption, ArgumentRequest, ChatReply, ChatRequest, ConversationOpened, GameStatus, StartGame, TurnReply,
};
use crate::config::ClientConfig;

// =============================================================================
// ERROR
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request never produced a response (connect, timeout, TLS, ...).
    #[error("request failed: {0}")]
    Transport(String),

    /// The backend answered with a non-success status.
    #[error("server returned HTTP {status}: {message}")]
    Server { status: u16, message: String },

    /// The body did not match the expected shape.
    #[error("malformed response: {0}")]
    Malformed(String),

    /// The body decoded but the backend reported failure.
    #[error("backend rejected request: {0}")]
    Rejected(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        Self::Transport(e.to_string())
    }
}

// =============================================================================
// TRAIT
// =============================================================================

/// One async method per backend endpoint.
#[async_trait::async_trait]
pub trait GameApi: Send + Sync {
    /// `POST /api/start_game`
    async fn start_game(&self) -> Result<StartGame, ApiError>;

    /// `POST /api/start_conversation/{npc_id}`
    async fn start_conversation(&self, npc_id: &str) -> Result<ConversationOpened, ApiError>;

    /// `POST /api/ask_giovanni/{npc_id}`
    async fn ask_giovanni(&self, npc_id: &str) -> Result<TurnReply, ApiError>;

    /// `POST /api/ask_ai_opinion/{npc_id}`
    async fn ask_ai_opinion(&self, npc_id: &str) -> Result<TurnReply, ApiError>;

    /// `POST /api/make_argument/{npc_id}` with `{argument}`
    async fn make_argument(&self, npc_id: &str, argument: &str) -> Result<TurnReply, ApiError>;

    /// `POST /api/chat/{npc_id}` with `{message}`
    async fn chat(&self, npc_id: &str, message: &str) -> Result<ChatReply, ApiError>;

    /// `GET /api/random_arguments`
    async fn random_arguments(&self) -> Result<Vec<ArgumentOption>, ApiError>;

    /// `GET /api/game_status`
    async fn game_status(&self) -> Result<GameStatus, ApiError>;
}

// =============================================================================
// HTTP IMPLEMENTATION
// =============================================================================

pub struct HttpGameApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpGameApi {
    /// Build an HTTP client for the configured backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying `reqwest` client fails to build.
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(Duration::from_secs(config.timeouts.request_secs))
            .connect_timeout(Duration::from_secs(config.timeouts.connect_secs))
            .build()?;
        Ok(Self { client, base_url: config.base_url.trim_end_matches('/').to_owned() })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<T, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        let request = self.client.request(method, &url);
        let request = if let Some(json) = body { request.json(&json) } else { request };

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let message = error_message(&text);
            warn!(%path, status = status.as_u16(), %message, "api: request failed");
            return Err(ApiError::Server { status: status.as_u16(), message });
        }

        serde_json::from_str::<T>(&text).map_err(|e| ApiError::Malformed(format!("{path}: {e}")))
    }
}

/// Pull the backend's `{error}` text out of a failure body, falling back to
/// the raw body.
fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("error").and_then(Value::as_str).map(ToOwned::to_owned))
        .unwrap_or_else(|| body.trim().to_owned())
}

fn to_body<T: serde::Serialize>(value: &T) -> Result<Value, ApiError> {
    serde_json::to_value(value).map_err(|e| ApiError::Malformed(e.to_string()))
}

#[async_trait::async_trait]
impl GameApi for HttpGameApi {
    async fn start_game(&self) -> Result<StartGame, ApiError> {
        let started: StartGame = self.request(Method::POST, "/api/start_game", None).await?;
        if !started.success {
            return Err(ApiError::Rejected("start_game reported success=false".to_owned()));
        }
        Ok(started)
    }

    async fn start_conversation(&self, npc_id: &str) -> Result<ConversationOpened, ApiError> {
        let path = format!("/api/start_conversation/{npc_id}");
        self.request(Method::POST, &path, None).await
    }

    async fn ask_giovanni(&self, npc_id: &str) -> Result<TurnReply, ApiError> {
        let path = format!("/api/ask_giovanni/{npc_id}");
        self.request(Method::POST, &path, None).await
    }

    async fn ask_ai_opinion(&self, npc_id: &str) -> Result<TurnReply, ApiError> {
        let path = format!("/api/ask_ai_opinion/{npc_id}");
        self.request(Method::POST, &path, None).await
    }

    async fn make_argument(&self, npc_id: &str, argument: &str) -> Result<TurnReply, ApiError> {
        let path = format!("/api/make_argument/{npc_id}");
        let body = to_body(&ArgumentRequest { argument })?;
        self.request(Method::POST, &path, Some(body)).await
    }

    async fn chat(&self, npc_id: &str, message: &str) -> Result<ChatReply, ApiError> {
        let path = format!("/api/chat/{npc_id}");
        let body = to_body(&ChatRequest { message })?;
        self.request(Method::POST, &path, Some(body)).await
    }

    async fn random_arguments(&self) -> Result<Vec<ArgumentOption>, ApiError> {
        self.request(Method::GET, "/api/random_arguments", None).await
    }

    async fn game_status(&self) -> Result<GameStatus, ApiError> {
        self.request(Method::GET, "/api/game_status", None).await
    }
}
