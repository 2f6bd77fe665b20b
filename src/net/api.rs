//! REST helpers for the chat API.
//!
//! Client-side (hydrate): real HTTP calls via `gloo-net`, with the session
//! bearer token attached when one is held. Native builds (unit tests) get
//! stubs failing with [`ApiError::Unavailable`].
//!
//! ERROR HANDLING
//! ==============
//! An unauthorized response tears the session down through a single path
//! here, so callers never re-implement logout. Everything else surfaces as
//! a typed error and is never retried; retry policy belongs to callers.

#![allow(clippy::unused_async)]

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use serde::Serialize;
use thiserror::Error;

use crate::context::ClientContext;
use crate::net::types::{AuthResponse, Chat, Message, User};

/// Failures surfaced by the REST layer.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ApiError {
    /// The credential exchange was rejected, or its response was unusable.
    #[error("{0}")]
    Auth(String),
    /// The server rejected the bearer token; the session has already been
    /// torn down when this surfaces.
    #[error("unauthorized")]
    Unauthorized,
    /// Non-success status, carrying the server-provided message when
    /// available.
    #[error("{0}")]
    Request(String),
    /// The request never produced a response.
    #[error("request failed: {0}")]
    Transport(String),
    /// REST calls are only available in the browser build.
    #[error("not available outside the browser")]
    Unavailable,
}

/// Which credential exchange to perform.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthKind {
    Login,
    Register,
}

impl AuthKind {
    /// API path for this exchange.
    pub fn path(self) -> &'static str {
        match self {
            Self::Login => "/api/login",
            Self::Register => "/api/register",
        }
    }
}

/// Form credentials for login or registration. `username` is only sent
/// when registering.
#[derive(Clone, Debug, Serialize)]
pub struct Credentials {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    pub email: String,
    pub password: String,
}

/// The user-facing message carried by an error response body.
pub fn server_message(body: &serde_json::Value) -> String {
    body.get("error")
        .and_then(|v| v.as_str())
        .unwrap_or("request failed")
        .to_owned()
}

#[cfg(feature = "hydrate")]
fn decode<T: serde::de::DeserializeOwned>(body: serde_json::Value) -> Result<T, ApiError> {
    serde_json::from_value(body).map_err(|e| ApiError::Request(format!("unexpected response: {e}")))
}

/// Send an authenticated request and parse the response body as JSON.
/// The single 401 handling path lives here: the session is torn down
/// before the error surfaces.
#[cfg(feature = "hydrate")]
async fn execute(
    ctx: &ClientContext,
    req: gloo_net::http::RequestBuilder,
    body: Option<serde_json::Value>,
) -> Result<serde_json::Value, ApiError> {
    use leptos::prelude::GetUntracked;

    let req = match ctx.session.get_untracked().token {
        Some(token) => req.header("Authorization", &format!("Bearer {token}")),
        None => req,
    };
    let req = match body {
        Some(body) => req.json(&body),
        None => req.build(),
    }
    .map_err(|e| ApiError::Transport(e.to_string()))?;

    let resp = req
        .send()
        .await
        .map_err(|e| ApiError::Transport(e.to_string()))?;
    let status = resp.status();
    let body = resp
        .json::<serde_json::Value>()
        .await
        .unwrap_or(serde_json::Value::Null);

    if status == 401 {
        ctx.teardown();
        return Err(ApiError::Unauthorized);
    }
    if !(200..300).contains(&status) {
        return Err(ApiError::Request(server_message(&body)));
    }
    Ok(body)
}

/// Exchange credentials for a token and identity.
///
/// Does not route through the 401 teardown path: a rejected login is a
/// bad-credentials error for the form, not a forced logout.
///
/// # Errors
///
/// `ApiError::Auth` with the server message on rejection, `Transport` when
/// the request never completes.
pub async fn authenticate(kind: AuthKind, credentials: &Credentials) -> Result<AuthResponse, ApiError> {
    #[cfg(feature = "hydrate")]
    {
        let req = gloo_net::http::Request::post(kind.path())
            .json(credentials)
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        let resp = req
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        let status = resp.status();
        let body = resp
            .json::<serde_json::Value>()
            .await
            .unwrap_or(serde_json::Value::Null);
        if !(200..300).contains(&status) {
            return Err(ApiError::Auth(server_message(&body)));
        }
        decode(body)
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (kind, credentials);
        Err(ApiError::Unavailable)
    }
}

/// Fetch the chat list snapshot.
///
/// # Errors
///
/// Any [`ApiError`] from the request or a malformed body.
pub async fn fetch_chats(ctx: &ClientContext) -> Result<Vec<Chat>, ApiError> {
    #[cfg(feature = "hydrate")]
    {
        let body = execute(ctx, gloo_net::http::Request::get("/api/chats"), None).await?;
        decode(body)
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = ctx;
        Err(ApiError::Unavailable)
    }
}

/// Fetch the message history snapshot for one chat.
///
/// # Errors
///
/// Any [`ApiError`] from the request or a malformed body.
pub async fn fetch_messages(ctx: &ClientContext, chat_id: &str) -> Result<Vec<Message>, ApiError> {
    #[cfg(feature = "hydrate")]
    {
        let path = format!("/api/chats/{chat_id}/messages");
        let body = execute(ctx, gloo_net::http::Request::get(&path), None).await?;
        decode(body)
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (ctx, chat_id);
        Err(ApiError::Unavailable)
    }
}

/// Search users by username or email fragment.
///
/// # Errors
///
/// Any [`ApiError`] from the request or a malformed body.
pub async fn search_users(ctx: &ClientContext, query: &str) -> Result<Vec<User>, ApiError> {
    #[cfg(feature = "hydrate")]
    {
        let encoded = String::from(js_sys::encode_uri_component(query));
        let path = format!("/api/users/search?q={encoded}");
        let body = execute(ctx, gloo_net::http::Request::get(&path), None).await?;
        decode(body)
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (ctx, query);
        Err(ApiError::Unavailable)
    }
}

/// Create (or reopen) a private chat with another user.
///
/// # Errors
///
/// Any [`ApiError`] from the request or a malformed body.
pub async fn create_private_chat(ctx: &ClientContext, user_id: &str) -> Result<Chat, ApiError> {
    #[cfg(feature = "hydrate")]
    {
        let body = execute(
            ctx,
            gloo_net::http::Request::post("/api/chats/private"),
            Some(serde_json::json!({ "user_id": user_id })),
        )
        .await?;
        decode(body)
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (ctx, user_id);
        Err(ApiError::Unavailable)
    }
}

/// Submit a message. The response body carries no message; the created
/// message arrives on the push socket.
///
/// # Errors
///
/// Any [`ApiError`] from the request.
pub async fn send_message(ctx: &ClientContext, chat_id: &str, content: &str) -> Result<(), ApiError> {
    #[cfg(feature = "hydrate")]
    {
        execute(
            ctx,
            gloo_net::http::Request::post("/api/messages"),
            Some(serde_json::json!({ "chat_id": chat_id, "content": content })),
        )
        .await?;
        Ok(())
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (ctx, chat_id, content);
        Err(ApiError::Unavailable)
    }
}
