//! Wire types shared by the REST client and the push socket.
//!
//! IDENTIFIERS
//! ===========
//! The server is loose about identifier representation: REST payloads carry
//! string ids while push payloads have been observed with numeric ones.
//! Every identifier is canonicalized to its string form at the
//! deserialization boundary, so the rest of the crate compares ids with
//! plain string equality.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::{Deserialize, Deserializer, Serialize};

/// An authenticated user identity, returned by the credential exchange and
/// persisted alongside the session token.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub email: String,
}

/// A chat list row. `interlocutor_id` is present for private chats and
/// drives presence updates; `last_message` is the preview text shown in
/// the list.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Chat {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub interlocutor_id: Option<String>,
    #[serde(default)]
    pub last_message: Option<String>,
    #[serde(default)]
    pub is_online: bool,
}

/// A single message. Immutable once created; the open conversation holds
/// these in arrival order.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Message {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(deserialize_with = "string_or_number")]
    pub chat_id: String,
    #[serde(deserialize_with = "string_or_number")]
    pub sender_id: String,
    pub content: String,
    #[serde(default)]
    pub created_at: String,
}

/// Payload of the credential exchange endpoints.
#[derive(Clone, Debug, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    #[serde(default)]
    pub user: Option<User>,
}

/// Push payload announcing a user's online status change.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct PresenceUpdate {
    #[serde(deserialize_with = "string_or_number")]
    pub user_id: String,
    pub online: bool,
}

/// The `{ type, content }` wrapper around every inbound push frame.
#[derive(Clone, Debug, Deserialize)]
pub struct Envelope {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub content: serde_json::Value,
}

/// Canonical string form of an id value: strings pass through, numbers are
/// formatted. Empty strings and other shapes are rejected.
pub fn canonical_id(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) if !s.is_empty() => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    canonical_id(&value).ok_or_else(|| serde::de::Error::custom("expected a string or number id"))
}

fn opt_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(canonical_id))
}
