//! Persisted session storage.
//!
//! Two keyed `localStorage` entries: the opaque bearer token and the
//! JSON-serialized user identity. Requires a browser environment; native
//! builds see an always-empty store.

use crate::net::types::User;

#[cfg(feature = "hydrate")]
const TOKEN_KEY: &str = "alpha_token";
#[cfg(feature = "hydrate")]
const USER_KEY: &str = "alpha_user";

/// Read the persisted session parts, if any. Validation is the caller's
/// job (`SessionState::restore` fails closed on anything partial).
pub fn read_session() -> (Option<String>, Option<String>) {
    #[cfg(feature = "hydrate")]
    {
        let Some(storage) = local_storage() else {
            return (None, None);
        };
        let token = storage.get_item(TOKEN_KEY).ok().flatten();
        let user = storage.get_item(USER_KEY).ok().flatten();
        (token, user)
    }
    #[cfg(not(feature = "hydrate"))]
    {
        (None, None)
    }
}

/// Persist the session. The identity is written before the token; restore
/// treats a token without an identity as corrupt state.
pub fn write_session(token: &str, user: &User) {
    #[cfg(feature = "hydrate")]
    {
        let Ok(user_json) = serde_json::to_string(user) else {
            return;
        };
        if let Some(storage) = local_storage() {
            let _ = storage.set_item(USER_KEY, &user_json);
            let _ = storage.set_item(TOKEN_KEY, token);
        }
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (token, user);
    }
}

/// Remove both session entries. Idempotent; other `localStorage` keys are
/// left alone.
pub fn clear_session() {
    #[cfg(feature = "hydrate")]
    {
        if let Some(storage) = local_storage() {
            let _ = storage.remove_item(TOKEN_KEY);
            let _ = storage.remove_item(USER_KEY);
        }
    }
}

#[cfg(feature = "hydrate")]
fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window().and_then(|w| w.local_storage().ok().flatten())
}
