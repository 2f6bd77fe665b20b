#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use crate::net::types::User;

/// The authenticated session: bearer token plus the identity it belongs to.
///
/// Invariant: a present token always pairs with a present user whose id is
/// non-empty. `restore` enforces this when rebuilding from persisted parts;
/// everything else only ever installs both halves together.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionState {
    pub token: Option<String>,
    pub user: Option<User>,
}

impl SessionState {
    /// A freshly authenticated session.
    pub fn authenticated(token: String, user: User) -> Self {
        Self { token: Some(token), user: Some(user) }
    }

    /// Rebuild a session from the persisted token and user JSON.
    ///
    /// Fails closed: a missing or empty token, a missing identity entry,
    /// malformed JSON, or an identity without a usable id all yield `None`,
    /// directing the caller to clear storage and re-authenticate.
    pub fn restore(token: Option<String>, user_json: Option<String>) -> Option<Self> {
        let token = token?;
        if token.is_empty() {
            return None;
        }
        let user: User = serde_json::from_str(&user_json?).ok()?;
        Some(Self { token: Some(token), user: Some(user) })
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some() && self.user.is_some()
    }

    /// Forget the credential and identity. Idempotent.
    pub fn clear(&mut self) {
        self.token = None;
        self.user = None;
    }
}
