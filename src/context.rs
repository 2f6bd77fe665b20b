//! One client instance's shared state and the operations over it.
//!
//! DESIGN
//! ======
//! The client is an explicit context object: a bundle of signal handles
//! created once at startup and passed by reference to the REST layer and
//! the push socket. Components subscribe to the signals; the operations
//! here are the only writers. There is no ambient global instance.

#[cfg(test)]
#[path = "context_test.rs"]
mod context_test;

use leptos::prelude::{GetUntracked, RwSignal, Set, Update};

use crate::net::api::{self, ApiError, AuthKind, Credentials};
use crate::net::socket::SocketHandle;
use crate::net::types::{Chat, User};
use crate::state::chat::ChatState;
use crate::state::connection::ConnectionState;
use crate::state::notices::{NoticeLevel, NoticeState};
use crate::state::session::SessionState;
use crate::util::storage;

/// Shared handles to every piece of client state. Cheap to copy; all
/// copies address the same state.
#[derive(Clone, Copy)]
pub struct ClientContext {
    pub session: RwSignal<SessionState>,
    pub chat: RwSignal<ChatState>,
    pub connection: RwSignal<ConnectionState>,
    pub notices: RwSignal<NoticeState>,
    pub socket: RwSignal<SocketHandle>,
}

impl Default for ClientContext {
    fn default() -> Self {
        Self::new()
    }
}

impl ClientContext {
    pub fn new() -> Self {
        Self {
            session: RwSignal::new(SessionState::default()),
            chat: RwSignal::new(ChatState::default()),
            connection: RwSignal::new(ConnectionState::default()),
            notices: RwSignal::new(NoticeState::default()),
            socket: RwSignal::new(SocketHandle::default()),
        }
    }

    /// Boot the client: restore a persisted session when one is present
    /// and intact, then open the push connection. Returns whether the
    /// client came up authenticated.
    pub fn start(&self) -> bool {
        let restored = self.restore_session();
        if restored {
            self.connect();
        }
        restored
    }

    /// Restore a persisted session. Fails closed: a token paired with a
    /// missing or malformed identity clears all persisted session data and
    /// leaves the client logged out.
    pub fn restore_session(&self) -> bool {
        let (token, user_json) = storage::read_session();
        match SessionState::restore(token, user_json) {
            Some(session) => {
                self.session.set(session);
                true
            }
            None => {
                storage::clear_session();
                self.session.set(SessionState::default());
                false
            }
        }
    }

    /// Log in or register, persist the session, and open the push
    /// connection. On failure the session is left untouched.
    ///
    /// # Errors
    ///
    /// `ApiError::Auth` carrying the server-provided message on rejected
    /// credentials or an exchange response without a usable identity.
    pub async fn authenticate(
        &self,
        kind: AuthKind,
        credentials: &Credentials,
    ) -> Result<User, ApiError> {
        let resp = api::authenticate(kind, credentials).await?;
        let Some(user) = resp.user else {
            return Err(ApiError::Auth("authentication response carried no user".to_owned()));
        };
        storage::write_session(&resp.token, &user);
        self.session.set(SessionState::authenticated(resp.token, user.clone()));
        self.notify(NoticeLevel::Success, "Signed in");
        self.connect();
        Ok(user)
    }

    /// Drop the session everywhere: persisted storage, in-memory state,
    /// and the push connection (a pending reconnect is cancelled, a live
    /// socket is closed). Safe to call repeatedly and when logged out.
    pub fn teardown(&self) {
        storage::clear_session();
        self.session.update(SessionState::clear);
        self.chat.update(ChatState::clear);
        self.connection.update(ConnectionState::shut_down);
        self.socket.update(SocketHandle::close);
    }

    /// Open the push connection for the current session. No-op when
    /// logged out; a task that finds a socket already up exits on its own.
    pub fn connect(&self) {
        #[cfg(feature = "hydrate")]
        {
            if self.session.get_untracked().is_authenticated() {
                crate::net::socket::spawn_socket_client(*self);
            }
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = self;
        }
    }

    /// Refresh the chat list from the server.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`] from the request; surfaced as an error notice.
    pub async fn load_chats(&self) -> Result<(), ApiError> {
        match api::fetch_chats(self).await {
            Ok(chats) => {
                self.chat.update(|c| c.load_chats(chats));
                Ok(())
            }
            Err(e) => {
                self.notify(NoticeLevel::Error, format!("Failed to load chats: {e}"));
                Err(e)
            }
        }
    }

    /// Open a conversation and load its history. A snapshot that comes
    /// back after the user has already moved on is discarded.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`] from the request; surfaced as an error notice.
    pub async fn open_conversation(&self, chat_id: &str) -> Result<(), ApiError> {
        self.chat.update(|c| c.begin_conversation(chat_id));
        match api::fetch_messages(self, chat_id).await {
            Ok(messages) => {
                self.chat.update(|c| {
                    c.finish_load_messages(chat_id, messages);
                });
                Ok(())
            }
            Err(e) => {
                self.notify(NoticeLevel::Error, format!("Failed to load messages: {e}"));
                Err(e)
            }
        }
    }

    /// Search users by username or email fragment. Queries shorter than
    /// two characters return no results without hitting the server.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`] from the request.
    pub async fn search_users(&self, query: &str) -> Result<Vec<User>, ApiError> {
        if query.len() < 2 {
            return Ok(Vec::new());
        }
        api::search_users(self, query).await
    }

    /// Start (or reopen) a private chat with `user_id`, then refresh the
    /// chat list and open the new conversation as one user-visible action.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`] from the chain; surfaced as an error notice.
    pub async fn create_private_chat(&self, user_id: &str) -> Result<Chat, ApiError> {
        let chat = match api::create_private_chat(self, user_id).await {
            Ok(chat) => chat,
            Err(e) => {
                self.notify(NoticeLevel::Error, e.to_string());
                return Err(e);
            }
        };
        self.load_chats().await?;
        self.open_conversation(&chat.id).await?;
        Ok(chat)
    }

    /// Send a message to the open conversation. Empty input or a missing
    /// open conversation is a silent no-op. The created message arrives on
    /// the push socket, not in the response.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`] from the request; surfaced as an error notice.
    pub async fn send_message(&self, content: &str) -> Result<(), ApiError> {
        let text = content.trim();
        if text.is_empty() {
            return Ok(());
        }
        let Some(chat_id) = self.chat.get_untracked().active_chat_id else {
            return Ok(());
        };
        match api::send_message(self, &chat_id, text).await {
            Ok(()) => Ok(()),
            Err(e) => {
                self.notify(NoticeLevel::Error, "Failed to send message");
                Err(e)
            }
        }
    }

    /// Queue a user-facing notice.
    pub fn notify(&self, level: NoticeLevel, text: impl Into<String>) {
        self.notices.update(|n| {
            n.push(level, text.into());
        });
    }
}
