#[cfg(test)]
#[path = "chat_test.rs"]
mod chat_test;

use std::collections::HashSet;

use crate::net::types::{Chat, Message};

/// Chat-domain state: the chat list plus the currently open conversation.
///
/// All ids are canonical strings (see `net::types`), so matching a push
/// payload against local state is plain string equality. The open
/// conversation's message sequence is ordered by arrival and is only ever
/// replaced wholesale by a snapshot or appended to by a push.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChatState {
    pub chats: Vec<Chat>,
    pub active_chat_id: Option<String>,
    pub messages: Vec<Message>,
    /// Displayed online flag for the open conversation's interlocutor,
    /// consumed by the projection layer.
    pub active_peer_online: bool,
    seen_message_ids: HashSet<String>,
}

impl ChatState {
    /// Replace the chat list wholesale with a REST snapshot. The open
    /// conversation's messages are untouched.
    pub fn load_chats(&mut self, snapshot: Vec<Chat>) {
        self.chats = snapshot;
        self.active_peer_online = self.active_chat().map_or(false, |c| c.is_online);
    }

    /// Open a conversation: make it active and drop the previous message
    /// sequence. The snapshot arrives later via [`finish_load_messages`].
    ///
    /// [`finish_load_messages`]: ChatState::finish_load_messages
    pub fn begin_conversation(&mut self, chat_id: &str) {
        self.active_chat_id = Some(chat_id.to_owned());
        self.messages.clear();
        self.seen_message_ids.clear();
        self.active_peer_online = self.active_chat().map_or(false, |c| c.is_online);
    }

    /// Install a message snapshot fetched for `requested_id`.
    ///
    /// Rapid switching can leave a stale fetch in flight; a snapshot for a
    /// chat that is no longer active is discarded so it cannot clobber a
    /// newer conversation. Returns whether the snapshot was applied.
    pub fn finish_load_messages(&mut self, requested_id: &str, snapshot: Vec<Message>) -> bool {
        if self.active_chat_id.as_deref() != Some(requested_id) {
            return false;
        }
        self.seen_message_ids = snapshot.iter().map(|m| m.id.clone()).collect();
        self.messages = snapshot;
        true
    }

    /// Apply a pushed message.
    ///
    /// The owning chat's preview always updates so the list stays current,
    /// whichever conversation is open. The message itself is appended only
    /// when its chat is the open conversation and its id has not been seen
    /// before (a reconnect-triggered refresh can redeliver ids already
    /// applied by push).
    pub fn apply_incoming_message(&mut self, msg: Message) {
        if let Some(chat) = self.chats.iter_mut().find(|c| c.id == msg.chat_id) {
            chat.last_message = Some(msg.content.clone());
        }
        if self.active_chat_id.as_deref() == Some(msg.chat_id.as_str()) {
            if self.seen_message_ids.insert(msg.id.clone()) {
                self.messages.push(msg);
            }
        }
    }

    /// Apply a presence event: every chat whose interlocutor matches picks
    /// up the new flag, and the displayed flag for the open conversation is
    /// re-derived.
    pub fn apply_presence_change(&mut self, user_id: &str, online: bool) {
        for chat in &mut self.chats {
            if chat.interlocutor_id.as_deref() == Some(user_id) {
                chat.is_online = online;
            }
        }
        self.active_peer_online = self.active_chat().map_or(false, |c| c.is_online);
    }

    /// The chat list row for the open conversation, when both exist.
    pub fn active_chat(&self) -> Option<&Chat> {
        let id = self.active_chat_id.as_deref()?;
        self.chats.iter().find(|c| c.id == id)
    }

    /// Forget everything. Used on logout.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
