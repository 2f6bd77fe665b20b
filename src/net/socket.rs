//! Push socket client for realtime updates.
//!
//! Owns the WebSocket lifecycle: connect, dispatch inbound envelopes into
//! chat state, and retry on a fixed delay for as long as the session holds
//! a token. The channel is receive-only; the client never writes frames.
//!
//! At most one transport is live at a time: a socket task must win
//! `begin_connect` on the shared connection state before opening, and a
//! task that loses that race exits instead of racing for the handle.
//!
//! Browser transport is gated behind `hydrate`; envelope parsing and
//! dispatch are plain code shared with native tests.

#[cfg(test)]
#[path = "socket_test.rs"]
mod socket_test;

use crate::net::types::{Envelope, Message, PresenceUpdate};
use crate::state::chat::ChatState;

/// Fixed delay before a reconnect attempt. The service is expected to
/// recover quickly, so the interval does not grow.
pub const RECONNECT_DELAY_MS: u64 = 3_000;

/// What an inbound frame turned out to contain.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PushEvent {
    MessageArrived(Message),
    PresenceChanged(PresenceUpdate),
    /// An envelope type this client does not handle.
    Ignored,
}

/// Parse one inbound text frame.
///
/// # Errors
///
/// Malformed JSON, a frame that is not an envelope, or a recognized
/// envelope whose content does not decode. The caller drops and logs such
/// frames; they are never forwarded.
pub fn parse_frame(raw: &str) -> Result<PushEvent, serde_json::Error> {
    let envelope: Envelope = serde_json::from_str(raw)?;
    Ok(match envelope.kind.as_str() {
        "new_message" => PushEvent::MessageArrived(serde_json::from_value(envelope.content)?),
        "user_status" => PushEvent::PresenceChanged(serde_json::from_value(envelope.content)?),
        _ => PushEvent::Ignored,
    })
}

/// Apply a parsed push event to chat state.
pub fn apply_event(event: PushEvent, chat: &mut ChatState) {
    match event {
        PushEvent::MessageArrived(msg) => chat.apply_incoming_message(msg),
        PushEvent::PresenceChanged(p) => chat.apply_presence_change(&p.user_id, p.online),
        PushEvent::Ignored => {}
    }
}

/// Socket URL for the current page location. Secure pages upgrade to
/// `wss`.
pub fn socket_url(page_protocol: &str, host: &str, token: &str) -> String {
    let scheme = if page_protocol == "https:" { "wss" } else { "ws" };
    format!("{scheme}://{host}/api/ws?token={token}")
}

/// Control handle for the live socket task. Logout closes a blocked read
/// immediately through this channel; the generation counter on the
/// connection state retires a sleeping retry at its next wake-up.
#[derive(Clone, Debug, Default)]
pub struct SocketHandle {
    #[cfg(feature = "hydrate")]
    close_tx: Option<futures::channel::mpsc::UnboundedSender<()>>,
}

impl SocketHandle {
    /// Ask the live socket task, if any, to drop its connection.
    /// Idempotent.
    pub fn close(&mut self) {
        #[cfg(feature = "hydrate")]
        if let Some(tx) = self.close_tx.take() {
            let _ = tx.unbounded_send(());
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = self;
        }
    }
}

/// Spawn the socket client lifecycle as a local async task.
#[cfg(feature = "hydrate")]
pub fn spawn_socket_client(ctx: crate::context::ClientContext) {
    leptos::task::spawn_local(socket_loop(ctx));
}

/// Connection loop: connect, run until the transport drops, retry after
/// the fixed delay. Exits when the session no longer holds a token, when
/// the observed generation goes stale (logout), or when another task
/// already owns the socket.
#[cfg(feature = "hydrate")]
async fn socket_loop(ctx: crate::context::ClientContext) {
    use leptos::prelude::{GetUntracked, Update};

    // The generation observed at spawn identifies this task; teardown
    // bumps it, which retires the task at its next wake-up.
    let generation = ctx.connection.get_untracked().generation;

    loop {
        let Some(token) = ctx.session.get_untracked().token else {
            break;
        };
        if ctx.connection.get_untracked().generation != generation {
            break;
        }

        let mut started = false;
        ctx.connection.update(|c| started = c.begin_connect());
        if !started {
            break;
        }

        match run_socket(&token, &ctx).await {
            Ok(()) => leptos::logging::log!("push: socket closed"),
            Err(e) => leptos::logging::warn!("push: socket error: {e}"),
        }

        // A teardown during the run retired this task; the state is no
        // longer ours to touch.
        if ctx.connection.get_untracked().generation != generation {
            break;
        }

        let mut retry = false;
        ctx.connection.update(|c| retry = c.mark_lost());
        if !retry {
            break;
        }

        gloo_timers::future::sleep(std::time::Duration::from_millis(RECONNECT_DELAY_MS)).await;
    }
}

/// Open the WebSocket and process inbound frames until the transport
/// drops or the close channel fires.
#[cfg(feature = "hydrate")]
async fn run_socket(token: &str, ctx: &crate::context::ClientContext) -> Result<(), String> {
    use futures::{StreamExt, future};
    use gloo_net::websocket::Message as WsMessage;
    use gloo_net::websocket::futures::WebSocket;
    use leptos::prelude::Update;

    use crate::state::connection::ConnectionState;
    use crate::state::notices::NoticeLevel;

    let window = web_sys::window();
    let protocol = window
        .as_ref()
        .and_then(|w| w.location().protocol().ok())
        .unwrap_or_else(|| "http:".to_owned());
    let host = window
        .as_ref()
        .and_then(|w| w.location().host().ok())
        .unwrap_or_else(|| "localhost:8080".to_owned());
    let url = socket_url(&protocol, &host, token);

    let ws = WebSocket::open(&url).map_err(|e| e.to_string())?;
    let (_write, mut read) = ws.split();

    let (close_tx, mut close_rx) = futures::channel::mpsc::unbounded::<()>();
    ctx.socket.update(|handle| handle.close_tx = Some(close_tx));

    ctx.connection.update(ConnectionState::mark_connected);
    ctx.notify(NoticeLevel::Success, "Connected");

    let recv_task = async {
        while let Some(frame) = read.next().await {
            match frame {
                Ok(WsMessage::Text(text)) => match parse_frame(&text) {
                    Ok(event) => ctx.chat.update(|chat| apply_event(event, chat)),
                    Err(e) => leptos::logging::warn!("push: dropping malformed frame: {e}"),
                },
                Ok(WsMessage::Bytes(_)) => {}
                Err(e) => return Err(e.to_string()),
            }
        }
        Ok(())
    };

    let result = match future::select(Box::pin(recv_task), close_rx.next()).await {
        future::Either::Left((result, _)) => result,
        future::Either::Right(_) => Ok(()),
    };
    ctx.socket.update(|handle| handle.close_tx = None);
    result
}
