//! # alpha-client
//!
//! Realtime synchronization core for the Alpha messenger's browser client.
//! Keeps a local model of chats and the open conversation in sync with the
//! server over two channels: authenticated REST calls for bulk snapshots
//! and a receive-only WebSocket for push events (new messages, presence
//! changes).
//!
//! Rendering is out of scope. State lives in plain structs wrapped by
//! reactive signals on [`context::ClientContext`]; a view layer subscribes
//! to those signals and projects them to markup. Browser-only transport
//! code is gated behind the `hydrate` feature so the state machines and
//! merge rules run under native unit tests.

pub mod context;
pub mod net;
pub mod state;
pub mod util;

/// Install console logging and panic reporting. Call once at startup,
/// before constructing a [`context::ClientContext`].
#[cfg(feature = "hydrate")]
pub fn init_browser_logging() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
}
