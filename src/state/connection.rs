#[cfg(test)]
#[path = "connection_test.rs"]
mod connection_test;

/// Push socket connection status.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ConnectionStatus {
    #[default]
    Disconnected,
    Connecting,
    Connected,
    Reconnecting,
}

/// Connection lifecycle state for the push socket.
///
/// `attempts` counts losses since the last successful handshake and exists
/// for diagnostics; the retry delay is constant, not backoff-scaled.
/// `generation` identifies which socket task may act on this state:
/// `shut_down` bumps it, so a retry scheduled before logout wakes up, sees
/// a stale generation, and stops without reconnecting.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConnectionState {
    pub status: ConnectionStatus,
    pub attempts: u32,
    pub generation: u64,
}

impl ConnectionState {
    /// Move into `Connecting`. Legal only from `Disconnected` or
    /// `Reconnecting`; returns false and leaves the state untouched when a
    /// handshake is already in flight or a socket is already up.
    pub fn begin_connect(&mut self) -> bool {
        match self.status {
            ConnectionStatus::Disconnected | ConnectionStatus::Reconnecting => {
                self.status = ConnectionStatus::Connecting;
                true
            }
            ConnectionStatus::Connecting | ConnectionStatus::Connected => false,
        }
    }

    /// The handshake completed; the socket is live.
    pub fn mark_connected(&mut self) {
        self.status = ConnectionStatus::Connected;
        self.attempts = 0;
    }

    /// The transport closed or errored while connecting or connected.
    /// Returns whether a retry should be scheduled.
    pub fn mark_lost(&mut self) -> bool {
        match self.status {
            ConnectionStatus::Connecting | ConnectionStatus::Connected => {
                self.status = ConnectionStatus::Reconnecting;
                self.attempts = self.attempts.saturating_add(1);
                true
            }
            ConnectionStatus::Disconnected | ConnectionStatus::Reconnecting => false,
        }
    }

    /// Tear the connection down for good (logout). Bumps the generation
    /// when there was anything to cancel, retiring any pending retry.
    /// Idempotent.
    pub fn shut_down(&mut self) {
        if self.status != ConnectionStatus::Disconnected {
            self.generation = self.generation.wrapping_add(1);
        }
        self.status = ConnectionStatus::Disconnected;
        self.attempts = 0;
    }
}
