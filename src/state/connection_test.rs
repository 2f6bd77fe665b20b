use super::*;

// =============================================================
// Transitions
// =============================================================

#[test]
fn default_is_disconnected() {
    let state = ConnectionState::default();
    assert_eq!(state.status, ConnectionStatus::Disconnected);
    assert_eq!(state.attempts, 0);
}

#[test]
fn begin_connect_from_disconnected() {
    let mut state = ConnectionState::default();
    assert!(state.begin_connect());
    assert_eq!(state.status, ConnectionStatus::Connecting);
}

#[test]
fn begin_connect_from_reconnecting() {
    let mut state = ConnectionState::default();
    assert!(state.begin_connect());
    state.mark_connected();
    assert!(state.mark_lost());
    assert!(state.begin_connect());
    assert_eq!(state.status, ConnectionStatus::Connecting);
}

#[test]
fn begin_connect_is_noop_while_connecting_or_connected() {
    let mut state = ConnectionState::default();
    assert!(state.begin_connect());
    let before = state.clone();
    assert!(!state.begin_connect());
    assert_eq!(state, before);

    state.mark_connected();
    let before = state.clone();
    assert!(!state.begin_connect());
    assert_eq!(state, before);
}

#[test]
fn mark_connected_resets_attempt_counter() {
    let mut state = ConnectionState::default();
    assert!(state.begin_connect());
    assert!(state.mark_lost());
    assert!(state.begin_connect());
    assert!(state.mark_lost());
    assert_eq!(state.attempts, 2);

    assert!(state.begin_connect());
    state.mark_connected();

    assert_eq!(state.status, ConnectionStatus::Connected);
    assert_eq!(state.attempts, 0);
}

#[test]
fn mark_lost_schedules_retry_from_connected() {
    let mut state = ConnectionState::default();
    assert!(state.begin_connect());
    state.mark_connected();

    assert!(state.mark_lost());
    assert_eq!(state.status, ConnectionStatus::Reconnecting);
    assert_eq!(state.attempts, 1);
}

#[test]
fn mark_lost_schedules_retry_from_connecting() {
    let mut state = ConnectionState::default();
    assert!(state.begin_connect());

    assert!(state.mark_lost());
    assert_eq!(state.status, ConnectionStatus::Reconnecting);
}

#[test]
fn mark_lost_is_noop_when_disconnected_or_reconnecting() {
    let mut state = ConnectionState::default();
    assert!(!state.mark_lost());
    assert_eq!(state.status, ConnectionStatus::Disconnected);

    assert!(state.begin_connect());
    assert!(state.mark_lost());
    let before = state.clone();
    assert!(!state.mark_lost());
    assert_eq!(state, before);
}

// =============================================================
// Shutdown and cancellation
// =============================================================

#[test]
fn shut_down_cancels_pending_retry() {
    let mut state = ConnectionState::default();
    assert!(state.begin_connect());
    state.mark_connected();
    assert!(state.mark_lost());
    let generation = state.generation;

    state.shut_down();

    assert_eq!(state.status, ConnectionStatus::Disconnected);
    assert_eq!(state.attempts, 0);
    assert_ne!(state.generation, generation);
}

#[test]
fn shut_down_is_idempotent() {
    let mut state = ConnectionState::default();
    assert!(state.begin_connect());
    state.mark_connected();

    state.shut_down();
    let after_first = state.clone();
    state.shut_down();

    assert_eq!(state, after_first);
}

#[test]
fn shut_down_when_already_disconnected_keeps_generation() {
    let mut state = ConnectionState::default();
    state.shut_down();
    assert_eq!(state.generation, 0);
}

#[test]
fn reconnect_cycle_recovers_without_manual_intervention() {
    let mut state = ConnectionState::default();
    assert!(state.begin_connect());
    state.mark_connected();

    // Transport drops; the loop schedules a retry and reconnects.
    assert!(state.mark_lost());
    assert!(state.begin_connect());
    state.mark_connected();

    assert_eq!(state.status, ConnectionStatus::Connected);
    assert_eq!(state.attempts, 0);
}
