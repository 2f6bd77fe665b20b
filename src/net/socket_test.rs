use super::*;
use crate::net::types::Chat;

fn envelope(kind: &str, content: serde_json::Value) -> String {
    serde_json::json!({ "type": kind, "content": content }).to_string()
}

// =============================================================
// Frame parsing
// =============================================================

#[test]
fn parse_frame_decodes_new_message() {
    let raw = envelope(
        "new_message",
        serde_json::json!({
            "id": "m9",
            "chat_id": "1",
            "sender_id": "bob",
            "content": "hi",
            "created_at": "2026-08-05T10:00:00Z"
        }),
    );

    let event = parse_frame(&raw).expect("event");
    let PushEvent::MessageArrived(msg) = event else {
        panic!("expected a message event");
    };
    assert_eq!(msg.id, "m9");
    assert_eq!(msg.chat_id, "1");
    assert_eq!(msg.content, "hi");
}

#[test]
fn parse_frame_canonicalizes_numeric_ids() {
    let raw = envelope(
        "new_message",
        serde_json::json!({ "id": 9, "chat_id": 1, "sender_id": 2, "content": "hi" }),
    );

    let PushEvent::MessageArrived(msg) = parse_frame(&raw).expect("event") else {
        panic!("expected a message event");
    };
    assert_eq!(msg.chat_id, "1");
}

#[test]
fn parse_frame_decodes_user_status() {
    let raw = envelope("user_status", serde_json::json!({ "user_id": "u-2", "online": true }));

    let event = parse_frame(&raw).expect("event");
    assert_eq!(
        event,
        PushEvent::PresenceChanged(PresenceUpdate { user_id: "u-2".to_owned(), online: true })
    );
}

#[test]
fn parse_frame_ignores_unrecognized_types() {
    let raw = envelope("typing_indicator", serde_json::json!({ "user_id": "u-2" }));
    assert_eq!(parse_frame(&raw).expect("event"), PushEvent::Ignored);
}

#[test]
fn parse_frame_rejects_malformed_json() {
    assert!(parse_frame("{not json").is_err());
    assert!(parse_frame("42").is_err());
}

#[test]
fn parse_frame_rejects_recognized_type_with_unusable_content() {
    let raw = envelope("new_message", serde_json::json!({ "content": "hi" }));
    assert!(parse_frame(&raw).is_err());

    let raw = envelope("user_status", serde_json::Value::Null);
    assert!(parse_frame(&raw).is_err());
}

// =============================================================
// Dispatch into chat state
// =============================================================

fn state_with_open_chat() -> ChatState {
    let mut state = ChatState::default();
    state.load_chats(vec![Chat {
        id: "1".to_owned(),
        name: "Bob".to_owned(),
        interlocutor_id: Some("bob".to_owned()),
        last_message: None,
        is_online: false,
    }]);
    state.begin_conversation("1");
    assert!(state.finish_load_messages("1", Vec::new()));
    state
}

#[test]
fn pushed_message_reaches_preview_and_open_sequence() {
    let mut state = state_with_open_chat();
    let raw = envelope(
        "new_message",
        serde_json::json!({
            "id": "m9",
            "chat_id": "1",
            "sender_id": "bob",
            "content": "hi",
            "created_at": "2026-08-05T10:00:00Z"
        }),
    );

    apply_event(parse_frame(&raw).expect("event"), &mut state);

    assert_eq!(state.chats[0].last_message.as_deref(), Some("hi"));
    assert_eq!(state.messages.len(), 1);
}

#[test]
fn pushed_presence_reaches_chat_list() {
    let mut state = state_with_open_chat();
    let raw = envelope("user_status", serde_json::json!({ "user_id": "bob", "online": true }));

    apply_event(parse_frame(&raw).expect("event"), &mut state);

    assert!(state.chats[0].is_online);
    assert!(state.active_peer_online);
}

#[test]
fn ignored_event_leaves_state_untouched() {
    let mut state = state_with_open_chat();
    let before = state.clone();

    apply_event(PushEvent::Ignored, &mut state);

    assert_eq!(state, before);
}

// =============================================================
// URL building
// =============================================================

#[test]
fn socket_url_follows_page_protocol() {
    assert_eq!(
        socket_url("https:", "chat.example.com", "tok"),
        "wss://chat.example.com/api/ws?token=tok"
    );
    assert_eq!(
        socket_url("http:", "localhost:8080", "tok"),
        "ws://localhost:8080/api/ws?token=tok"
    );
}

#[test]
fn socket_handle_close_is_idempotent() {
    let mut handle = SocketHandle::default();
    handle.close();
    handle.close();
}
