use super::*;

#[test]
fn push_assigns_distinct_ids() {
    let mut notices = NoticeState::default();
    let a = notices.push(NoticeLevel::Info, "first".to_owned());
    let b = notices.push(NoticeLevel::Error, "second".to_owned());

    assert_ne!(a, b);
    assert_eq!(notices.items.len(), 2);
}

#[test]
fn dismiss_removes_only_the_target() {
    let mut notices = NoticeState::default();
    let a = notices.push(NoticeLevel::Success, "kept".to_owned());
    let b = notices.push(NoticeLevel::Error, "dropped".to_owned());

    notices.dismiss(b);

    assert_eq!(notices.items.len(), 1);
    assert_eq!(notices.items[0].id, a);
}

#[test]
fn dismiss_unknown_id_is_noop() {
    let mut notices = NoticeState::default();
    notices.push(NoticeLevel::Info, "kept".to_owned());
    notices.dismiss(99);
    assert_eq!(notices.items.len(), 1);
}

#[test]
fn ids_are_not_reused_after_dismiss() {
    let mut notices = NoticeState::default();
    let a = notices.push(NoticeLevel::Info, "first".to_owned());
    notices.dismiss(a);
    let b = notices.push(NoticeLevel::Info, "second".to_owned());
    assert_ne!(a, b);
}
