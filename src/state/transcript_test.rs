use super::*;

#[test]
fn transcript_default_is_empty() {
    let transcript = Transcript::default();
    assert!(transcript.is_empty());
    assert!(transcript.entries().is_empty());
}

#[test]
fn typing_indicator_is_never_duplicated() {
    let mut transcript = Transcript::default();
    assert!(transcript.show_typing("Maria"));
    assert!(!transcript.show_typing("Maria"));
    assert_eq!(transcript.len(), 1);
}

#[test]
fn hide_without_show_is_a_no_op() {
    let mut transcript = Transcript::default();
    transcript.push(Message::new(Role::User, "hi"));
    assert!(!transcript.hide_typing());
    assert_eq!(transcript.entries(), vec![Entry::Message(Message::new(Role::User, "hi"))]);
}

#[test]
fn typing_indicator_stays_last_and_is_removed_cleanly() {
    let mut transcript = Transcript::default();
    transcript.push(Message::new(Role::User, "Do you know Giovanni?"));
    transcript.show_typing("David");

    let entries = transcript.entries();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[1], Entry::Typing { npc_name: "David".to_owned() });

    assert!(transcript.hide_typing());
    transcript.push(Message::new(Role::Npc, "Never heard of him."));
    assert!(!transcript.is_typing());
    assert_eq!(transcript.messages().len(), 2);
    assert!(transcript.entries().iter().all(|e| matches!(e, Entry::Message(_))));
}
