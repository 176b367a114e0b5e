//! Chat manager tests.

use super::{ASSISTANT_PLACEHOLDER, ChatError, ChatManager, Message, Role};

#[test]
fn open_on_empty_directory_has_no_chats() {
    let tmp = tempfile::TempDir::new().expect("temp dir");
    let manager = ChatManager::open(tmp.path()).expect("open");

    assert!(manager.chats().is_empty());
    assert!(manager.current_chat().is_none());
}

#[test]
fn create_chat_persists_and_selects() {
    let tmp = tempfile::TempDir::new().expect("temp dir");
    let mut manager = ChatManager::open(tmp.path()).expect("open");

    let chat = manager.create_chat("New Chat").expect("create");
    assert_eq!(chat.name, "New Chat");
    assert!(tmp.path().join("New Chat.json").exists());
    assert_eq!(
        manager.current_chat().expect("current").name,
        "New Chat"
    );
}

#[test]
fn create_chat_disambiguates_taken_names() {
    let tmp = tempfile::TempDir::new().expect("temp dir");
    let mut manager = ChatManager::open(tmp.path()).expect("open");

    manager.create_chat("New Chat").expect("first");
    let second = manager.create_chat("New Chat").expect("second");
    assert_eq!(second.name, "New Chat_1");
    assert!(tmp.path().join("New Chat_1.json").exists());
}

#[test]
fn create_chat_rejects_invalid_name() {
    let tmp = tempfile::TempDir::new().expect("temp dir");
    let mut manager = ChatManager::open(tmp.path()).expect("open");

    let err = manager.create_chat("a/b").unwrap_err();
    assert!(matches!(err, ChatError::InvalidName { .. }));
}

#[test]
fn send_message_appends_user_and_placeholder_reply() {
    let tmp = tempfile::TempDir::new().expect("temp dir");
    let mut manager = ChatManager::open(tmp.path()).expect("open");
    manager.create_chat("chat").expect("create");

    let reply = manager.send_message("Hi there").expect("send");
    assert_eq!(reply, ASSISTANT_PLACEHOLDER);

    let chat = manager.current_chat().expect("current");
    assert_eq!(chat.messages.len(), 2);
    assert_eq!(chat.messages[0].role, Role::User);
    assert_eq!(chat.messages[0].content, "Hi there");
    assert_eq!(chat.messages[1].role, Role::Assistant);
    assert_eq!(chat.messages[0].id, 1);
    assert_eq!(chat.messages[1].id, 2);
}

#[test]
fn send_message_without_selection_errors() {
    let tmp = tempfile::TempDir::new().expect("temp dir");
    let mut manager = ChatManager::open(tmp.path()).expect("open");

    let err = manager.send_message("hello").unwrap_err();
    assert!(matches!(err, ChatError::NoSelection));
}

#[test]
fn messages_survive_reload() {
    let tmp = tempfile::TempDir::new().expect("temp dir");
    let mut manager = ChatManager::open(tmp.path()).expect("open");
    manager.create_chat("chat").expect("create");
    manager.send_message("one").expect("send");
    manager.send_message("two").expect("send");

    let mut manager = ChatManager::open(tmp.path()).expect("reopen");
    let chat = manager.current_chat().expect("current");
    assert_eq!(chat.messages.len(), 4);
    assert_eq!(chat.messages[2].content, "two");

    // Ids keep counting across sessions.
    manager.send_message("three").expect("send");
    let chat = manager.current_chat().expect("current");
    assert_eq!(chat.messages[4].id, 5);
}

#[test]
fn rename_moves_backing_file() {
    let tmp = tempfile::TempDir::new().expect("temp dir");
    let mut manager = ChatManager::open(tmp.path()).expect("open");
    manager.create_chat("old").expect("create");

    manager.rename_current_chat("new").expect("rename");
    assert!(!tmp.path().join("old.json").exists());
    assert!(tmp.path().join("new.json").exists());
    assert_eq!(manager.current_chat().expect("current").name, "new");
}

#[test]
fn rename_to_taken_name_disambiguates() {
    let tmp = tempfile::TempDir::new().expect("temp dir");
    let mut manager = ChatManager::open(tmp.path()).expect("open");
    manager.create_chat("a").expect("create a");
    manager.create_chat("b").expect("create b");

    // "b" is selected; renaming it to "a" collides with the existing file.
    manager.rename_current_chat("a").expect("rename");
    assert_eq!(manager.current_chat().expect("current").name, "a_1");
    assert!(tmp.path().join("a_1.json").exists());
    assert!(!tmp.path().join("b.json").exists());
}

#[test]
fn delete_chat_removes_file_and_entry() {
    let tmp = tempfile::TempDir::new().expect("temp dir");
    let mut manager = ChatManager::open(tmp.path()).expect("open");
    manager.create_chat("gone").expect("create");

    manager.delete_chat("gone").expect("delete");
    assert!(manager.chats().is_empty());
    assert!(manager.current_chat().is_none());
    assert!(!tmp.path().join("gone.json").exists());
}

#[test]
fn chats_load_most_recently_updated_first() {
    let tmp = tempfile::TempDir::new().expect("temp dir");
    {
        let mut manager = ChatManager::open(tmp.path()).expect("open");
        manager.create_chat("first").expect("create");
        manager.create_chat("second").expect("create");

        // Touch "first" so it becomes the most recent.
        let index = manager.find_chat("first").expect("find");
        manager.switch_chat(index);
        let chat = manager.current_chat().expect("current");
        let bumped = super::ChatHistory {
            updated_at: chat.updated_at + 10,
            ..chat.clone()
        };
        super::storage::write_chat_file(manager.dir(), &bumped).expect("write");
    }

    let manager = ChatManager::open(tmp.path()).expect("reopen");
    let names: Vec<_> = manager.chats().iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["first", "second"]);
    assert_eq!(manager.current_chat().expect("current").name, "first");
}

#[test]
fn malformed_chat_file_is_skipped() {
    let tmp = tempfile::TempDir::new().expect("temp dir");
    std::fs::write(tmp.path().join("broken.json"), b"{]").expect("write");
    {
        let mut manager = ChatManager::open(tmp.path()).expect("open despite bad file");
        manager.create_chat("ok").expect("create");
    }

    let manager = ChatManager::open(tmp.path()).expect("reopen");
    let names: Vec<_> = manager.chats().iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["ok"]);
}

#[test]
fn formatted_timestamp_renders_date_and_time() {
    let message = Message {
        id: 1,
        role: Role::User,
        content: "x".to_string(),
        timestamp: 1_700_000_000,
    };
    let out = message.formatted_timestamp();
    // Local-time rendering; check shape rather than exact instant.
    assert_eq!(out.len(), 19, "got: {}", out);
    assert_eq!(&out[4..5], "-");
    assert_eq!(&out[13..14], ":");
}
