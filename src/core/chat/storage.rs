//! Chat file persistence (`<name>.json` in the chats directory).

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::core::util;

use super::{ChatError, ChatHistory};

pub(super) fn chat_path(dir: &Path, name: &str) -> PathBuf {
    dir.join(format!("{}.json", name))
}

pub(super) fn read_chat_file(path: &Path) -> Result<ChatHistory, ChatError> {
    let data = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&data)?)
}

/// Write a chat via a temp file and rename, so a crash mid-write never
/// leaves a truncated chat behind.
pub(super) fn write_chat_file(dir: &Path, chat: &ChatHistory) -> Result<(), ChatError> {
    let path = chat_path(dir, &chat.name);
    let json = util::to_pretty_json(chat)?;
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, json)?;
    fs::rename(tmp, path)?;
    Ok(())
}

/// Remove a chat's backing file. Missing files are fine; only a failed
/// removal of an existing file is an error.
pub(super) fn remove_chat_file(dir: &Path, name: &str) -> io::Result<()> {
    let path = chat_path(dir, name);
    if path.exists() {
        fs::remove_file(path)?;
    }
    Ok(())
}
