//! Chat sessions: named message histories with JSON persistence.
//!
//! There is no inference engine; the assistant reply is a fixed placeholder
//! until one is wired in.

mod storage;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{Local, TimeZone};
use serde::{Deserialize, Serialize};

use crate::core::presets::validation;
use crate::core::util;

/// Reply appended for every user message.
pub const ASSISTANT_PLACEHOLDER: &str = "Hello! I am an assistant. How can I help you today?";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// A single message in a chat.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Message {
    pub id: i32,
    pub role: Role,
    pub content: String,
    /// Unix seconds.
    pub timestamp: i64,
}

impl Message {
    /// Timestamp rendered in local time, `YYYY-MM-DD HH:MM:SS`.
    pub fn formatted_timestamp(&self) -> String {
        match Local.timestamp_opt(self.timestamp, 0).single() {
            Some(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
            None => self.timestamp.to_string(),
        }
    }
}

/// A named chat and its messages. The name doubles as the filename stem.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatHistory {
    pub name: String,
    pub created_at: i64,
    pub updated_at: i64,
    pub messages: Vec<Message>,
}

/// Error loading or saving chats.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("Chat storage error: {0}")]
    Io(#[from] io::Error),
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid chat name '{name}': {reason}")]
    InvalidName { name: String, reason: &'static str },
    #[error("No chat selected")]
    NoSelection,
}

fn validate_name(name: &str) -> Result<(), ChatError> {
    match validation::name_error(name) {
        Some(reason) => Err(ChatError::InvalidName {
            name: name.to_string(),
            reason,
        }),
        None => Ok(()),
    }
}

/// Owns the chats directory, the loaded chats, and the current selection.
///
/// Every mutation persists the affected chat synchronously; there is no
/// dirty state to track.
pub struct ChatManager {
    dir: PathBuf,
    chats: Vec<ChatHistory>,
    current: Option<usize>,
}

impl ChatManager {
    /// Open a manager over `dir`, creating the directory if needed, and
    /// load every chat in it.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, ChatError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;

        let mut manager = ChatManager {
            dir,
            chats: Vec::new(),
            current: None,
        };
        manager.load_chats()?;
        Ok(manager)
    }

    /// Reload all chats from disk, most recently updated first. Files that
    /// fail to parse are logged and skipped.
    pub fn load_chats(&mut self) -> Result<(), ChatError> {
        self.chats.clear();

        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            match storage::read_chat_file(&path) {
                Ok(chat) => self.chats.push(chat),
                Err(e) => log::warn!("Skipping chat file {}: {}", path.display(), e),
            }
        }

        self.chats.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        self.current = if self.chats.is_empty() { None } else { Some(0) };
        Ok(())
    }

    /// Create a chat and select it. A taken name is disambiguated with
    /// `_1`, `_2`, ... like preset names. Returns the created chat.
    pub fn create_chat(&mut self, name: &str) -> Result<&ChatHistory, ChatError> {
        validate_name(name)?;

        let mut name = name.to_string();
        let base = name.clone();
        let mut counter = 1;
        while storage::chat_path(&self.dir, &name).exists() {
            name = format!("{}_{}", base, counter);
            counter += 1;
        }

        let now = util::now_unix();
        let chat = ChatHistory {
            name,
            created_at: now,
            updated_at: now,
            messages: Vec::new(),
        };
        storage::write_chat_file(&self.dir, &chat)?;

        let index = self.chats.len();
        self.chats.push(chat);
        self.current = Some(index);
        Ok(&self.chats[index])
    }

    /// Rename the selected chat, moving its backing file. The new name is
    /// disambiguated against existing files.
    pub fn rename_current_chat(&mut self, new_name: &str) -> Result<(), ChatError> {
        validate_name(new_name)?;
        let Some(index) = self.current else {
            return Err(ChatError::NoSelection);
        };

        let old_name = self.chats[index].name.clone();
        if old_name == new_name {
            return Ok(());
        }

        let mut name = new_name.to_string();
        let mut counter = 1;
        while storage::chat_path(&self.dir, &name).exists() {
            name = format!("{}_{}", new_name, counter);
            counter += 1;
        }

        self.chats[index].name = name;
        self.chats[index].updated_at = util::now_unix();
        storage::write_chat_file(&self.dir, &self.chats[index])?;
        storage::remove_chat_file(&self.dir, &old_name)?;
        Ok(())
    }

    /// Delete a chat by name: drop it from memory, clamp the selection,
    /// then remove the backing file if present.
    pub fn delete_chat(&mut self, name: &str) -> Result<(), ChatError> {
        if let Some(index) = self.chats.iter().position(|c| c.name == name) {
            self.chats.remove(index);
            if let Some(current) = self.current
                && current >= self.chats.len()
            {
                self.current = self.chats.len().checked_sub(1);
            }
        }
        storage::remove_chat_file(&self.dir, name)?;
        Ok(())
    }

    /// Select the chat at `index`. Out-of-bounds indices are ignored.
    pub fn switch_chat(&mut self, index: usize) {
        if index < self.chats.len() {
            self.current = Some(index);
        }
    }

    /// Append a user message and the assistant reply to the selected chat,
    /// persist it, and return the reply content.
    pub fn send_message(&mut self, content: &str) -> Result<String, ChatError> {
        let Some(index) = self.current else {
            return Err(ChatError::NoSelection);
        };

        let now = util::now_unix();
        let reply = assistant_reply(content);
        let chat = &mut self.chats[index];
        let next_id = chat.messages.len() as i32 + 1;
        chat.messages.push(Message {
            id: next_id,
            role: Role::User,
            content: content.to_string(),
            timestamp: now,
        });
        chat.messages.push(Message {
            id: next_id + 1,
            role: Role::Assistant,
            content: reply.clone(),
            timestamp: now,
        });
        chat.updated_at = now;

        storage::write_chat_file(&self.dir, chat)?;
        Ok(reply)
    }

    /// All loaded chats.
    pub fn chats(&self) -> &[ChatHistory] {
        &self.chats
    }

    /// The selected chat, if any.
    pub fn current_chat(&self) -> Option<&ChatHistory> {
        self.current.and_then(|i| self.chats.get(i))
    }

    /// Index of the chat with the given name.
    pub fn find_chat(&self, name: &str) -> Option<usize> {
        self.chats.iter().position(|c| c.name == name)
    }

    /// The chats directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

// TODO: route through an inference backend once one exists.
fn assistant_reply(_input: &str) -> String {
    ASSISTANT_PLACEHOLDER.to_string()
}

#[cfg(test)]
mod tests;
