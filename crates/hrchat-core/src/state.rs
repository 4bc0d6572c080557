//! UI-agnostic chat log types
//!
//! The log is append-only. The only removals are of the transient
//! "thinking" placeholder; the only in-place edit is the note attached to a
//! confirmation message once the user proceeds.

use serde::{Deserialize, Serialize};

pub type MessageId = u64;

/// Who a chat message is from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sender {
    User,
    Bot,
}

/// Display flavor of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageKind {
    Plain,
    Info,
    Success,
    Error,
    Confirmation,
    Thinking,
}

/// A single entry in the chat log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub text: String,
    pub sender: Sender,
    pub kind: MessageKind,
    pub note: Option<String>,
}

impl Message {
    /// Bot messages that carry SQL or other code are shown verbatim.
    pub fn is_preformatted(&self) -> bool {
        if self.sender != Sender::Bot {
            return false;
        }
        let lower = self.text.to_lowercase();
        self.kind == MessageKind::Confirmation
            || self.text.contains('`')
            || lower.contains("query is:")
            || lower.contains("attempted:")
    }

    /// Text as it should be drawn (backticks dropped from preformatted text).
    pub fn display_text(&self) -> String {
        if self.is_preformatted() {
            self.text.replace('`', "")
        } else {
            self.text.clone()
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MessageLog {
    messages: Vec<Message>,
    next_id: MessageId,
}

impl MessageLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, text: impl Into<String>, sender: Sender, kind: MessageKind) -> MessageId {
        let id = self.next_id;
        self.next_id += 1;
        self.messages.push(Message {
            id,
            text: text.into(),
            sender,
            kind,
            note: None,
        });
        id
    }

    pub fn user(&mut self, text: impl Into<String>) -> MessageId {
        self.push(text, Sender::User, MessageKind::Plain)
    }

    pub fn bot(&mut self, text: impl Into<String>, kind: MessageKind) -> MessageId {
        self.push(text, Sender::Bot, kind)
    }

    /// Add the thinking placeholder unless one is already shown.
    pub fn show_thinking(&mut self) {
        if !self.is_thinking() {
            self.bot("", MessageKind::Thinking);
        }
    }

    pub fn hide_thinking(&mut self) {
        self.messages.retain(|m| m.kind != MessageKind::Thinking);
    }

    pub fn is_thinking(&self) -> bool {
        self.messages.iter().any(|m| m.kind == MessageKind::Thinking)
    }

    pub fn set_note(&mut self, id: MessageId, note: impl Into<String>) {
        if let Some(message) = self.messages.iter_mut().find(|m| m.id == id) {
            message.note = Some(note.into());
        }
    }

    pub fn get(&self, id: MessageId) -> Option<&Message> {
        self.messages.iter().find(|m| m.id == id)
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thinking_placeholder_is_single() {
        let mut log = MessageLog::new();
        log.user("hello");
        log.show_thinking();
        log.show_thinking();
        assert_eq!(log.len(), 2);
        assert!(log.is_thinking());

        log.hide_thinking();
        assert_eq!(log.len(), 1);
        assert!(!log.is_thinking());
    }

    #[test]
    fn test_ids_are_not_reused_after_thinking_removed() {
        let mut log = MessageLog::new();
        log.show_thinking();
        log.hide_thinking();
        let id = log.bot("done", MessageKind::Info);
        assert_eq!(id, 1);
    }

    #[test]
    fn test_preformatted_detection() {
        let mut log = MessageLog::new();
        let sql = log.bot("The query is: `SELECT 1`", MessageKind::Info);
        let attempted = log.bot("Attempted Query: DELETE FROM x", MessageKind::Info);
        let plain = log.bot("Hello there", MessageKind::Info);
        let confirm = log.bot("Run this?", MessageKind::Confirmation);
        let user = log.user("what is `x`");

        assert!(log.get(sql).unwrap().is_preformatted());
        assert_eq!(log.get(sql).unwrap().display_text(), "The query is: SELECT 1");
        assert!(log.get(attempted).unwrap().is_preformatted());
        assert!(!log.get(plain).unwrap().is_preformatted());
        assert!(log.get(confirm).unwrap().is_preformatted());
        assert!(!log.get(user).unwrap().is_preformatted());
        assert_eq!(log.get(user).unwrap().display_text(), "what is `x`");
    }

    #[test]
    fn test_set_note() {
        let mut log = MessageLog::new();
        let id = log.bot("Run this?", MessageKind::Confirmation);
        log.set_note(id, "User confirmed. Executing...");
        assert_eq!(
            log.get(id).unwrap().note.as_deref(),
            Some("User confirmed. Executing...")
        );
    }
}
