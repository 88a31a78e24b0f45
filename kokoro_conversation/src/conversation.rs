//! A single conversation and its ordered message sequence.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use kokoro_core::{Message, Role};

/// Title projection length, in characters.
const TITLE_LIMIT: usize = 30;

/// One conversation: an ordered message sequence plus display metadata.
///
/// Insertion order is display order. `title` is derived from the first
/// user message and is a projection, not independently authoritative.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    pub id: String,
    pub title: String,
    pub messages: Vec<Message>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Conversation {
    /// Create a conversation seeded with one assistant greeting.
    #[must_use]
    pub fn new(title: String, greeting: Message) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::now_v7().to_string(),
            title,
            messages: vec![greeting],
            created_at: now,
            updated_at: now,
        }
    }

    /// Append a message, bumping `updated_at`.
    pub fn push_message(&mut self, message: Message) {
        self.messages.push(message);
        self.updated_at = Utc::now();
    }

    /// Find a message by id.
    #[must_use]
    pub fn find_message_mut(&mut self, id: &str) -> Option<&mut Message> {
        self.messages.iter_mut().find(|m| m.id == id)
    }

    /// The last assistant message, if any.
    #[must_use]
    pub fn last_assistant(&self) -> Option<&Message> {
        self.messages.iter().rev().find(|m| m.role == Role::Assistant)
    }

    /// Recompute the title from user-message content.
    ///
    /// Counts characters, not bytes, so CJK content truncates safely.
    pub fn set_title_from(&mut self, content: &str) {
        let mut title: String = content.chars().take(TITLE_LIMIT).collect();
        if content.chars().count() > TITLE_LIMIT {
            title.push_str("...");
        }
        self.title = title;
    }

    #[must_use]
    pub const fn message_count(&self) -> usize {
        self.messages.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn greeting() -> Message {
        Message::assistant("seed".to_string(), "Hello!".to_string(), Some("seed".to_string()))
    }

    #[test]
    fn new_conversation_is_seeded() {
        let conversation = Conversation::new("New Chat".to_string(), greeting());
        assert_eq!(conversation.message_count(), 1);
        assert_eq!(conversation.messages[0].role, Role::Assistant);
    }

    #[test]
    fn title_truncates_at_thirty_chars() {
        let mut conversation = Conversation::new("New Chat".to_string(), greeting());

        let long = "a".repeat(31);
        conversation.set_title_from(&long);
        assert_eq!(conversation.title, format!("{}...", "a".repeat(30)));

        let exact = "b".repeat(30);
        conversation.set_title_from(&exact);
        assert_eq!(conversation.title, exact);
    }

    #[test]
    fn title_counts_chars_not_bytes() {
        let mut conversation = Conversation::new("New Chat".to_string(), greeting());
        let cjk = "想".repeat(31);
        conversation.set_title_from(&cjk);
        assert_eq!(conversation.title.chars().count(), 33); // 30 + "..."
    }

    #[test]
    fn last_assistant_skips_user_messages() {
        let mut conversation = Conversation::new("New Chat".to_string(), greeting());
        conversation.push_message(Message::user("hi".to_string(), Vec::new()));
        assert_eq!(conversation.last_assistant().map(|m| m.id.as_str()), Some("seed"));
    }
}
