//! The conversation store: upsert and derived queries over all
//! conversations.
//!
//! All operations are total over the in-memory state; a missing target
//! conversation or message degrades to a no-op rather than an error, which
//! keeps the calling UI resilient to stale ids.

use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::conversation::Conversation;
use kokoro_core::{Message, Role};

/// Holds every conversation, the active selection, and the pending
/// correlation id of the most recently closed stream.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct ConversationStore {
    conversations: Vec<Conversation>,
    active_id: Option<String>,
    last_correlation_id: Option<String>,
}

impl ConversationStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a conversation seeded with one assistant greeting, prepend
    /// it, and make it active.
    ///
    /// Any pending correlation id is cleared so a fresh conversation never
    /// continues a stale server-side exchange.
    pub fn create_conversation(&mut self, title: &str, greeting: &str) -> &Conversation {
        let seed_id = Uuid::now_v7().to_string();
        let seed = Message::assistant(seed_id.clone(), greeting.to_string(), Some(seed_id));

        let conversation = Conversation::new(title.to_string(), seed);
        debug!("Created conversation {}", conversation.id);

        self.active_id = Some(conversation.id.clone());
        self.last_correlation_id = None;
        self.conversations.insert(0, conversation);
        &self.conversations[0]
    }

    /// Remove a conversation. If it was active, the first remaining
    /// conversation (or none) becomes active.
    pub fn delete_conversation(&mut self, id: &str) {
        self.conversations.retain(|c| c.id != id);
        if self.active_id.as_deref() == Some(id) {
            self.active_id = self.conversations.first().map(|c| c.id.clone());
        }
    }

    /// Select a conversation by id.
    ///
    /// The id is stored without existence validation; selecting a deleted
    /// conversation silently resolves to no active conversation.
    pub fn set_active_conversation(&mut self, id: &str) {
        self.active_id = Some(id.to_string());
    }

    /// Append or replace-in-place a message, keyed by message identity.
    ///
    /// With `replace` set, an existing record with the same id has only
    /// its `content` overwritten (timestamp and correlation metadata are
    /// preserved), and identical content is a no-op; a missing record is
    /// appended, which covers the first fragment of a new assistant turn.
    /// Without `replace`, the message is appended unconditionally and a
    /// user message recomputes the conversation title.
    pub fn upsert_message(&mut self, conversation_id: &str, message: Message, replace: bool) {
        let Some(conversation) = self
            .conversations
            .iter_mut()
            .find(|c| c.id == conversation_id)
        else {
            debug!("upsert into unknown conversation {conversation_id}, ignoring");
            return;
        };

        if replace {
            if let Some(existing) = conversation.find_message_mut(&message.id) {
                if existing.content != message.content {
                    existing.content = message.content;
                }
                return;
            }
            conversation.push_message(message);
            return;
        }

        let title_source = (message.role == Role::User).then(|| message.content.clone());
        conversation.push_message(message);
        if let Some(content) = title_source {
            conversation.set_title_from(&content);
        }
    }

    #[must_use]
    pub fn active_conversation(&self) -> Option<&Conversation> {
        let active_id = self.active_id.as_deref()?;
        self.conversations.iter().find(|c| c.id == active_id)
    }

    /// The most recent assistant message across all conversations.
    #[must_use]
    pub fn last_assistant_message(&self) -> Option<&Message> {
        self.conversations
            .iter()
            .flat_map(|c| c.messages.iter())
            .filter(|m| m.role == Role::Assistant)
            .next_back()
    }

    #[must_use]
    pub fn conversations(&self) -> &[Conversation] {
        &self.conversations
    }

    #[must_use]
    pub fn active_id(&self) -> Option<&str> {
        self.active_id.as_deref()
    }

    #[must_use]
    pub fn last_correlation_id(&self) -> Option<&str> {
        self.last_correlation_id.as_deref()
    }

    pub fn set_last_correlation_id(&mut self, id: String) {
        self.last_correlation_id = Some(id);
    }
}
