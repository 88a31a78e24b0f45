#![warn(
    clippy::all,
    clippy::nursery,
    clippy::pedantic,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::correctness,
    clippy::suspicious,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(
    clippy::similar_names,
    clippy::missing_safety_doc,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc
)]

//! Shared types and trait seams for the kokoro chat client.
//!
//! This crate defines the message/attachment data model, the correlation-id
//! scheme that ties a user turn to its streamed reply, the fragment
//! accumulator, and the provider traits implemented by the remote clients.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod correlation;
pub mod text;

/// Who authored a message.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// Media kind of an uploaded file, serialized as the wire codes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum MediaKind {
    #[serde(rename = "1")]
    Image,
    #[serde(rename = "2")]
    Video,
    #[serde(rename = "3")]
    Audio,
}

/// A file attached to a message, as stored in the conversation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Attachment {
    pub url: String,
    pub kind: MediaKind,
}

/// One entry in a conversation's message sequence.
///
/// Identity is `id`; replace-semantics in the store rely on `id` being
/// unique within a conversation. `correlation_id` ties an assistant message
/// to the exchange that produced it and stays stable across all partial
/// updates of that exchange.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<String>,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
}

impl Message {
    /// Create a user message with a fresh id.
    #[must_use]
    pub fn user(content: String, attachments: Vec<Attachment>) -> Self {
        Self {
            id: uuid::Uuid::now_v7().to_string(),
            role: Role::User,
            content,
            timestamp: Utc::now(),
            correlation_id: None,
            attachments,
        }
    }

    /// Create an assistant message under an explicit id.
    ///
    /// Streamed replies reuse one id across all partial updates so the
    /// store can replace the record in place.
    #[must_use]
    pub fn assistant(id: String, content: String, correlation_id: Option<String>) -> Self {
        Self {
            id,
            role: Role::Assistant,
            content,
            timestamp: Utc::now(),
            correlation_id,
            attachments: Vec::new(),
        }
    }
}

/// A successfully uploaded file, in the shape the remote service returns
/// and expects back in the next streaming request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UploadedFile {
    #[serde(rename = "fileUrl")]
    pub file_url: String,
    #[serde(rename = "fileType")]
    pub file_type: MediaKind,
}

impl From<UploadedFile> for Attachment {
    fn from(file: UploadedFile) -> Self {
        Self {
            url: file.file_url,
            kind: file.file_type,
        }
    }
}

/// The user-authored half of one turn: text plus any uploaded files.
#[derive(Debug, Clone, Default)]
pub struct TurnRequest {
    pub content: String,
    pub attachments: Vec<UploadedFile>,
}

impl TurnRequest {
    #[must_use]
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            attachments: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_attachments(mut self, attachments: Vec<UploadedFile>) -> Self {
        self.attachments = attachments;
        self
    }
}

/// Callback invoked with `(accumulated_text, correlation_id)` after every
/// applied fragment, and exactly once more with the finalized text when the
/// stream closes.
pub type FragmentSink<'a> = &'a mut (dyn FnMut(&str, &str) + Send);

/// A remote endpoint that streams an assistant reply for one user turn.
#[async_trait]
pub trait StreamingProvider: Send + Sync {
    /// Open one streaming request and feed fragments to `on_fragment`.
    ///
    /// Fragments are applied strictly in arrival order; `on_fragment`
    /// returns before the next server event is read. On a clean close with
    /// accumulated text, returns the correlation id for the next turn.
    /// Transport failures propagate as errors; there is no retry.
    async fn stream_turn(
        &self,
        request: &TurnRequest,
        correlation_id: &str,
        on_fragment: FragmentSink<'_>,
    ) -> anyhow::Result<Option<String>>;
}

/// A remote endpoint that accepts one file per request.
#[async_trait]
pub trait FileUploader: Send + Sync {
    async fn upload(&self, file_name: &str, bytes: Vec<u8>) -> anyhow::Result<UploadedFile>;
}
