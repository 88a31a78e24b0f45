//! Turn orchestration: one streamed exchange from user input to committed
//! assistant reply.

use thiserror::Error;
use tracing::{debug, info, warn};

use kokoro_core::{
    Attachment, FileUploader, Message, StreamingProvider, TurnRequest, UploadedFile, correlation,
};

use crate::locale::Locale;
use crate::store::ConversationStore;
use crate::triggers::mentions_counselling_topic;

/// Rejections surfaced before any network call is made.
#[derive(Debug, Error)]
pub enum TurnError {
    #[error("A reply is still streaming. Please wait for it to finish.")]
    StreamInProgress,

    #[error("A file upload is in progress. Please wait for it to finish.")]
    UploadInProgress,
}

/// Result of one processed turn.
///
/// A transport failure is not an error at this level: the conversation
/// then carries exactly one localized error message and `failed` is set.
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    /// Final assistant text committed to the store (or the error notice).
    pub response: String,
    /// Whether the user's text matched the specialist trigger vocabulary.
    pub show_specialists: bool,
    pub failed: bool,
}

/// Drives one turn at a time against a streaming provider, owning the
/// conversation store and the mutual-exclusion gates.
///
/// The store is only mutated between suspension points of a single
/// in-flight turn, so fragments land in arrival order without locking.
pub struct TurnManager<P> {
    provider: P,
    store: ConversationStore,
    locale: Locale,
    streaming: bool,
    uploading: bool,
    show_specialists: bool,
}

impl<P> TurnManager<P>
where
    P: StreamingProvider,
{
    #[must_use]
    pub const fn new(provider: P, store: ConversationStore, locale: Locale) -> Self {
        Self {
            provider,
            store,
            locale,
            streaming: false,
            uploading: false,
            show_specialists: false,
        }
    }

    /// Make sure some conversation is active, creating a seeded one when
    /// none is (app start with empty state).
    pub fn ensure_active_conversation(&mut self) {
        self.active_or_created_conversation_id();
    }

    /// Start a fresh conversation and make it active.
    pub fn new_conversation(&mut self) {
        self.store
            .create_conversation(self.locale.default_title(), self.locale.greeting());
    }

    /// Id of the active conversation, creating a seeded one on demand.
    fn active_or_created_conversation_id(&mut self) -> String {
        if let Some(conversation) = self.store.active_conversation() {
            return conversation.id.clone();
        }
        self.store
            .create_conversation(self.locale.default_title(), self.locale.greeting())
            .id
            .clone()
    }

    /// Process one user turn end to end.
    ///
    /// `on_update` is called with the accumulated assistant text after
    /// every committed fragment, which lets a frontend render progress.
    pub async fn process_turn_with(
        &mut self,
        request: TurnRequest,
        mut on_update: impl FnMut(&str) + Send,
    ) -> Result<TurnOutcome, TurnError> {
        if self.streaming {
            return Err(TurnError::StreamInProgress);
        }
        if self.uploading {
            return Err(TurnError::UploadInProgress);
        }

        let conversation_id = self.active_or_created_conversation_id();

        let attachments: Vec<Attachment> = request
            .attachments
            .iter()
            .cloned()
            .map(Attachment::from)
            .collect();
        self.store.upsert_message(
            &conversation_id,
            Message::user(request.content.clone(), attachments),
            false,
        );

        // Continue the last closed exchange when one exists, otherwise
        // start a new server-side request. The seeded greeting's
        // correlation id is never continued: its id doubles as the
        // greeting's message id, and reusing it would replace the
        // greeting in place.
        let correlation_id = self
            .store
            .last_correlation_id()
            .map_or_else(correlation::fresh, ToOwned::to_owned);

        // One message id for the whole turn; every fragment replaces the
        // same record.
        let assistant_id = correlation_id.clone();

        debug!("Starting turn with correlation id {correlation_id}");

        self.streaming = true;
        let mut latest = String::new();
        let result = {
            let provider = &self.provider;
            let store = &mut self.store;
            let mut on_fragment = |text: &str, cid: &str| {
                latest.clear();
                latest.push_str(text);
                store.upsert_message(
                    &conversation_id,
                    Message::assistant(
                        assistant_id.clone(),
                        text.to_string(),
                        Some(cid.to_string()),
                    ),
                    true,
                );
                on_update(text);
            };
            provider
                .stream_turn(&request, &correlation_id, &mut on_fragment)
                .await
        };
        self.streaming = false;

        match result {
            Ok(next_correlation) => {
                if let Some(next) = next_correlation {
                    self.store.set_last_correlation_id(next);
                }

                let show_specialists = mentions_counselling_topic(&request.content);
                if show_specialists {
                    info!("Specialist trigger matched");
                    self.show_specialists = true;
                }

                Ok(TurnOutcome {
                    response: latest,
                    show_specialists,
                    failed: false,
                })
            }
            Err(e) => {
                warn!("Turn failed: {e}");
                let notice = self.locale.turn_error().to_string();
                // Exactly one terminal error message per failed turn,
                // replacing any partial text under the same id.
                self.store.upsert_message(
                    &conversation_id,
                    Message::assistant(assistant_id, notice.clone(), Some(correlation_id)),
                    true,
                );

                Ok(TurnOutcome {
                    response: notice,
                    show_specialists: false,
                    failed: true,
                })
            }
        }
    }

    /// [`Self::process_turn_with`] without a progress callback.
    pub async fn process_turn(&mut self, request: TurnRequest) -> Result<TurnOutcome, TurnError> {
        self.process_turn_with(request, |_| {}).await
    }

    /// Upload files one by one, keeping whatever succeeded.
    ///
    /// Failures are logged and skipped; the turn proceeds with the
    /// successful uploads.
    pub async fn upload_attachments<U: FileUploader>(
        &mut self,
        uploader: &U,
        files: Vec<(String, Vec<u8>)>,
    ) -> Result<Vec<UploadedFile>, TurnError> {
        if self.streaming {
            return Err(TurnError::StreamInProgress);
        }
        if self.uploading {
            return Err(TurnError::UploadInProgress);
        }

        self.uploading = true;
        let mut uploaded = Vec::new();
        for (name, bytes) in files {
            match uploader.upload(&name, bytes).await {
                Ok(file) => uploaded.push(file),
                Err(e) => warn!("Upload of {name} failed: {e}"),
            }
        }
        self.uploading = false;

        Ok(uploaded)
    }

    #[must_use]
    pub const fn store(&self) -> &ConversationStore {
        &self.store
    }

    #[must_use]
    pub fn store_mut(&mut self) -> &mut ConversationStore {
        &mut self.store
    }

    #[must_use]
    pub fn into_store(self) -> ConversationStore {
        self.store
    }

    #[must_use]
    pub const fn locale(&self) -> Locale {
        self.locale
    }

    /// Whether a successful turn has flagged specialist recommendations.
    #[must_use]
    pub const fn show_specialists(&self) -> bool {
        self.show_specialists
    }

    pub const fn dismiss_specialists(&mut self) {
        self.show_specialists = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use kokoro_core::{FragmentSink, text};

    struct ScriptedProvider {
        fragments: Vec<&'static str>,
        fail: bool,
    }

    #[async_trait]
    impl StreamingProvider for ScriptedProvider {
        async fn stream_turn(
            &self,
            _request: &TurnRequest,
            correlation_id: &str,
            on_fragment: FragmentSink<'_>,
        ) -> anyhow::Result<Option<String>> {
            if self.fail {
                anyhow::bail!("connection refused");
            }

            let mut accumulated = String::new();
            for fragment in &self.fragments {
                accumulated = text::merge(&accumulated, fragment);
                on_fragment(&accumulated, correlation_id);
            }
            if accumulated.is_empty() {
                return Ok(None);
            }
            let finalized = text::finalize(&accumulated);
            on_fragment(&finalized, correlation_id);
            Ok(Some(correlation::mint("evt-test")))
        }
    }

    fn manager(provider: ScriptedProvider) -> TurnManager<ScriptedProvider> {
        TurnManager::new(provider, ConversationStore::new(), Locale::En)
    }

    #[test]
    fn ensure_active_conversation_bootstraps_exactly_once() {
        let mut manager = manager(ScriptedProvider {
            fragments: vec![],
            fail: false,
        });
        assert!(manager.store().active_conversation().is_none());

        manager.ensure_active_conversation();
        let conversation = manager.store().active_conversation().unwrap();
        let id = conversation.id.clone();
        assert_eq!(conversation.messages[0].content, Locale::En.greeting());

        manager.ensure_active_conversation();
        assert_eq!(manager.store().conversations().len(), 1);
        assert_eq!(manager.store().active_conversation().unwrap().id, id);
    }

    #[tokio::test]
    async fn busy_guards_reject_before_any_work() {
        let mut manager = manager(ScriptedProvider {
            fragments: vec!["hi"],
            fail: false,
        });
        manager.ensure_active_conversation();
        let messages_before = manager.store().active_conversation().unwrap().message_count();

        manager.streaming = true;
        let err = manager.process_turn(TurnRequest::new("hello")).await.unwrap_err();
        assert!(matches!(err, TurnError::StreamInProgress));

        manager.streaming = false;
        manager.uploading = true;
        let err = manager.process_turn(TurnRequest::new("hello")).await.unwrap_err();
        assert!(matches!(err, TurnError::UploadInProgress));

        // No user message was appended by either rejection.
        assert_eq!(
            manager.store().active_conversation().unwrap().message_count(),
            messages_before
        );
    }

    #[tokio::test]
    async fn failed_turn_commits_single_error_notice() {
        let mut manager = manager(ScriptedProvider {
            fragments: vec![],
            fail: true,
        });

        let outcome = manager.process_turn(TurnRequest::new("hello")).await.unwrap();
        assert!(outcome.failed);
        assert_eq!(outcome.response, Locale::En.turn_error());

        let conversation = manager.store().active_conversation().unwrap();
        // Seed greeting + user + one error notice.
        assert_eq!(conversation.message_count(), 3);
        assert_eq!(conversation.messages[2].content, Locale::En.turn_error());
    }

    #[tokio::test]
    async fn specialist_flag_set_only_on_trigger_match() {
        let mut manager = manager(ScriptedProvider {
            fragments: vec!["take", " care"],
            fail: false,
        });

        let outcome = manager
            .process_turn(TurnRequest::new("my anxiety is getting worse"))
            .await
            .unwrap();
        assert!(outcome.show_specialists);
        assert!(manager.show_specialists());

        manager.dismiss_specialists();
        let outcome = manager.process_turn(TurnRequest::new("tell me a story")).await.unwrap();
        assert!(!outcome.show_specialists);
        assert!(!manager.show_specialists());
    }

    #[tokio::test]
    async fn next_correlation_id_is_stored_for_continuation() {
        let mut manager = manager(ScriptedProvider {
            fragments: vec!["ok"],
            fail: false,
        });

        manager.process_turn(TurnRequest::new("hello")).await.unwrap();
        let stored = manager.store().last_correlation_id().unwrap().to_string();
        assert!(stored.starts_with("evt-test___"));
        assert_eq!(correlation::request_token(&stored), "evt-test");
    }

    #[tokio::test]
    async fn progress_callback_sees_monotonic_snapshots() {
        let mut manager = manager(ScriptedProvider {
            fragments: vec!["I ", "understand."],
            fail: false,
        });

        let mut seen: Vec<String> = Vec::new();
        manager
            .process_turn_with(TurnRequest::new("hello"), |text| seen.push(text.to_string()))
            .await
            .unwrap();

        assert_eq!(seen, vec!["I ", "I understand.", "I understand."]);
    }
}
