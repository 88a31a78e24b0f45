use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::Client;
use serde::Serialize;
use tracing::{debug, info, warn};

use kokoro_core::{
    FileUploader, FragmentSink, StreamingProvider, TurnRequest, UploadedFile, correlation, text,
};

use crate::sse;

/// Client for the chat service's streaming and upload endpoints.
#[derive(Clone)]
pub struct GptAiClient {
    client: Client,
    base_url: String,
    token: String,
}

/// Body of the streaming request, in the service's wire shape.
#[derive(Serialize)]
struct StreamRequestBody<'a> {
    #[serde(rename = "fileList")]
    file_list: &'a [UploadedFile],
    msg: &'a str,
    #[serde(rename = "requestId")]
    request_id: String,
}

impl GptAiClient {
    pub fn new(base_url: String, token: String) -> Self {
        info!("Creating GptAiClient for {base_url}");
        Self {
            client: Client::new(),
            base_url,
            token,
        }
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }
}

#[async_trait]
impl StreamingProvider for GptAiClient {
    async fn stream_turn(
        &self,
        request: &TurnRequest,
        correlation_id: &str,
        on_fragment: FragmentSink<'_>,
    ) -> anyhow::Result<Option<String>> {
        let body = StreamRequestBody {
            file_list: &request.attachments,
            msg: &request.content,
            request_id: correlation::request_token(correlation_id),
        };

        debug!("Opening stream with requestId={}", body.request_id);

        let response = self
            .client
            .post(format!("{}/chat/sendStream", self.base_url))
            .header("token", &self.token)
            .json(&body)
            .send()
            .await?
            .error_for_status()?;

        let mut accumulated = String::new();
        let mut last_event_id = String::new();
        let mut buffer = String::new();
        let mut stream = response.bytes_stream();

        while let Some(chunk) = stream.next().await {
            let bytes = chunk.map_err(|e| anyhow::anyhow!("Error reading stream: {e}"))?;
            buffer.push_str(&String::from_utf8_lossy(&bytes));

            drain_records(
                &mut buffer,
                &mut accumulated,
                &mut last_event_id,
                correlation_id,
                &mut *on_fragment,
            );
        }

        if accumulated.is_empty() {
            debug!("Stream closed without content");
            return Ok(None);
        }

        let finalized = text::finalize(&accumulated);
        on_fragment(&finalized, correlation_id);

        debug!("Stream closed, last event id: {last_event_id:?}");
        Ok(Some(correlation::mint(&last_event_id)))
    }
}

/// Apply every complete record in `buffer` to the running reply.
///
/// A single bad event must not kill an otherwise-healthy exchange, so
/// malformed records are logged and skipped. The event id is only captured
/// from events that carry a non-empty payload; a trailing keep-alive with
/// an id must not shift the minted continuation id.
fn drain_records(
    buffer: &mut String,
    accumulated: &mut String,
    last_event_id: &mut String,
    correlation_id: &str,
    on_fragment: FragmentSink<'_>,
) {
    while let Some(record) = sse::next_record(buffer) {
        match sse::parse_record(&record) {
            Ok(event) => {
                let Some(data) = event.data else { continue };
                if data.is_empty() {
                    continue;
                }
                if let Some(id) = event.id {
                    *last_event_id = id;
                }
                *accumulated = text::merge(accumulated, &data);
                on_fragment(accumulated, correlation_id);
            }
            Err(e) => warn!("Skipping malformed stream event: {e}"),
        }
    }
}

#[async_trait]
impl FileUploader for GptAiClient {
    async fn upload(&self, file_name: &str, bytes: Vec<u8>) -> anyhow::Result<UploadedFile> {
        let part = reqwest::multipart::Part::bytes(bytes).file_name(file_name.to_string());
        let form = reqwest::multipart::Form::new().part("file", part);

        info!("Uploading file: {file_name}");

        let response = self
            .client
            .post(format!("{}/file/uploadFile", self.base_url))
            .header("token", &self.token)
            .multipart(form)
            .send()
            .await?
            .error_for_status()?
            .json::<serde_json::Value>()
            .await?;

        let file = serde_json::from_value::<UploadedFile>(response["data"].clone())
            .map_err(|e| anyhow::anyhow!("Invalid upload response format: {e}"))?;

        Ok(file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kokoro_core::MediaKind;

    #[test]
    fn stream_body_uses_wire_field_names() {
        let files = vec![UploadedFile {
            file_url: "https://cdn.example/voice.mp3".to_string(),
            file_type: MediaKind::Audio,
        }];
        let body = StreamRequestBody {
            file_list: &files,
            msg: "hello",
            request_id: "evt-1".to_string(),
        };

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["msg"], "hello");
        assert_eq!(json["requestId"], "evt-1");
        assert_eq!(json["fileList"][0]["fileUrl"], "https://cdn.example/voice.mp3");
        assert_eq!(json["fileList"][0]["fileType"], "3");
    }

    #[test]
    fn malformed_event_does_not_abort_the_exchange() {
        let mut buffer = "data: a\n\ngarbage without colon\n\ndata: b\n\n".to_string();
        let mut accumulated = String::new();
        let mut last_event_id = String::new();
        let mut seen: Vec<String> = Vec::new();
        let mut sink = |text: &str, _cid: &str| seen.push(text.to_string());

        drain_records(&mut buffer, &mut accumulated, &mut last_event_id, "cid", &mut sink);

        assert_eq!(accumulated, "a b");
        assert_eq!(seen, vec!["a", "a b"]);
        assert!(buffer.is_empty());
    }

    #[test]
    fn keepalive_id_without_payload_does_not_shift_continuation() {
        let mut buffer = "id: evt-1\ndata: hello\n\nid: evt-2\ndata:\n\nid: evt-3\n\n".to_string();
        let mut accumulated = String::new();
        let mut last_event_id = String::new();
        let mut sink = |_: &str, _: &str| {};

        drain_records(&mut buffer, &mut accumulated, &mut last_event_id, "cid", &mut sink);

        assert_eq!(accumulated, "hello");
        assert_eq!(last_event_id, "evt-1");
    }

    #[test]
    fn upload_response_data_parses() {
        let response: serde_json::Value = serde_json::json!({
            "code": 200,
            "data": { "fileUrl": "https://cdn.example/a.png", "fileType": "1" }
        });
        let file = serde_json::from_value::<UploadedFile>(response["data"].clone()).unwrap();
        assert_eq!(file.file_url, "https://cdn.example/a.png");
        assert_eq!(file.file_type, MediaKind::Image);
    }
}
