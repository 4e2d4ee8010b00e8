//! DifyClient - REST implementation of [`ChatBackend`] for the Dify API.
//!
//! Calls the blocking-mode `/chat-messages` endpoint with bearer auth.
//! Configuration priority: explicit [`BackendConfig`] > environment
//! variables (`DIFY_API_KEY`, `DIFY_BASE_URL`, `DIFY_TIMEOUT`).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use colloquy_core::config::BackendConfig;
use colloquy_core::{ColloquyError, Result};

use crate::{ChatBackend, ChatReply, TokenUsage};

/// Actor tag sent with conversational chat calls.
const CHAT_USER: &str = "demo_user";
/// Actor tag sent with one-shot copywriting calls.
const COPY_USER: &str = "marketing_user";
/// Timeout for the lightweight reachability probe.
const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Client for the Dify chat-completion REST API.
#[derive(Debug, Clone)]
pub struct DifyClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl DifyClient {
    /// Creates a client from connection settings.
    ///
    /// The request timeout from the config is installed on the underlying
    /// HTTP client, bounding the single suspension point of the generation
    /// pipeline.
    ///
    /// # Errors
    ///
    /// Returns `Validation` if the settings are incomplete, or
    /// `BackendUnknown` if the HTTP client cannot be constructed.
    pub fn new(config: &BackendConfig) -> Result<Self> {
        config.validate()?;
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|err| ColloquyError::unknown(format!("failed to build HTTP client: {err}")))?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Creates a client from environment variables alone.
    pub fn try_from_env() -> Result<Self> {
        let mut config = BackendConfig::default();
        config.apply_env();
        Self::new(&config)
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn send_chat_message(
        &self,
        query: &str,
        conversation_id: Option<&str>,
        user: &str,
    ) -> Result<ChatReply> {
        let request = ChatMessageRequest {
            inputs: serde_json::Map::new(),
            query,
            response_mode: "blocking",
            user,
            conversation_id,
        };

        let response = self
            .client
            .post(self.endpoint("chat-messages"))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(classify_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(%status, "chat-messages call failed");
            return Err(ColloquyError::unavailable(format!(
                "backend answered with status {status}: {}",
                truncate(&body, 200)
            )));
        }

        let parsed: ChatMessageResponse = response.json().await.map_err(|err| {
            ColloquyError::unknown(format!("failed to decode backend response: {err}"))
        })?;

        tracing::info!(message_id = ?parsed.message_id, "chat-messages call succeeded");

        Ok(ChatReply {
            content: parsed.answer,
            conversation_id: parsed.conversation_id,
            message_id: parsed.message_id,
            usage: parsed.metadata.and_then(|m| m.usage),
        })
    }
}

#[async_trait]
impl ChatBackend for DifyClient {
    async fn chat(&self, query: &str, conversation_id: Option<&str>) -> Result<ChatReply> {
        self.send_chat_message(query, conversation_id, CHAT_USER).await
    }

    async fn generate(&self, prompt: &str) -> Result<ChatReply> {
        self.send_chat_message(prompt, None, COPY_USER).await
    }

    async fn check_connection(&self) -> bool {
        let result = self
            .client
            .get(self.endpoint("info"))
            .bearer_auth(&self.api_key)
            .timeout(PROBE_TIMEOUT)
            .send()
            .await;

        match result {
            Ok(response) => response.status().is_success(),
            Err(err) => {
                tracing::warn!("connection probe failed: {err}");
                false
            }
        }
    }
}

/// Maps a transport-level failure onto the shared error kinds.
fn classify_transport_error(err: reqwest::Error) -> ColloquyError {
    if err.is_timeout() {
        ColloquyError::BackendTimeout
    } else if err.is_connect() || err.is_request() {
        ColloquyError::unavailable(err.to_string())
    } else {
        ColloquyError::unknown(err.to_string())
    }
}

fn truncate(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[derive(Serialize)]
struct ChatMessageRequest<'a> {
    inputs: serde_json::Map<String, serde_json::Value>,
    query: &'a str,
    response_mode: &'a str,
    user: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    conversation_id: Option<&'a str>,
}

#[derive(Deserialize)]
struct ChatMessageResponse {
    #[serde(default)]
    answer: String,
    #[serde(default)]
    conversation_id: Option<String>,
    #[serde(default)]
    message_id: Option<String>,
    #[serde(default)]
    metadata: Option<ResponseMetadata>,
}

#[derive(Deserialize)]
struct ResponseMetadata {
    #[serde(default)]
    usage: Option<TokenUsage>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> BackendConfig {
        BackendConfig {
            api_key: "app-test".to_string(),
            base_url: "https://api.dify.test/v1/".to_string(),
            timeout_secs: 30,
        }
    }

    #[test]
    fn test_request_payload_shape() {
        let request = ChatMessageRequest {
            inputs: serde_json::Map::new(),
            query: "Hello",
            response_mode: "blocking",
            user: CHAT_USER,
            conversation_id: None,
        };
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(value["query"], "Hello");
        assert_eq!(value["response_mode"], "blocking");
        assert_eq!(value["user"], "demo_user");
        assert_eq!(value["inputs"], serde_json::json!({}));
        assert!(value.get("conversation_id").is_none());
    }

    #[test]
    fn test_request_payload_carries_conversation_id() {
        let request = ChatMessageRequest {
            inputs: serde_json::Map::new(),
            query: "Hello again",
            response_mode: "blocking",
            user: CHAT_USER,
            conversation_id: Some("conv-1"),
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["conversation_id"], "conv-1");
    }

    #[test]
    fn test_response_decodes_with_usage() {
        let raw = r#"{
            "answer": "Hi there",
            "conversation_id": "conv-1",
            "message_id": "msg-1",
            "metadata": { "usage": { "prompt_tokens": 12, "completion_tokens": 7, "total_tokens": 19, "total_price": "0.0004" } }
        }"#;
        let parsed: ChatMessageResponse = serde_json::from_str(raw).unwrap();
        let usage = parsed.metadata.unwrap().usage.unwrap();

        assert_eq!(parsed.answer, "Hi there");
        assert_eq!(usage.total_tokens, Some(19));
        assert_eq!(usage.total_price.as_deref(), Some("0.0004"));
    }

    #[test]
    fn test_response_decodes_without_metadata() {
        let raw = r#"{ "answer": "Hi there" }"#;
        let parsed: ChatMessageResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.answer, "Hi there");
        assert!(parsed.conversation_id.is_none());
        assert!(parsed.metadata.is_none());
    }

    #[test]
    fn test_base_url_trailing_slash_is_normalized() {
        let client = DifyClient::new(&test_config()).unwrap();
        assert_eq!(
            client.endpoint("chat-messages"),
            "https://api.dify.test/v1/chat-messages"
        );
    }

    #[test]
    fn test_new_rejects_incomplete_config() {
        let config = BackendConfig::default();
        assert!(DifyClient::new(&config).unwrap_err().is_validation());
    }
}
