// OpenAI-compatible chat completions provider
//
// Works for OpenAI itself and any server exposing `/v1/chat/completions`
// (Azure-style gateways, local inference servers, test doubles).

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::retry::{with_retry, ApiStatusError, RetryPolicy};
use super::types::{Message, ProviderRequest, ProviderResponse};
use super::LlmProvider;
use crate::config::constants::{DEFAULT_BASE_URL, DEFAULT_MODEL, DEFAULT_REQUEST_TIMEOUT_SECS};

/// OpenAI API provider
#[derive(Clone)]
pub struct OpenAIProvider {
    client: Client,
    api_key: String,
    base_url: String,
    default_model: String,
    provider_name: String,
    retry: RetryPolicy,
}

impl OpenAIProvider {
    /// Create a provider for api.openai.com
    pub fn new_openai(api_key: String) -> Result<Self> {
        Self::new(
            api_key,
            DEFAULT_BASE_URL.to_string(),
            DEFAULT_MODEL.to_string(),
            Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        )
    }

    /// Create a provider with custom settings
    pub fn new(
        api_key: String,
        base_url: String,
        default_model: String,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            default_model,
            provider_name: "openai".to_string(),
            retry: RetryPolicy::default(),
        })
    }

    /// Set custom model for this provider
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.default_model = model.into();
        self
    }

    /// Set the transport retry policy
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    fn to_openai_request(&self, request: &ProviderRequest) -> OpenAIRequest {
        let model = if request.model.is_empty() {
            self.default_model.clone()
        } else {
            request.model.clone()
        };

        OpenAIRequest {
            model,
            messages: request.messages.clone(),
            max_tokens: Some(request.max_tokens),
            temperature: request.temperature,
        }
    }

    fn from_openai_response(&self, response: OpenAIResponse) -> Result<ProviderResponse> {
        let choice = response
            .choices
            .into_iter()
            .next()
            .context("OpenAI returned no choices in response")?;

        Ok(ProviderResponse {
            id: response.id,
            model: response.model,
            text: choice.message.content.unwrap_or_default(),
            stop_reason: choice.finish_reason,
            provider: self.provider_name.clone(),
        })
    }

    /// Send a single request (no retry)
    async fn send_message_once(&self, request: &ProviderRequest) -> Result<ProviderResponse> {
        let openai_request = self.to_openai_request(request);
        let url = format!("{}/v1/chat/completions", self.base_url);

        tracing::debug!(
            model = %openai_request.model,
            temperature = ?openai_request.temperature,
            messages = openai_request.messages.len(),
            "Sending chat completion request"
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&openai_request)
            .send()
            .await
            .context("Failed to send request to OpenAI API")?;

        let status = response.status();

        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(ApiStatusError {
                provider: self.provider_name.clone(),
                status: status.as_u16(),
                body: error_body,
            }
            .into());
        }

        let openai_response: OpenAIResponse = response
            .json()
            .await
            .context("Failed to parse OpenAI API response")?;

        self.from_openai_response(openai_response)
    }
}

#[async_trait]
impl LlmProvider for OpenAIProvider {
    async fn send_message(&self, request: &ProviderRequest) -> Result<ProviderResponse> {
        with_retry(self.retry, || self.send_message_once(request)).await
    }

    fn name(&self) -> &str {
        &self.provider_name
    }

    fn default_model(&self) -> &str {
        &self.default_model
    }
}

// OpenAI API types

#[derive(Debug, Clone, Serialize)]
struct OpenAIRequest {
    model: String,
    messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Clone, Deserialize)]
struct OpenAIResponse {
    #[serde(default)]
    id: String,
    #[serde(default)]
    model: String,
    choices: Vec<OpenAIChoice>,
}

#[derive(Debug, Clone, Deserialize)]
struct OpenAIChoice {
    message: OpenAIResponseMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct OpenAIResponseMessage {
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    fn provider_for(server: &mockito::ServerGuard) -> OpenAIProvider {
        OpenAIProvider::new(
            "sk-test".to_string(),
            server.url(),
            "gpt-test".to_string(),
            Duration::from_secs(5),
        )
        .unwrap()
        .with_retry_policy(RetryPolicy::none())
    }

    fn completion(text: &str) -> String {
        json!({
            "id": "chatcmpl-1",
            "model": "gpt-test",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": text},
                "finish_reason": "stop"
            }]
        })
        .to_string()
    }

    #[test]
    fn test_openai_provider_creation() {
        let provider = OpenAIProvider::new_openai("test-key".to_string()).unwrap();
        assert_eq!(provider.name(), "openai");
        assert_eq!(provider.default_model(), DEFAULT_MODEL);
    }

    #[test]
    fn test_request_uses_default_model_when_empty() {
        let provider = OpenAIProvider::new_openai("k".to_string())
            .unwrap()
            .with_model("gpt-custom");
        let req = provider.to_openai_request(&ProviderRequest::new(vec![Message::user("x")]));
        assert_eq!(req.model, "gpt-custom");

        let req = provider.to_openai_request(
            &ProviderRequest::new(vec![Message::user("x")]).with_model("override"),
        );
        assert_eq!(req.model, "override");
    }

    #[tokio::test]
    async fn test_send_message_parses_completion() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/chat/completions")
            .match_header("authorization", "Bearer sk-test")
            .match_body(Matcher::PartialJson(json!({
                "model": "gpt-test",
                "temperature": 0.0,
                "messages": [{"role": "user", "content": "ping"}]
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(completion("pong"))
            .create_async()
            .await;

        let provider = provider_for(&server);
        let request = ProviderRequest::new(vec![Message::user("ping")]).with_temperature(0.0);
        let response = provider.send_message(&request).await.unwrap();

        mock.assert_async().await;
        assert_eq!(response.text(), "pong");
        assert_eq!(response.stop_reason.as_deref(), Some("stop"));
        assert_eq!(response.provider, "openai");
    }

    #[tokio::test]
    async fn test_send_message_surfaces_http_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/v1/chat/completions")
            .with_status(401)
            .with_body(r#"{"error":{"message":"bad key"}}"#)
            .create_async()
            .await;

        let provider = provider_for(&server);
        let err = provider
            .send_message(&ProviderRequest::new(vec![Message::user("ping")]))
            .await
            .unwrap_err();

        let msg = format!("{:#}", err);
        assert!(msg.contains("401"), "unexpected error: {msg}");
        assert!(msg.contains("bad key"), "unexpected error: {msg}");
    }

    #[tokio::test]
    async fn test_rejected_key_is_not_retried() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/chat/completions")
            .with_status(401)
            .with_body(r#"{"error":{"message":"bad key"}}"#)
            .expect(1)
            .create_async()
            .await;

        let provider = provider_for(&server)
            .with_retry_policy(RetryPolicy::new(3).with_base_delay(Duration::from_millis(1)));
        let err = provider
            .send_message(&ProviderRequest::new(vec![Message::user("ping")]))
            .await
            .unwrap_err();

        mock.assert_async().await;
        let status = err.downcast_ref::<ApiStatusError>().map(|e| e.status);
        assert_eq!(status, Some(401));
    }

    #[tokio::test]
    async fn test_send_message_rejects_empty_choices() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/v1/chat/completions")
            .with_status(200)
            .with_body(r#"{"id":"x","model":"m","choices":[]}"#)
            .create_async()
            .await;

        let provider = provider_for(&server);
        let err = provider
            .send_message(&ProviderRequest::new(vec![Message::user("ping")]))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("no choices"));
    }

    #[tokio::test]
    async fn test_transport_retry_exhausts_attempts() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/chat/completions")
            .with_status(503)
            .expect(2)
            .create_async()
            .await;

        let provider = provider_for(&server)
            .with_retry_policy(RetryPolicy::new(2).with_base_delay(Duration::from_millis(1)));
        let result = provider
            .send_message(&ProviderRequest::new(vec![Message::user("ping")]))
            .await;

        assert!(result.is_err());
        mock.assert_async().await;
    }
}
