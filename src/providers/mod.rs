// Agent client providers
//
// The refinement core talks to its three agents through `LlmProvider`.
// Any OpenAI-compatible chat endpoint works; tests substitute scripted providers.

use anyhow::Result;
use async_trait::async_trait;

pub mod factory;
pub mod openai;
pub mod retry;
pub mod types;

pub use factory::create_provider;
pub use openai::OpenAIProvider;
pub use types::{Message, ProviderRequest, ProviderResponse};

/// Trait for LLM providers
///
/// A provider turns one request into one complete text response.
/// Implementations must not keep conversational state between calls.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Send a message and get a complete response
    async fn send_message(&self, request: &ProviderRequest) -> Result<ProviderResponse>;

    /// Get the provider name (e.g., "openai")
    fn name(&self) -> &str;

    /// Get the default model for this provider
    fn default_model(&self) -> &str;
}
