// Provider factory
//
// Creates the agent client from configuration

use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;

use super::openai::OpenAIProvider;
use super::retry::RetryPolicy;
use super::LlmProvider;
use crate::config::AgentConfig;
use crate::errors::RefineError;

/// Create the shared `LlmProvider` described by `[agent]`.
///
/// All three roles can share one provider because providers are stateless;
/// per-role temperature and model travel on each request.
pub fn create_provider(config: &AgentConfig) -> Result<Arc<dyn LlmProvider>> {
    if config.api_key.trim().is_empty() {
        return Err(RefineError::ConfigurationMissing.into());
    }

    let provider = OpenAIProvider::new(
        config.api_key.clone(),
        config.base_url.clone(),
        config.model.clone(),
        Duration::from_secs(config.timeout_seconds),
    )?
    .with_retry_policy(RetryPolicy::new(config.transport_attempts));

    tracing::debug!(
        base_url = %config.base_url,
        model = %config.model,
        "Created agent provider"
    );

    Ok(Arc::new(provider))
}
