// Agent roles
//
// The refinement loop drives three logical agents over the same provider
// interface. Each role is a stateless async text completion: everything it
// knows arrives in the messages built by `prompts`.

pub mod prompts;

use anyhow::Result;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

use crate::config::constants::DEFAULT_MAX_TOKENS;
use crate::config::{Config, MatchMode, RolesConfig};
use crate::errors::RefineError;
use crate::providers::{create_provider, LlmProvider, Message, ProviderRequest};
use crate::refinement::HistoryLedger;

/// Logical agent role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentRole {
    /// Produces a candidate from an instruction
    Generator,
    /// Judges a candidate against the desired output
    Validator,
    /// Writes the next instruction
    Coach,
}

impl AgentRole {
    pub const ALL: [AgentRole; 3] = [AgentRole::Generator, AgentRole::Validator, AgentRole::Coach];

    pub fn as_str(&self) -> &'static str {
        match self {
            AgentRole::Generator => "generator",
            AgentRole::Validator => "validator",
            AgentRole::Coach => "coach",
        }
    }
}

impl fmt::Display for AgentRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Handles to the three agents plus their sampling settings.
///
/// Cheap to share: a server holds one behind an `Arc` and every run borrows it.
/// Nothing in here changes during a run.
pub struct RoleAgents {
    generator: Arc<dyn LlmProvider>,
    validator: Arc<dyn LlmProvider>,
    coach: Arc<dyn LlmProvider>,
    roles: RolesConfig,
    max_tokens: u32,
    match_mode: MatchMode,
}

impl RoleAgents {
    /// Build from three (possibly different) providers with default settings.
    pub fn new(
        generator: Arc<dyn LlmProvider>,
        validator: Arc<dyn LlmProvider>,
        coach: Arc<dyn LlmProvider>,
    ) -> Self {
        Self {
            generator,
            validator,
            coach,
            roles: RolesConfig::default(),
            max_tokens: DEFAULT_MAX_TOKENS,
            match_mode: MatchMode::default(),
        }
    }

    /// All three roles backed by one provider.
    pub fn shared(provider: Arc<dyn LlmProvider>) -> Self {
        Self::new(Arc::clone(&provider), Arc::clone(&provider), provider)
    }

    /// Build from configuration. Fails with `ConfigurationMissing` when no key is set.
    pub fn from_config(config: &Config) -> Result<Self> {
        let provider = create_provider(&config.agent)?;
        Ok(Self::shared(provider)
            .with_roles(config.roles.clone())
            .with_max_tokens(config.agent.max_tokens)
            .with_match_mode(config.refinement.match_mode))
    }

    pub fn with_roles(mut self, roles: RolesConfig) -> Self {
        self.roles = roles;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_match_mode(mut self, match_mode: MatchMode) -> Self {
        self.match_mode = match_mode;
        self
    }

    /// Ask the generator for a candidate.
    pub async fn generate(&self, instruction: &str) -> Result<String, RefineError> {
        self.call(AgentRole::Generator, prompts::generator_messages(instruction))
            .await
    }

    /// Ask the validator for a raw decision over `candidate`.
    pub async fn validate(
        &self,
        candidate: &str,
        desired_output: &str,
    ) -> Result<String, RefineError> {
        self.call(
            AgentRole::Validator,
            prompts::validator_messages(candidate, desired_output),
        )
        .await
    }

    /// Ask the coach for the next instruction.
    pub async fn coach(
        &self,
        candidate: &str,
        desired_output: &str,
        history: &HistoryLedger,
    ) -> Result<String, RefineError> {
        self.call(
            AgentRole::Coach,
            prompts::coach_messages(candidate, desired_output, history, self.match_mode),
        )
        .await
    }

    fn provider(&self, role: AgentRole) -> &Arc<dyn LlmProvider> {
        match role {
            AgentRole::Generator => &self.generator,
            AgentRole::Validator => &self.validator,
            AgentRole::Coach => &self.coach,
        }
    }

    async fn call(&self, role: AgentRole, messages: Vec<Message>) -> Result<String, RefineError> {
        let settings = self.roles.settings(role);
        let mut request = ProviderRequest::new(messages)
            .with_max_tokens(self.max_tokens)
            .with_temperature(self.roles.temperature(role));
        if let Some(model) = &settings.model {
            request = request.with_model(model.clone());
        }

        let provider = self.provider(role);
        tracing::debug!(%role, provider = provider.name(), "Calling agent");

        let response = provider
            .send_message(&request)
            .await
            .map_err(|e| RefineError::agent(role, e))?;

        Ok(response.text)
    }
}
