// Configuration structs

use serde::{Deserialize, Serialize};

use super::constants::*;
use crate::agents::AgentRole;
use crate::errors::{self, RefineError};

/// Top-level configuration, read from `~/.promptgan/config.toml`.
///
/// Every section is optional; missing keys fall back to the constants in
/// `config::constants`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Agent endpoint and credential
    pub agent: AgentConfig,
    /// Per-role sampling knobs
    pub roles: RolesConfig,
    /// Refinement loop settings
    pub refinement: RefinementConfig,
    /// HTTP server settings
    pub server: ServerConfig,
    /// Feature flags
    pub features: FeaturesConfig,
}

/// Connection settings shared by all three agent roles.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// API key for the OpenAI-compatible endpoint
    #[serde(skip_serializing_if = "String::is_empty")]
    pub api_key: String,
    /// Base URL (without `/v1/...`)
    pub base_url: String,
    /// Model used by every role unless the role overrides it
    pub model: String,
    /// Completion budget per call
    pub max_tokens: u32,
    /// HTTP timeout per call
    pub timeout_seconds: u64,
    /// Transport attempts per call, including the first one
    pub transport_attempts: u32,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            timeout_seconds: DEFAULT_REQUEST_TIMEOUT_SECS,
            transport_attempts: DEFAULT_TRANSPORT_ATTEMPTS,
        }
    }
}

/// Sampling overrides for one role.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoleSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RolesConfig {
    pub generator: RoleSettings,
    pub validator: RoleSettings,
    pub coach: RoleSettings,
}

impl RolesConfig {
    pub fn settings(&self, role: AgentRole) -> &RoleSettings {
        match role {
            AgentRole::Generator => &self.generator,
            AgentRole::Validator => &self.validator,
            AgentRole::Coach => &self.coach,
        }
    }

    /// Effective temperature for a role: the override, or the role default.
    pub fn temperature(&self, role: AgentRole) -> f32 {
        self.settings(role).temperature.unwrap_or(match role {
            AgentRole::Generator => GENERATOR_TEMPERATURE,
            AgentRole::Validator => VALIDATOR_TEMPERATURE,
            AgentRole::Coach => COACH_TEMPERATURE,
        })
    }
}

/// How strictly the coach is told to chase the desired output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// Character-level match; the coach reasons about differing characters
    Exact,
    /// Same meaning and shape; wording may drift
    #[default]
    Concept,
}

impl std::str::FromStr for MatchMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "exact" => Ok(Self::Exact),
            "concept" => Ok(Self::Concept),
            other => anyhow::bail!("unknown match mode '{}' (expected exact or concept)", other),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RefinementConfig {
    /// Maximum completed rounds per run
    pub max_attempts: usize,
    /// Instruction used on round 0
    pub initial_instruction: String,
    /// Coaching strategy
    pub match_mode: MatchMode,
}

impl Default for RefinementConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            initial_instruction: DEFAULT_INITIAL_INSTRUCTION.to_string(),
            match_mode: MatchMode::default(),
        }
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (e.g., "127.0.0.1:8000")
    pub bind_address: String,
    /// Maximum accepted request body
    pub body_limit_bytes: usize,
    /// Attach a permissive CORS layer (browser front-ends)
    pub cors_enabled: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: DEFAULT_HTTP_ADDR.to_string(),
            body_limit_bytes: DEFAULT_BODY_LIMIT_BYTES,
            cors_enabled: false,
        }
    }
}

/// Feature flags configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FeaturesConfig {
    /// Enable debug logging for troubleshooting
    pub debug_logging: bool,
}

impl Config {
    /// Validate configuration and return helpful errors.
    ///
    /// A missing API key is reported as `RefineError::ConfigurationMissing`
    /// so callers can downcast and fail before starting any run.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.agent.api_key.trim().is_empty() {
            return Err(RefineError::ConfigurationMissing.into());
        }

        let base_url = &self.agent.base_url;
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            anyhow::bail!(errors::wrap_error_with_suggestion(
                format!("Invalid agent base URL: '{}'", self.agent.base_url),
                "The base URL must start with http:// or https://\n\
                 Example: https://api.openai.com"
            ));
        }

        if self.agent.timeout_seconds == 0 {
            anyhow::bail!("timeout_seconds must be greater than 0");
        }

        if self.agent.transport_attempts == 0 {
            anyhow::bail!("transport_attempts must be at least 1");
        }

        for role in AgentRole::ALL {
            let t = self.roles.temperature(role);
            if !(0.0..=2.0).contains(&t) {
                anyhow::bail!(errors::wrap_error_with_suggestion(
                    format!("{} temperature {} is out of range", role, t),
                    "Temperatures must be between 0.0 and 2.0"
                ));
            }
        }

        if self.refinement.initial_instruction.trim().is_empty() {
            anyhow::bail!("initial_instruction must not be empty");
        }

        if !self.server.bind_address.contains(':') {
            anyhow::bail!(errors::wrap_error_with_suggestion(
                format!("Invalid bind address: '{}'", self.server.bind_address),
                "Bind address should be in format 'IP:PORT'\n\
                 Examples:\n  \
                 • 127.0.0.1:8000\n  \
                 • 0.0.0.0:8080"
            ));
        }

        Ok(())
    }
}
