// Error types for a refinement run
//
// Collaborator layers (config loading, HTTP client, CLI) use anyhow with context;
// the refinement core surfaces the conditions a caller has to tell apart.

use thiserror::Error;

use crate::agents::AgentRole;

/// Fatal conditions for a refinement run.
///
/// Expected terminal outcomes (budget exhausted, validator-reported error,
/// unrecognized action) are not errors; they are `RefineOutcome` variants.
#[derive(Debug, Error)]
pub enum RefineError {
    /// No agent credential was configured. Raised before any round executes.
    #[error("agent API key is not configured (set OPENAI_API_KEY or [agent].api_key)")]
    ConfigurationMissing,

    /// The validator reply could not be read as a decision record.
    #[error("validator returned a malformed decision: {reason}")]
    MalformedDecision { reason: String, raw: String },

    /// An agent call failed at the transport level.
    #[error("{role} agent call failed")]
    Agent {
        role: AgentRole,
        #[source]
        source: anyhow::Error,
    },
}

impl RefineError {
    pub(crate) fn agent(role: AgentRole, source: anyhow::Error) -> Self {
        Self::Agent { role, source }
    }

    /// Whether the run failed because of a protocol violation rather than
    /// infrastructure. Callers report these the same way as a null result.
    pub fn is_protocol_failure(&self) -> bool {
        matches!(self, Self::MalformedDecision { .. })
    }
}

/// Format a user-facing error with a suggestion block underneath.
pub fn wrap_error_with_suggestion(message: impl AsRef<str>, suggestion: &str) -> String {
    format!("{}\n\n{}", message.as_ref(), suggestion)
}
