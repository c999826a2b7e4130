// Scripted agents for integration tests
#![allow(dead_code)]

use anyhow::Result;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use promptgan::agents::RoleAgents;
use promptgan::providers::{LlmProvider, ProviderRequest, ProviderResponse};
use promptgan::refinement::{RefineConfig, RefinementLoop};

/// Answers from a script; once the script runs out the last reply repeats.
pub struct ScriptedAgent {
    name: String,
    replies: Mutex<VecDeque<String>>,
    last: Mutex<String>,
    requests: Mutex<Vec<ProviderRequest>>,
}

impl ScriptedAgent {
    pub fn new(name: &str, replies: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            replies: Mutex::new(replies.iter().map(|r| r.to_string()).collect()),
            last: Mutex::new(String::new()),
            requests: Mutex::new(Vec::new()),
        })
    }

    /// Same reply every call.
    pub fn always(name: &str, reply: &str) -> Arc<Self> {
        Self::new(name, &[reply])
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<ProviderRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Concatenated message contents of the n-th request.
    pub fn prompt_text(&self, n: usize) -> String {
        self.requests.lock().unwrap()[n]
            .messages
            .iter()
            .map(|m| m.content.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[async_trait]
impl LlmProvider for ScriptedAgent {
    async fn send_message(&self, request: &ProviderRequest) -> Result<ProviderResponse> {
        self.requests.lock().unwrap().push(request.clone());

        let mut last = self.last.lock().unwrap();
        if let Some(next) = self.replies.lock().unwrap().pop_front() {
            *last = next;
        }

        Ok(ProviderResponse {
            id: format!("{}-{}", self.name, self.calls()),
            model: "scripted".to_string(),
            text: last.clone(),
            stop_reason: Some("stop".to_string()),
            provider: self.name.clone(),
        })
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn default_model(&self) -> &str {
        "scripted"
    }
}

/// Always fails as if the network were down.
pub struct UnreachableAgent;

#[async_trait]
impl LlmProvider for UnreachableAgent {
    async fn send_message(&self, _request: &ProviderRequest) -> Result<ProviderResponse> {
        anyhow::bail!("error sending request: connection refused")
    }

    fn name(&self) -> &str {
        "unreachable"
    }

    fn default_model(&self) -> &str {
        "none"
    }
}

pub const SUGGEST: &str = r#"{"isCorrect": false, "action": "suggest_prompt", "reason": "not there yet"}"#;
pub const RETRY: &str = r#"{"isCorrect": false, "action": "retry", "reason": "close"}"#;
pub const CORRECT: &str = r#"{"isCorrect": true}"#;
pub const VALIDATOR_ERROR: &str = r#"{"isCorrect": false, "action": "error", "reason": "cannot judge"}"#;

/// A loop over three agents with the given budget.
pub fn refinement_loop(
    generator: Arc<dyn LlmProvider>,
    validator: Arc<dyn LlmProvider>,
    coach: Arc<dyn LlmProvider>,
    max_attempts: usize,
) -> RefinementLoop {
    RefinementLoop::new(
        Arc::new(RoleAgents::new(generator, validator, coach)),
        RefineConfig {
            max_attempts,
            ..RefineConfig::default()
        },
    )
}
