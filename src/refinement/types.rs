// Refinement types: RoundRecord, RefineOutcome, RefineReport, RefineConfig

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::decision::ValidationDecision;
use super::ledger::HistoryLedger;
use crate::config::constants::{DEFAULT_INITIAL_INSTRUCTION, DEFAULT_MAX_ATTEMPTS};
use crate::config::RefinementConfig;

/// Everything observable about one round
#[derive(Debug, Clone, Serialize)]
pub struct RoundRecord {
    /// 0-based attempt index
    pub attempt: usize,
    /// Instruction given to the generator
    pub instruction: String,
    /// Generator output
    pub candidate: String,
    /// Validator reply, verbatim
    pub raw_decision: String,
    /// Parsed validator reply
    pub decision: ValidationDecision,
    /// Coach reply, when the coach was consulted this round
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coach_output: Option<String>,
    pub started_at: DateTime<Utc>,
}

/// Terminal state of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminalState {
    Success,
    Exhausted,
    Failed,
}

/// How a run ended, for every ending the loop resolves itself.
///
/// Only `Success` carries an instruction; every other variant maps to the
/// uniform "no prompt found" response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RefineOutcome {
    /// The validator accepted the candidate produced by `instruction`
    Success { instruction: String },
    /// The attempt budget ran out
    Exhausted { attempts: usize },
    /// The validator answered `action = error`
    ValidatorError { reason: Option<String> },
    /// The validator answered with an action outside the known set (or none)
    UnknownAction { action: Option<String> },
}

impl RefineOutcome {
    /// The instruction to hand back to the caller, if the run succeeded.
    pub fn correct_prompt(&self) -> Option<&str> {
        match self {
            Self::Success { instruction } => Some(instruction),
            _ => None,
        }
    }

    pub fn into_correct_prompt(self) -> Option<String> {
        match self {
            Self::Success { instruction } => Some(instruction),
            _ => None,
        }
    }

    pub fn terminal_state(&self) -> TerminalState {
        match self {
            Self::Success { .. } => TerminalState::Success,
            Self::Exhausted { .. } => TerminalState::Exhausted,
            Self::ValidatorError { .. } | Self::UnknownAction { .. } => TerminalState::Failed,
        }
    }
}

/// Full account of one run
#[derive(Debug, Clone, Serialize)]
pub struct RefineReport {
    pub run_id: Uuid,
    pub desired_output: String,
    pub outcome: RefineOutcome,
    pub rounds: Vec<RoundRecord>,
    pub history: HistoryLedger,
}

impl RefineReport {
    pub fn correct_prompt(&self) -> Option<&str> {
        self.outcome.correct_prompt()
    }

    pub fn rounds_completed(&self) -> usize {
        self.rounds.len()
    }
}

/// Configuration for the refinement loop
#[derive(Debug, Clone)]
pub struct RefineConfig {
    /// Rounds allowed before the run is exhausted
    pub max_attempts: usize,
    /// Instruction for round 0
    pub initial_instruction: String,
}

impl Default for RefineConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            initial_instruction: DEFAULT_INITIAL_INSTRUCTION.to_string(),
        }
    }
}

impl From<&RefinementConfig> for RefineConfig {
    fn from(config: &RefinementConfig) -> Self {
        Self {
            max_attempts: config.max_attempts,
            initial_instruction: config.initial_instruction.clone(),
        }
    }
}
