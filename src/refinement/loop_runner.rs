// Refinement loop runner: attempt, validate, coach, repeat

use chrono::Utc;
use std::sync::Arc;
use tracing::Instrument;
use uuid::Uuid;

use super::decision::{parse_decision, DecisionAction};
use super::ledger::HistoryLedger;
use super::types::{RefineConfig, RefineOutcome, RefineReport, RoundRecord};
use crate::agents::RoleAgents;
use crate::config::Config;
use crate::errors::RefineError;

/// The refinement loop.
///
/// Drives generator → validator → coach rounds until one of:
/// - the validator accepts a candidate (`Success`, returns that round's instruction)
/// - the attempt budget is spent (`Exhausted`)
/// - the validator reports `error` or an action outside the known set (`Failed`)
/// - the validator reply is not a decision, or an agent call fails (`Err`)
///
/// The loop holds no per-run state; one instance can serve many concurrent runs.
pub struct RefinementLoop {
    agents: Arc<RoleAgents>,
    config: RefineConfig,
}

impl RefinementLoop {
    pub fn new(agents: Arc<RoleAgents>, config: RefineConfig) -> Self {
        Self { agents, config }
    }

    /// Build agents and loop settings from configuration.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let agents = RoleAgents::from_config(config)?;
        Ok(Self::new(
            Arc::new(agents),
            RefineConfig::from(&config.refinement),
        ))
    }

    pub fn config(&self) -> &RefineConfig {
        &self.config
    }

    /// Run a full refinement from the configured initial instruction.
    pub async fn run(&self, desired_output: &str) -> Result<RefineReport, RefineError> {
        self.run_with(desired_output, |_| {}).await
    }

    /// Like `run`, calling `on_round` after every completed round.
    pub async fn run_with<F>(
        &self,
        desired_output: &str,
        mut on_round: F,
    ) -> Result<RefineReport, RefineError>
    where
        F: FnMut(&RoundRecord) + Send,
    {
        let run_id = Uuid::new_v4();
        let span = tracing::info_span!("refine", %run_id);

        let mut history = HistoryLedger::new();
        let mut rounds = Vec::new();

        let outcome = self
            .drive(
                self.config.initial_instruction.clone(),
                0,
                desired_output,
                &mut history,
                &mut rounds,
                &mut on_round,
            )
            .instrument(span)
            .await?;

        tracing::info!(
            %run_id,
            state = ?outcome.terminal_state(),
            rounds = rounds.len(),
            "Refinement finished"
        );

        Ok(RefineReport {
            run_id,
            desired_output: desired_output.to_string(),
            outcome,
            rounds,
            history,
        })
    }

    /// Refine starting from `instruction` at `attempt`, appending to `history`.
    ///
    /// Returns the instruction that produced an accepted candidate, or `None`
    /// when the run ended any other way the loop resolves itself.
    pub async fn refine(
        &self,
        instruction: &str,
        attempt: usize,
        desired_output: &str,
        history: &mut HistoryLedger,
    ) -> Result<Option<String>, RefineError> {
        let mut rounds = Vec::new();
        let outcome = self
            .drive(
                instruction.to_string(),
                attempt,
                desired_output,
                history,
                &mut rounds,
                &mut |_: &RoundRecord| {},
            )
            .await?;
        Ok(outcome.into_correct_prompt())
    }

    async fn drive<F>(
        &self,
        mut instruction: String,
        mut attempt: usize,
        desired_output: &str,
        history: &mut HistoryLedger,
        rounds: &mut Vec<RoundRecord>,
        on_round: &mut F,
    ) -> Result<RefineOutcome, RefineError>
    where
        F: FnMut(&RoundRecord) + Send,
    {
        let max = self.config.max_attempts;

        loop {
            if attempt >= max {
                tracing::warn!(attempt, max, "Attempt budget exhausted");
                return Ok(RefineOutcome::Exhausted { attempts: attempt });
            }

            let started_at = Utc::now();
            tracing::info!(attempt = attempt + 1, max, %instruction, "Generating");

            let candidate = self.agents.generate(&instruction).await?;
            tracing::info!(attempt = attempt + 1, %candidate, "Generator replied");

            let raw_decision = self.agents.validate(&candidate, desired_output).await?;
            tracing::info!(attempt = attempt + 1, decision = %raw_decision, "Validator replied");

            let decision = parse_decision(&raw_decision).inspect_err(|e| {
                tracing::error!(attempt = attempt + 1, "{}", e);
            })?;

            let mut record = RoundRecord {
                attempt,
                instruction: instruction.clone(),
                candidate,
                raw_decision,
                decision: decision.clone(),
                coach_output: None,
                started_at,
            };

            if decision.is_correct {
                on_round(&record);
                rounds.push(record);
                return Ok(RefineOutcome::Success { instruction });
            }

            match decision.action {
                Some(action) if action.needs_coaching() => {
                    history.append(instruction);
                    tracing::debug!(attempt = attempt + 1, %action, "Consulting coach");
                    let next = self
                        .agents
                        .coach(&record.candidate, desired_output, history)
                        .await?;
                    tracing::info!(attempt = attempt + 1, coach = %next, "Coach replied");

                    record.coach_output = Some(next.clone());
                    on_round(&record);
                    rounds.push(record);

                    instruction = next;
                    attempt += 1;
                }
                Some(DecisionAction::Error) => {
                    tracing::error!(
                        reason = decision.reason.as_deref().unwrap_or("<none>"),
                        "Validator reported an error"
                    );
                    on_round(&record);
                    rounds.push(record);
                    return Ok(RefineOutcome::ValidatorError {
                        reason: decision.reason,
                    });
                }
                other => {
                    let action = other.map(|a| a.as_str().to_string());
                    tracing::error!(
                        action = action.as_deref().unwrap_or("<missing>"),
                        "Unknown action from validator"
                    );
                    on_round(&record);
                    rounds.push(record);
                    return Ok(RefineOutcome::UnknownAction { action });
                }
            }
        }
    }
}
