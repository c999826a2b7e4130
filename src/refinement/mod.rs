// Refinement module
// Closed-loop instruction search: generate, validate, coach, repeat

mod decision;
mod ledger;
mod loop_runner;
mod types;

pub use decision::{parse_decision, DecisionAction, ValidationDecision};
pub use ledger::HistoryLedger;
pub use loop_runner::RefinementLoop;
pub use types::{RefineConfig, RefineOutcome, RefineReport, RoundRecord, TerminalState};
