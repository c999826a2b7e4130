// Live refinement tests

use promptgan::agents::RoleAgents;
use promptgan::refinement::{parse_decision, RefineConfig, RefinementLoop};
use std::sync::Arc;

use super::{live_config, live_tests_enabled};

/// The validator, asked at temperature 0 about an exact match, must answer
/// with a decision the strict parser accepts.
#[tokio::test]
#[ignore]
async fn live_validator_replies_with_bare_json() {
    if !live_tests_enabled() {
        return;
    }
    let Some(config) = live_config() else { return };

    let agents = RoleAgents::from_config(&config).unwrap();
    let raw = agents.validate("HELLO", "HELLO").await.unwrap();

    let decision = parse_decision(&raw)
        .unwrap_or_else(|e| panic!("validator reply was not a decision: {e}\n{raw}"));
    assert!(decision.is_correct, "identical strings should validate: {raw}");
}

/// A trivial target should converge well inside a small budget.
#[tokio::test]
#[ignore]
async fn live_refine_short_target() {
    if !live_tests_enabled() {
        return;
    }
    let Some(config) = live_config() else { return };

    let agents = RoleAgents::from_config(&config).unwrap();
    let runner = RefinementLoop::new(
        Arc::new(agents),
        RefineConfig {
            max_attempts: 5,
            ..RefineConfig::default()
        },
    );

    let report = runner.run("HELLO").await.unwrap();
    eprintln!("{}", serde_json::to_string_pretty(&report).unwrap());

    assert!(report.rounds_completed() <= 5);
    assert!(report.history.len() <= report.rounds_completed());
}
