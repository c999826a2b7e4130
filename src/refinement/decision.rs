// Validator decision parsing
//
// Strict by contract: the reply must be one JSON object with a boolean
// `isCorrect`. Anything else is a protocol violation and fails the run.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::errors::RefineError;

/// What the validator wants done after an incorrect candidate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecisionAction {
    /// Ask the coach for a new instruction
    SuggestPrompt,
    /// Candidate was close; currently coached exactly like `SuggestPrompt`
    Retry,
    /// The validator itself failed
    Error,
    /// Any other value, kept verbatim for logging
    Unknown(String),
}

impl DecisionAction {
    fn from_wire(value: String) -> Self {
        match value.as_str() {
            "suggest_prompt" => Self::SuggestPrompt,
            "retry" => Self::Retry,
            "error" => Self::Error,
            _ => Self::Unknown(value),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::SuggestPrompt => "suggest_prompt",
            Self::Retry => "retry",
            Self::Error => "error",
            Self::Unknown(other) => other,
        }
    }

    /// Whether this action continues the run through the coach.
    pub fn needs_coaching(&self) -> bool {
        matches!(self, Self::SuggestPrompt | Self::Retry)
    }
}

impl fmt::Display for DecisionAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for DecisionAction {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// The validator's verdict on one candidate. Never modified after parsing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationDecision {
    pub is_correct: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<DecisionAction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Wire shape as the validator writes it.
///
/// Only `isCorrect` is typed; `action` and `reason` accept any JSON value.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDecision {
    is_correct: bool,
    #[serde(default)]
    action: Option<Value>,
    #[serde(default)]
    reason: Option<Value>,
}

impl From<RawDecision> for ValidationDecision {
    fn from(raw: RawDecision) -> Self {
        Self {
            is_correct: raw.is_correct,
            action: raw.action.and_then(action_from_value),
            reason: raw.reason.and_then(text_from_value),
        }
    }
}

/// A string goes through the wire names; any other value is unknown.
fn action_from_value(value: Value) -> Option<DecisionAction> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(DecisionAction::from_wire(s)),
        other => Some(DecisionAction::Unknown(other.to_string())),
    }
}

fn text_from_value(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

/// Parse the validator's raw reply into a `ValidationDecision`.
///
/// Surrounding whitespace is ignored. Markdown fences, leading prose, a
/// non-object payload, or a missing/non-boolean `isCorrect` all yield
/// `RefineError::MalformedDecision`.
pub fn parse_decision(raw: &str) -> Result<ValidationDecision, RefineError> {
    serde_json::from_str::<RawDecision>(raw.trim())
        .map(ValidationDecision::from)
        .map_err(|e| RefineError::MalformedDecision {
            reason: e.to_string(),
            raw: raw.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_correct_without_action() {
        let decision = parse_decision(r#"{"isCorrect": true}"#).unwrap();
        assert!(decision.is_correct);
        assert_eq!(decision.action, None);
        assert_eq!(decision.reason, None);
    }

    #[test]
    fn test_parse_full_payload_matches_fields() {
        let decision = parse_decision(
            r#"{"isCorrect": false, "action": "suggest_prompt", "reason": "too long"}"#,
        )
        .unwrap();
        assert_eq!(
            decision,
            ValidationDecision {
                is_correct: false,
                action: Some(DecisionAction::SuggestPrompt),
                reason: Some("too long".to_string()),
            }
        );
    }

    #[test]
    fn test_parse_known_actions() {
        for (wire, expected) in [
            ("retry", DecisionAction::Retry),
            ("error", DecisionAction::Error),
            ("suggest_prompt", DecisionAction::SuggestPrompt),
        ] {
            let raw = format!(r#"{{"isCorrect": false, "action": "{wire}"}}"#);
            assert_eq!(parse_decision(&raw).unwrap().action, Some(expected));
        }
    }

    #[test]
    fn test_parse_unknown_action_is_kept() {
        let decision = parse_decision(r#"{"isCorrect": false, "action": "escalate"}"#).unwrap();
        assert_eq!(
            decision.action,
            Some(DecisionAction::Unknown("escalate".to_string()))
        );
        assert!(!decision.action.unwrap().needs_coaching());
    }

    #[test]
    fn test_parse_tolerates_surrounding_whitespace() {
        assert!(parse_decision("\n  {\"isCorrect\": true}\n").is_ok());
    }

    #[test]
    fn test_missing_is_correct_is_malformed() {
        let err = parse_decision(r#"{"action": "retry"}"#).unwrap_err();
        assert!(matches!(err, RefineError::MalformedDecision { .. }));
    }

    #[test]
    fn test_string_is_correct_is_malformed() {
        assert!(parse_decision(r#"{"isCorrect": "true"}"#).is_err());
    }

    #[test]
    fn test_prose_is_malformed() {
        let err = parse_decision("Looks right to me!").unwrap_err();
        match err {
            RefineError::MalformedDecision { raw, .. } => assert_eq!(raw, "Looks right to me!"),
            other => panic!("expected MalformedDecision, got {other:?}"),
        }
    }

    #[test]
    fn test_fenced_json_is_malformed() {
        assert!(parse_decision("```json\n{\"isCorrect\": true}\n```").is_err());
    }

    #[test]
    fn test_array_is_malformed() {
        assert!(parse_decision(r#"[{"isCorrect": true}]"#).is_err());
    }

    #[test]
    fn test_correct_with_non_string_fields_still_parses() {
        let decision = parse_decision(r#"{"isCorrect": true, "action": 42}"#).unwrap();
        assert!(decision.is_correct);
        assert_eq!(
            decision.action,
            Some(DecisionAction::Unknown("42".to_string()))
        );

        let decision = parse_decision(r#"{"isCorrect": true, "reason": {"detail": "x"}}"#).unwrap();
        assert!(decision.is_correct);
        assert_eq!(decision.reason.as_deref(), Some(r#"{"detail":"x"}"#));
    }

    #[test]
    fn test_non_string_action_is_unknown() {
        let decision = parse_decision(r#"{"isCorrect": false, "action": ["retry"]}"#).unwrap();
        let action = decision.action.unwrap();
        assert_eq!(action, DecisionAction::Unknown(r#"["retry"]"#.to_string()));
        assert!(!action.needs_coaching());
    }

    #[test]
    fn test_null_action_is_absent() {
        let decision = parse_decision(r#"{"isCorrect": false, "action": null}"#).unwrap();
        assert_eq!(decision.action, None);
    }

    #[test]
    fn test_serializes_back_to_wire_names() {
        let raw = r#"{"isCorrect": false, "action": "retry", "reason": "close"}"#;
        let decision = parse_decision(raw).unwrap();
        let json = serde_json::to_value(&decision).unwrap();
        assert_eq!(json["isCorrect"], false);
        assert_eq!(json["action"], "retry");
        assert_eq!(json["reason"], "close");
    }
}
