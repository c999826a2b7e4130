// Role framing: the fixed text each agent receives around its per-round input

use serde_json::json;

use crate::config::MatchMode;
use crate::providers::Message;
use crate::refinement::HistoryLedger;

const GENERATOR_ROLE: &str = "\
You are the generator. You receive an instruction from a coach and produce \
exactly one completion for it.";

const GENERATOR_CONTRACT: &str = "\
Respond only with the completion you want the validator to check. The validator \
tells the coach whether you were right, and the coach tells you how to improve. \
You have no memory between attempts.";

const VALIDATOR_CONTRACT: &str = "\
Only reply with the appropriate action in the appropriate format. Reply with a \
single JSON object and nothing else: no prose, no markdown code fences.";

/// Guidance shared by both match modes.
const COACH_GUIDANCE: &str = "\
The generator cannot see the desired output; your instruction is all it has. \
It does not know how close it is or what it got right or wrong, so tell it what \
to do and what not to do, what was right and what was wrong about its last \
completion. Fewer attempts is better; a closer match is better. Think about the \
right length, format and tone, and say things like \"shorter\" or \"longer\". \
Use any language or symbols you want: the reader is a model, not a person. \
Shorter instructions are better. Be creative and specific. You may model your \
instruction on these instructions. Use the history to see what has and has not \
worked. The generator has no memory.";

const EXACT_MATCH_SCORING: &str = "\
Incorrectness is the number of characters that differ between the desired output \
and the generator's output. The target is zero incorrectness: a direct, character \
for character match.";

const CONCEPT_MATCH_SCORING: &str = "\
The target is zero incorrectness: the generator's output should say the same thing \
in the same shape as the desired output.";

const COACH_CONTRACT: &str = "\
Respond only with text directed at the generator, ending with \
[Incorrectness score: <incorrectness score>].";

/// Messages for the generator: fixed role framing plus the instruction.
///
/// The instruction is presented as a prior assistant turn, so the generator
/// continues from it rather than answering a question about it.
pub fn generator_messages(instruction: &str) -> Vec<Message> {
    vec![
        Message::system(GENERATOR_ROLE),
        Message::system(GENERATOR_CONTRACT),
        Message::assistant(instruction),
    ]
}

/// Messages for the validator: the candidate, the target and the decision table.
pub fn validator_messages(candidate: &str, desired_output: &str) -> Vec<Message> {
    vec![
        Message::system(format!(
            "Your role is to validate whether the generator's output '{}' matches the \
             desired output: '{}'. Follow these rules:",
            candidate, desired_output
        )),
        Message::system(validation_rules().to_string()),
        Message::system(VALIDATOR_CONTRACT),
    ]
}

/// Messages for the coach: target, full history, the latest candidate and guidance.
pub fn coach_messages(
    candidate: &str,
    desired_output: &str,
    history: &HistoryLedger,
    mode: MatchMode,
) -> Vec<Message> {
    let scoring = match mode {
        MatchMode::Exact => EXACT_MATCH_SCORING,
        MatchMode::Concept => CONCEPT_MATCH_SCORING,
    };

    vec![
        Message::system(format!(
            "Your role is to get the generator, a fellow model, to do as you ask. \
             Get it to produce the desired output: {}.",
            desired_output
        )),
        Message::assistant(history.as_context()),
        Message::system(
            json!({
                "content": "suggest_prompt",
                "data": {
                    "instructions": format!(
                        "Based on the desired output: {} and the generator's current \
                         response: {} guide the generator to an exact match between the \
                         desired output and its actual output.",
                        desired_output, candidate
                    )
                }
            })
            .to_string(),
        ),
        Message::system(format!("{}\n{}", COACH_GUIDANCE, scoring)),
        Message::system(COACH_CONTRACT),
    ]
}

/// The decision table the validator must answer from.
///
/// Each entry maps a situation to the exact JSON object to reply with; the
/// last entry is the fallback when nothing else applies.
pub fn validation_rules() -> serde_json::Value {
    json!({
        "data": {
            "rules": [
                {
                    "if": "output is correct",
                    "return": { "isCorrect": true }
                },
                {
                    "if": "output doesn't meet criteria and a prompt suggestion is needed",
                    "return": {
                        "isCorrect": false,
                        "action": "suggest_prompt",
                        "reason": "The generated output does not meet the desired criteria."
                    }
                },
                {
                    "if": "output is close but needs slight modification",
                    "return": {
                        "isCorrect": false,
                        "action": "retry",
                        "reason": "The generated output is close but needs slight modification."
                    }
                },
                {
                    "if": "an error occurs during validation",
                    "return": {
                        "isCorrect": false,
                        "action": "error",
                        "reason": "An error occurred during the validation process."
                    }
                },
                {
                    "return": {
                        "isCorrect": false,
                        "action": "error",
                        "reason": "Unable to determine the appropriate action."
                    }
                }
            ]
        }
    })
}
