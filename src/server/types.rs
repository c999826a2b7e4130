// Wire types for the refinement HTTP API

use serde::{Deserialize, Serialize};

/// Query string for `GET /api/refine`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefineQuery {
    pub desired_output: Option<String>,
}

/// Body for `POST /api/refine`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefineRequest {
    #[serde(default)]
    pub desired_output: Option<String>,
}

/// Successful refinement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefineResponse {
    pub correct_prompt: String,
}

/// Every non-success body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_uses_camel_case() {
        let req: RefineRequest = serde_json::from_str(r#"{"desiredOutput":"HELLO"}"#).unwrap();
        assert_eq!(req.desired_output.as_deref(), Some("HELLO"));

        let empty: RefineRequest = serde_json::from_str("{}").unwrap();
        assert!(empty.desired_output.is_none());
    }

    #[test]
    fn test_response_field_name() {
        let json = serde_json::to_value(RefineResponse {
            correct_prompt: "say HELLO".to_string(),
        })
        .unwrap();
        assert_eq!(json, serde_json::json!({"correctPrompt": "say HELLO"}));
    }
}
