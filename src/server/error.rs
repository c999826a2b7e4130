// HTTP error mapping
//
// Every ending other than success collapses to one of three bodies:
// a bad request, the uniform "no prompt" 400, or a 500 carrying the
// failure message.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use super::types::ErrorResponse;
use crate::config::constants::NO_PROMPT_FOUND;
use crate::errors::RefineError;

#[derive(Debug, Error)]
pub enum ApiError {
    /// `desiredOutput` absent or blank
    #[error("desiredOutput is required")]
    MissingDesiredOutput,

    /// Request body was rejected by the extractor (syntax, content type, size)
    #[error("invalid request body: {message}")]
    InvalidBody { status: StatusCode, message: String },

    /// The run ended without an accepted instruction
    #[error("{}", NO_PROMPT_FOUND)]
    NoPromptFound,

    /// Agent or configuration failure
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingDesiredOutput | Self::NoPromptFound => StatusCode::BAD_REQUEST,
            Self::InvalidBody { status, .. } => *status,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<RefineError> for ApiError {
    fn from(err: RefineError) -> Self {
        if err.is_protocol_failure() {
            return Self::NoPromptFound;
        }
        // `{:#}` keeps the source chain on one line
        Self::Internal(format!("{:#}", anyhow::Error::from(err)))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
