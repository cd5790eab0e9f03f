//! Error responses shared by all handlers.
//!
//! Lookups that miss answer `404 {"error": "..."}`. Rejected writes answer
//! `400 {"errors": ["validation errors"]}` without the underlying cause, which
//! is logged instead. Database failures are logged and surfaced as a bare `500`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::error;
use utoipa::ToSchema;

use crate::store::StoreError;

pub const VALIDATION_ERRORS: &str = "validation errors";

#[derive(ToSchema, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct ValidationErrorResponse {
    pub errors: Vec<String>,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(&'static str),
    #[error("validation errors")]
    Validation,
    #[error("internal server error")]
    Internal,
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(message) => Self::NotFound(message),
            StoreError::Validation(_) => Self::Validation,
            StoreError::Database(err) => {
                error!("Database error: {err}");
                Self::Internal
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::NotFound(message) => (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse {
                    error: message.to_string(),
                }),
            )
                .into_response(),
            Self::Validation => (
                StatusCode::BAD_REQUEST,
                Json(ValidationErrorResponse {
                    errors: vec![VALIDATION_ERRORS.to_string()],
                }),
            )
                .into_response(),
            Self::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Internal server error".to_string(),
                }),
            )
                .into_response(),
        }
    }
}
