//! API error taxonomy.
//!
//! Every failure here is locally recoverable by the caller: the frontend
//! surfaces the message inline and lets the user retry. Nothing in this
//! taxonomy is fatal to the service.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::domain::review_service::SubmissionError;
use crate::domain::verification_service::VerificationError;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("email does not match the address used during registration")]
    EmailMismatch,

    #[error("verification code does not match")]
    CodeMismatch,

    #[error("could not deliver the verification code, please try again")]
    DeliveryFailed,

    #[error("certificate lookup is currently unavailable")]
    LookupFailed,

    #[error("submission could not be recorded, please try again later")]
    SubmissionFailed,

    #[error("verification session not found")]
    SessionNotFound,

    #[error("operation is not valid in the current verification state")]
    InvalidState,

    #[error("unknown course")]
    UnknownCourse,

    #[error("{0}")]
    Validation(String),
}

impl ApiError {
    /// Stable machine-readable discriminator for the frontend.
    fn code(&self) -> &'static str {
        match self {
            ApiError::EmailMismatch => "EmailMismatch",
            ApiError::CodeMismatch => "CodeMismatch",
            ApiError::DeliveryFailed => "DeliveryFailed",
            ApiError::LookupFailed => "LookupFailed",
            ApiError::SubmissionFailed => "SubmissionFailed",
            ApiError::SessionNotFound => "SessionNotFound",
            ApiError::InvalidState => "InvalidState",
            ApiError::UnknownCourse => "UnknownCourse",
            ApiError::Validation(_) => "Validation",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            ApiError::EmailMismatch | ApiError::CodeMismatch | ApiError::Validation(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ApiError::DeliveryFailed | ApiError::LookupFailed | ApiError::SubmissionFailed => {
                StatusCode::BAD_GATEWAY
            }
            ApiError::SessionNotFound | ApiError::UnknownCourse => StatusCode::NOT_FOUND,
            ApiError::InvalidState => StatusCode::CONFLICT,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = json!({
            "error": self.code(),
            "message": self.to_string(),
        });
        (self.status(), Json(body)).into_response()
    }
}

impl From<VerificationError> for ApiError {
    fn from(err: VerificationError) -> Self {
        match err {
            VerificationError::EmailMismatch => ApiError::EmailMismatch,
            VerificationError::CodeMismatch => ApiError::CodeMismatch,
            VerificationError::DeliveryFailed(_) => ApiError::DeliveryFailed,
            VerificationError::SessionNotFound => ApiError::SessionNotFound,
            VerificationError::InvalidState { .. } => ApiError::InvalidState,
            VerificationError::InvalidInput(message) => {
                ApiError::Validation(message.to_string())
            }
        }
    }
}

impl From<SubmissionError> for ApiError {
    fn from(err: SubmissionError) -> Self {
        match err {
            SubmissionError::Invalid(message) => ApiError::Validation(message),
            SubmissionError::Rejected | SubmissionError::Unavailable(_) => {
                ApiError::SubmissionFailed
            }
        }
    }
}
