use crate::services::StoreError;
use axum::extract::rejection::BytesRejection;
use axum::http::StatusCode;
use service_core::error::AppError;
use thiserror::Error;

/// Failures of a single product check.
#[derive(Error, Debug)]
pub enum CheckError {
    #[error("Invalid JSON: {0}")]
    InvalidPayload(serde_json::Error),

    #[error("Invalid request: ProductName is required")]
    MissingField,

    #[error("Invalid request: ProductName must be a string")]
    InvalidField,

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Request body could not be read: {0}")]
    UnreadableBody(BytesRejection),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl From<CheckError> for AppError {
    fn from(err: CheckError) -> Self {
        match err {
            CheckError::InvalidPayload(_) | CheckError::MissingField | CheckError::InvalidField => {
                AppError::BadRequest(anyhow::anyhow!(err.to_string()))
            }
            CheckError::MethodNotAllowed => AppError::MethodNotAllowed,
            CheckError::UnreadableBody(rejection)
                if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE =>
            {
                AppError::PayloadTooLarge
            }
            CheckError::UnreadableBody(rejection) => AppError::BadRequest(anyhow::anyhow!(
                "Invalid request: body could not be read: {}",
                rejection.body_text()
            )),
            CheckError::Store(e) => AppError::DatabaseError(e.into()),
        }
    }
}
