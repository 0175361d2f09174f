// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use merkle_kernel::KernelError;
use merkle_persistence::PersistenceError;
use thiserror::Error;

use crate::api::ApiStatus;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error(transparent)]
    Kernel(#[from] KernelError),
    #[error("{0}")]
    MalformedInput(String),
    /// An extractor refused the request; keeps the extractor's status.
    #[error("{message}")]
    Rejected { status: StatusCode, message: String },
    #[error("Persistence failure: {0}")]
    Persistence(#[from] PersistenceError),
    #[error("Internal server error")]
    Internal,
}

impl EngineError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            EngineError::Kernel(k_err) => match k_err {
                KernelError::OutOfRange { .. } => StatusCode::NOT_FOUND,
                KernelError::Empty => StatusCode::NOT_FOUND,
                KernelError::PendingRebuild => StatusCode::SERVICE_UNAVAILABLE,
                KernelError::InvalidDigest => StatusCode::BAD_REQUEST,
            },
            EngineError::MalformedInput(_) => StatusCode::BAD_REQUEST,
            EngineError::Rejected { status, .. } => *status,
            EngineError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
            EngineError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Every error leaves the API inside the uniform `{status, error}` envelope.
impl IntoResponse for EngineError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        }
        (status, Json(ApiStatus::failure(self.to_string()))).into_response()
    }
}

impl From<JsonRejection> for EngineError {
    fn from(rejection: JsonRejection) -> Self {
        // Well-formed JSON with an unusable field (bad digest hex, wrong
        // type) is malformed input, not 422.
        let status = match &rejection {
            JsonRejection::JsonDataError(_) => StatusCode::BAD_REQUEST,
            _ => rejection.status(),
        };
        EngineError::Rejected {
            status,
            message: rejection.body_text(),
        }
    }
}

impl From<PathRejection> for EngineError {
    fn from(rejection: PathRejection) -> Self {
        EngineError::Rejected {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}
