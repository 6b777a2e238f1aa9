use axum::response::{IntoResponse, Response};
use http::StatusCode;
use serde::{Deserialize, Serialize};

use crate::application::error::TodoError;

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody { pub message: String }

/// Failure side of every handler. `NotFound` answers with an empty body.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound,
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, axum::Json(ErrorBody { message })).into_response(),
            ApiError::NotFound => StatusCode::NOT_FOUND.into_response(),
            ApiError::Internal(message) => (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(ErrorBody { message })).into_response(),
        }
    }
}

impl From<TodoError> for ApiError {
    fn from(err: TodoError) -> Self {
        match err {
            TodoError::NotFound(_) => ApiError::NotFound,
            TodoError::Validation(message) => ApiError::BadRequest(message),
            TodoError::Store(e) => {
                tracing::error!(error = %e, "store failure");
                ApiError::Internal(e.to_string())
            }
        }
    }
}
