use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use roofquote_core::error::CoreError;
use roofquote_core::store::StoreError;
use roofquote_core::validation::FieldError;
use serde_json::json;

use crate::middleware::error_detail::ErrorDetail;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `roofquote_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

const INTERNAL_MESSAGE: &str = "An internal error occurred";

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            // --- CoreError variants ---
            AppError::Core(CoreError::Validation(errors))
            | AppError::Core(CoreError::Store(StoreError::Rejected(errors))) => {
                validation_response(errors)
            }
            AppError::Core(CoreError::NotFound { entity, id }) => fail_response(
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                format!("{entity} with id {id} not found"),
            ),
            AppError::Core(CoreError::MalformedId(raw)) => fail_response(
                StatusCode::BAD_REQUEST,
                "BAD_REQUEST",
                format!("Invalid quote id '{raw}'"),
            ),
            AppError::Core(CoreError::InvalidQuery(msg)) => {
                fail_response(StatusCode::BAD_REQUEST, "BAD_REQUEST", msg)
            }
            AppError::Core(CoreError::Store(err)) => {
                tracing::error!(error = %err, "Store failure");
                internal_response(err.to_string())
            }

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => fail_response(StatusCode::BAD_REQUEST, "BAD_REQUEST", msg),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                internal_response(msg)
            }
        }
    }
}

/// 4xx envelope: the client sent something unusable.
fn fail_response(status: StatusCode, code: &'static str, message: String) -> Response {
    let body = json!({
        "status": "fail",
        "code": code,
        "error": message,
    });
    (status, axum::Json(body)).into_response()
}

fn validation_response(errors: Vec<FieldError>) -> Response {
    tracing::debug!(fields = errors.len(), "Submission rejected");
    let body = json!({
        "status": "fail",
        "code": "VALIDATION_ERROR",
        "error": "Validation failed",
        "errors": errors,
    });
    (StatusCode::BAD_REQUEST, axum::Json(body)).into_response()
}

/// 5xx envelope. The message is sanitized; the real cause travels as an
/// [`ErrorDetail`] extension that only development mode renders.
fn internal_response(detail: String) -> Response {
    let body = json!({
        "status": "error",
        "code": "INTERNAL_ERROR",
        "error": INTERNAL_MESSAGE,
    });
    let mut response = (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(body)).into_response();
    response.extensions_mut().insert(ErrorDetail(detail));
    response
}
