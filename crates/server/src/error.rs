//! HTTP mapping of executor errors.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use niaga_executor::Error;

/// An executor error on its way to the client
#[derive(Debug)]
pub struct ApiError(pub Error);

impl ApiError {
    /// Status code for the wrapped error
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            Error::NotFound { .. } => StatusCode::NOT_FOUND,
            Error::AlreadyExists { .. }
            | Error::Conflict { .. }
            | Error::InvalidTransition { .. } => StatusCode::CONFLICT,
            Error::InvalidCredentials | Error::Unauthenticated => StatusCode::UNAUTHORIZED,
            Error::AccessDenied { .. } | Error::ReadOnly => StatusCode::FORBIDDEN,
            Error::Io { .. } | Error::Serialization { .. } | Error::Internal { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Error::InvalidInput { .. }
            | Error::InsufficientStock { .. }
            | Error::InsufficientBalance { .. }
            | Error::InsufficientPayment { .. }
            | Error::Overpayment { .. } => StatusCode::BAD_REQUEST,
        }
    }

    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        ApiError(Error::InvalidInput {
            reason: reason.into(),
        })
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self.0, "request failed");
        }
        let mut body = serde_json::to_value(&self.0).unwrap_or_default();
        if let Some(map) = body.as_object_mut() {
            map.insert("message".into(), self.0.to_string().into());
        }
        (status, Json(body)).into_response()
    }
}
