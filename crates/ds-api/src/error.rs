//! JSON error responses.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use ds_core::AppError;
use serde_json::json;

/// An `AppError` on its way out as `{ "success": false, "error": ... }`.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_, _) => StatusCode::NOT_FOUND,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Text shown to the client. Store failures stay generic; the details
    /// only go to the log.
    pub fn message(&self) -> String {
        match &self.0 {
            AppError::ValidationError(msg) | AppError::Forbidden(msg) => msg.clone(),
            AppError::NotFound(what, _) => format!("{} not found", what.to_lowercase()),
            AppError::Store(_) => "storage is unavailable, please try again later".to_string(),
        }
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(AppError::ValidationError(rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self.0, "request failed");
        } else {
            tracing::debug!(error = %self.0, status = status.as_u16(), "request rejected");
        }
        let body = Json(json!({ "success": false, "error": self.message() }));
        (status, body).into_response()
    }
}
