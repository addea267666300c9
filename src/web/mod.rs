//! HTTP surface of the gateway.
//!
//! One generic handler set (see [`handlers`]) is instantiated per record
//! type by [`router::build_router`]. Every failure leaves through
//! [`WebError`], which renders `{"error": ..., "code": ...}`.

pub mod extract;
pub mod handlers;
pub mod router;

pub use router::{AppState, build_router};

use crate::core::GatewayError;
use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use tracing::error;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

#[derive(Debug)]
pub enum WebError {
    Gateway(GatewayError),
    /// Request body could not be read as the expected JSON shape.
    Input(String),
    /// Path names no route, or a segment that cannot be a record id.
    NoMatch(String),
    MethodNotAllowed,
}

impl From<GatewayError> for WebError {
    fn from(err: GatewayError) -> Self {
        WebError::Gateway(err)
    }
}

impl From<JsonRejection> for WebError {
    fn from(rejection: JsonRejection) -> Self {
        WebError::Input(rejection.body_text())
    }
}

impl WebError {
    pub fn status(&self) -> StatusCode {
        match self {
            WebError::Input(_) => StatusCode::BAD_REQUEST,
            WebError::NoMatch(_) => StatusCode::NOT_FOUND,
            WebError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            WebError::Gateway(err) => match err {
                GatewayError::NotFound { .. } => StatusCode::NOT_FOUND,
                GatewayError::Validation(_) | GatewayError::DanglingReference { .. } => {
                    StatusCode::BAD_REQUEST
                }
                GatewayError::Conflict(_) => StatusCode::CONFLICT,
                GatewayError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    pub fn code(&self) -> &'static str {
        match self.status() {
            StatusCode::NOT_FOUND => "not_found",
            StatusCode::BAD_REQUEST => "validation_error",
            StatusCode::CONFLICT => "conflict",
            StatusCode::METHOD_NOT_ALLOWED => "method_not_allowed",
            _ => "internal_error",
        }
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.code().to_string();
        let message = match self {
            WebError::Input(msg) | WebError::NoMatch(msg) => msg,
            WebError::MethodNotAllowed => "method not allowed".to_string(),
            WebError::Gateway(GatewayError::Storage(msg)) => {
                error!(error = %msg, "storage failure");
                "internal storage error".to_string()
            }
            WebError::Gateway(err) => err.to_string(),
        };

        let body = Json(ErrorResponse {
            error: message,
            code,
        });

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, WebError>;

#[cfg(test)]
mod tests {
    use super::WebError;
    use crate::core::{GatewayError, RecordRef, ResourceKind};
    use axum::http::StatusCode;

    #[test]
    fn gateway_errors_map_to_statuses() {
        let cases = [
            (
                GatewayError::not_found(ResourceKind::Course, 7),
                StatusCode::NOT_FOUND,
                "not_found",
            ),
            (
                GatewayError::validation("title: This field may not be blank."),
                StatusCode::BAD_REQUEST,
                "validation_error",
            ),
            (
                GatewayError::DanglingReference {
                    field: "category",
                    target: RecordRef::new(ResourceKind::Category, 999),
                },
                StatusCode::BAD_REQUEST,
                "validation_error",
            ),
            (
                GatewayError::Conflict("referenced".to_string()),
                StatusCode::CONFLICT,
                "conflict",
            ),
            (
                GatewayError::Storage("disk full".to_string()),
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
            ),
        ];

        for (err, status, code) in cases {
            let web = WebError::from(err);
            assert_eq!(web.status(), status);
            assert_eq!(web.code(), code);
        }
    }

    #[test]
    fn routing_errors_map_to_statuses() {
        let missing = WebError::NoMatch("no route for /nowhere".to_string());
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
        assert_eq!(missing.code(), "not_found");

        assert_eq!(WebError::MethodNotAllowed.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(WebError::MethodNotAllowed.code(), "method_not_allowed");
    }

    #[test]
    fn not_found_message_names_the_record() {
        let err = GatewayError::not_found(ResourceKind::Lesson, 3);
        assert_eq!(err.to_string(), "Lesson 3 not found");
    }
}
