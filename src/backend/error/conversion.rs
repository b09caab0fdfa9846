//! Error Conversion
//!
//! `IntoResponse` for `ChatError`, so REST handlers can return
//! `Result<Json<T>, ChatError>` directly.
//!
//! # Response Format
//!
//! ```json
//! {
//!   "error": "Permission denied: not a participant of this chat",
//!   "status": 403
//! }
//! ```

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::shared::error::ChatError;

/// Map a chat error onto its HTTP status code
pub fn status_code(error: &ChatError) -> StatusCode {
    match error {
        ChatError::Authentication { .. } => StatusCode::UNAUTHORIZED,
        ChatError::PermissionDenied { .. } => StatusCode::FORBIDDEN,
        ChatError::NotFound { .. } => StatusCode::NOT_FOUND,
        ChatError::Validation { .. } => StatusCode::BAD_REQUEST,
        ChatError::StoreUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
        ChatError::Serialization { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ChatError {
    fn into_response(self) -> Response {
        let status = status_code(&self);
        let body = serde_json::json!({
            "error": self.to_string(),
            "status": status.as_u16(),
        });
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_code_mapping() {
        assert_eq!(
            status_code(&ChatError::authentication("expired token")),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status_code(&ChatError::permission_denied("not a participant")),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            status_code(&ChatError::not_found("chat", "x")),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_code(&ChatError::validation("title", "too long")),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_code(&ChatError::store_unavailable("db down")),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn test_into_response_status() {
        let response = ChatError::not_found("chat", "missing").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
