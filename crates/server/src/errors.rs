use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::error;

use service::errors::ServiceError;

/// JSON error payload: `{status, message}`, `status = "fail"` for 4xx and
/// `"error"` for 5xx.
#[derive(Debug)]
pub struct JsonApiError {
    pub status: StatusCode,
    pub message: String,
}

impl JsonApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self { status, message: message.into() }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn internal() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "internal server error")
    }
}

impl From<ServiceError> for JsonApiError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::Validation(msg) => Self::bad_request(msg),
            ServiceError::NotFound(msg) => Self::not_found(msg),
            ServiceError::Db(detail) => {
                // log the driver detail; the client only sees a generic message
                error!(error = %detail, "store error");
                Self::internal()
            }
        }
    }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        let status_word = if self.status.is_client_error() { "fail" } else { "error" };
        let body = Json(serde_json::json!({
            "status": status_word,
            "message": self.message,
        }));
        (self.status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_errors_map_to_status_codes() {
        let e = JsonApiError::from(ServiceError::Validation("amount must be >= 0".into()));
        assert_eq!(e.status, StatusCode::BAD_REQUEST);

        let e = JsonApiError::from(ServiceError::not_found("record"));
        assert_eq!(e.status, StatusCode::NOT_FOUND);

        let e = JsonApiError::from(ServiceError::Db("connection refused to 10.0.0.3".into()));
        assert_eq!(e.status, StatusCode::INTERNAL_SERVER_ERROR);
        // driver detail must not leak
        assert_eq!(e.message, "internal server error");
    }
}
