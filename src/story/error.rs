//! Error envelope returned by the HTTP handlers.

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Method {0} not allowed")]
    MethodNotAllowed(String),

    /// Unexpected failure. `details` carries the underlying cause.
    #[error("{message}")]
    Internal { message: String, details: String },
}

/// JSON body: `{"error": ..., "details": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    pub fn internal(message: impl Into<String>, cause: impl std::fmt::Display) -> Self {
        ApiError::Internal {
            message: message.into(),
            details: cause.to_string(),
        }
    }

    pub fn status(&self) -> u16 {
        match self {
            ApiError::BadRequest(_) => 400,
            ApiError::NotFound(_) => 404,
            ApiError::MethodNotAllowed(_) => 405,
            ApiError::Internal { .. } => 500,
        }
    }

    pub fn body(&self) -> ErrorBody {
        let details = match self {
            ApiError::Internal { details, .. } => Some(details.clone()),
            _ => None,
        };
        ErrorBody {
            error: self.to_string(),
            details,
        }
    }
}

/// Handlers accept a single method; anything else is a 405.
pub fn require_method(method: &str, allowed: &str) -> Result<(), ApiError> {
    if method.eq_ignore_ascii_case(allowed) {
        Ok(())
    } else {
        Err(ApiError::MethodNotAllowed(method.to_ascii_uppercase()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(ApiError::BadRequest("x".into()).status(), 400);
        assert_eq!(ApiError::NotFound("x".into()).status(), 404);
        assert_eq!(ApiError::MethodNotAllowed("GET".into()).status(), 405);
        assert_eq!(ApiError::internal("boom", "io").status(), 500);
    }

    #[test]
    fn test_client_error_body_has_no_details() {
        let body = serde_json::to_value(ApiError::BadRequest("Missing genre".into()).body()).unwrap();
        assert_eq!(body, serde_json::json!({ "error": "Missing genre" }));
    }

    #[test]
    fn test_internal_error_body_has_details() {
        let body = ApiError::internal("Failed to generate story", "upstream timed out").body();
        assert_eq!(body.error, "Failed to generate story");
        assert_eq!(body.details.as_deref(), Some("upstream timed out"));
    }

    #[test]
    fn test_require_method() {
        assert!(require_method("post", "POST").is_ok());
        assert_eq!(
            require_method("get", "POST"),
            Err(ApiError::MethodNotAllowed("GET".into()))
        );
    }
}
