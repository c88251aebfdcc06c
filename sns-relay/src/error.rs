//! Request-level errors and their HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Malformed payload: {0}")]
    MalformedPayload(#[from] serde_json::Error),

    #[error("Missing field {0} in payload")]
    MissingField(&'static str),

    #[error("{operation} failed")]
    Upstream {
        operation: &'static str,
        #[source]
        source: anyhow::Error,
    },
}

impl AppError {
    pub fn upstream(operation: &'static str, source: anyhow::Error) -> Self {
        AppError::Upstream { operation, source }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::MalformedPayload(_) | AppError::MissingField(_) => StatusCode::BAD_REQUEST,
            AppError::Upstream { .. } => StatusCode::BAD_GATEWAY,
        }
    }
}

/// Error response body.
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let body = match &self {
            AppError::MalformedPayload(e) => ErrorResponse {
                error: "Malformed payload".to_string(),
                details: Some(e.to_string()),
            },
            AppError::MissingField(_) => ErrorResponse {
                error: self.to_string(),
                details: None,
            },
            AppError::Upstream { operation, source } => {
                error!(operation = %operation, error = %format!("{:#}", source), "upstream_call_failed");
                // The chain can carry account ids and IAM ARNs; it stays in the log.
                ErrorResponse {
                    error: format!("Bad Gateway: {} failed", operation),
                    details: None,
                }
            }
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(AppError::MissingField("Token").status(), StatusCode::BAD_REQUEST);

        let malformed = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert_eq!(AppError::from(malformed).status(), StatusCode::BAD_REQUEST);

        let upstream = AppError::upstream("sns:publish", anyhow::anyhow!("timeout"));
        assert_eq!(upstream.status(), StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn test_upstream_body_hides_source() {
        let err = AppError::upstream(
            "sns:publish",
            anyhow::anyhow!("User: arn:aws:iam::123456789012:user/relay is not authorized"),
        );

        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = String::from_utf8(bytes.to_vec()).unwrap();

        assert_eq!(body, r#"{"error":"Bad Gateway: sns:publish failed"}"#);
        assert!(!body.contains("123456789012"));
    }

    #[test]
    fn test_missing_field_message() {
        assert_eq!(
            AppError::MissingField("Subject").to_string(),
            "Missing field Subject in payload"
        );
    }
}
