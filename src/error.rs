use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use std::fmt;

#[derive(Debug)]
pub enum TtsError {
    // I/O errors
    Io(std::io::Error),

    // Speech provider errors
    Provider {
        status: Option<u16>,
        message: String,
    },
    MissingApiKey,

    // Request validation errors
    InvalidRequest(String),
    EmptyText,
    TextTooLong { length: usize, max: usize },

    // Configuration errors
    InvalidThresholds { hard_max: usize, safe_length: usize },

    // Pipeline errors
    Timeout { completed: usize, total: usize },
    Internal(String),
}

impl TtsError {
    /// Build a provider error without an HTTP status (transport or payload failures)
    pub fn provider(message: impl Into<String>) -> Self {
        TtsError::Provider {
            status: None,
            message: message.into(),
        }
    }

    pub fn is_provider_error(&self) -> bool {
        matches!(self, TtsError::Provider { .. })
    }
}

impl fmt::Display for TtsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TtsError::Io(e) => write!(f, "I/O error: {}", e),
            TtsError::Provider { message, .. } => write!(f, "TTS provider error: {}", message),
            TtsError::MissingApiKey => write!(f, "DASHSCOPE_API_KEY is not set"),
            TtsError::InvalidRequest(msg) => write!(f, "Invalid request: {}", msg),
            TtsError::EmptyText => write!(f, "Missing text field"),
            TtsError::TextTooLong { length, max } => write!(
                f,
                "Text length {} exceeds maximum limit of {} characters",
                length, max
            ),
            TtsError::InvalidThresholds {
                hard_max,
                safe_length,
            } => write!(
                f,
                "Invalid segment thresholds: hard_max={}, safe_length={} (need 1 <= safe_length <= hard_max)",
                hard_max, safe_length
            ),
            TtsError::Timeout { completed, total } => write!(
                f,
                "Deadline exceeded after {}/{} segments",
                completed, total
            ),
            TtsError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for TtsError {}

// Conversions
impl From<std::io::Error> for TtsError {
    fn from(err: std::io::Error) -> Self {
        TtsError::Io(err)
    }
}

impl From<serde_json::Error> for TtsError {
    fn from(err: serde_json::Error) -> Self {
        TtsError::Internal(err.to_string())
    }
}

impl From<reqwest::Error> for TtsError {
    fn from(err: reqwest::Error) -> Self {
        TtsError::Provider {
            status: err.status().map(|s| s.as_u16()),
            message: format!("DashScope request failed: {}", err),
        }
    }
}

// Axum integration
impl IntoResponse for TtsError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            TtsError::EmptyText | TtsError::InvalidRequest(_) | TtsError::TextTooLong { .. } => {
                (StatusCode::BAD_REQUEST, self.to_string())
            }
            TtsError::Provider { .. } => {
                tracing::warn!("Provider error: {}", self);
                (StatusCode::BAD_GATEWAY, self.to_string())
            }
            TtsError::MissingApiKey => {
                tracing::error!("{}", self);
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
            }
            TtsError::Timeout { .. } => {
                tracing::warn!("{}", self);
                (StatusCode::GATEWAY_TIMEOUT, self.to_string())
            }
            _ => {
                tracing::error!("Internal error: {}", self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        (
            status,
            axum::Json(serde_json::json!({
                "status": "error",
                "error": message
            })),
        )
            .into_response()
    }
}

pub type Result<T> = std::result::Result<T, TtsError>;

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_provider_error_maps_to_bad_gateway() {
        let err = TtsError::Provider {
            status: Some(400),
            message: "DashScope TTS API returned status 400: bad input".to_string(),
        };
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

        let json = body_json(response).await;
        assert_eq!(json["status"], "error");
        assert_eq!(
            json["error"],
            "TTS provider error: DashScope TTS API returned status 400: bad input"
        );
    }

    #[tokio::test]
    async fn test_internal_error_hides_details() {
        let response = TtsError::Internal("segment 3 exceeded bound".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let json = body_json(response).await;
        assert_eq!(json["error"], "Internal server error");
    }

    #[tokio::test]
    async fn test_missing_api_key_is_reported() {
        let response = TtsError::MissingApiKey.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let json = body_json(response).await;
        assert_eq!(json["error"], "DASHSCOPE_API_KEY is not set");
    }

    #[tokio::test]
    async fn test_validation_errors_are_bad_request() {
        for err in [
            TtsError::EmptyText,
            TtsError::InvalidRequest("text must be a string".to_string()),
            TtsError::TextTooLong {
                length: 10_001,
                max: 10_000,
            },
        ] {
            assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
        }
    }

    #[tokio::test]
    async fn test_timeout_maps_to_gateway_timeout() {
        let response = TtsError::Timeout {
            completed: 1,
            total: 3,
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::GATEWAY_TIMEOUT);
    }

    #[test]
    fn test_is_provider_error() {
        assert!(TtsError::provider("unreachable").is_provider_error());
        assert!(!TtsError::Internal("x".to_string()).is_provider_error());
        assert!(!TtsError::MissingApiKey.is_provider_error());
    }

    #[test]
    fn test_empty_text_message() {
        assert_eq!(TtsError::EmptyText.to_string(), "Missing text field");
    }
}
