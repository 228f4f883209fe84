use axum::{
    extract::multipart::{MultipartError, MultipartRejection},
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

use crate::extraction::ExtractionError;
use crate::generation::response_parser::ParseFailure;
use crate::llm_client::LlmError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Extraction failure: {0}")]
    ExtractionFailure(String),

    #[error("Model unavailable: {0}")]
    ModelUnavailable(String),

    #[error("Model error: {0}")]
    ModelError(String),

    #[error("Parse failure: {0}")]
    ParseFailure(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Serializable `{code, message}` pair. Used both for whole-request errors and
/// for per-candidate failures inside a scoring batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

impl AppError {
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::UnsupportedFormat(_) => "UNSUPPORTED_FORMAT",
            AppError::ExtractionFailure(_) => "EXTRACTION_FAILURE",
            AppError::ModelUnavailable(_) => "MODEL_UNAVAILABLE",
            AppError::ModelError(_) => "MODEL_ERROR",
            AppError::ParseFailure(_) => "PARSE_FAILURE",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::UnsupportedFormat(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            AppError::ExtractionFailure(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::ModelUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::ModelError(_) | AppError::ParseFailure(_) => StatusCode::BAD_GATEWAY,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Body safe to hand to a client. Internal errors are not echoed back.
    pub fn body(&self) -> ErrorBody {
        let message = match self {
            AppError::Validation(msg)
            | AppError::UnsupportedFormat(msg)
            | AppError::ExtractionFailure(msg)
            | AppError::ModelUnavailable(msg)
            | AppError::ModelError(msg)
            | AppError::ParseFailure(msg) => msg.clone(),
            AppError::Internal(_) => "An internal server error occurred".to_string(),
        };
        ErrorBody {
            code: self.code(),
            message,
        }
    }
}

impl From<LlmError> for AppError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::Unavailable(_) | LlmError::Timeout(_) => {
                AppError::ModelUnavailable(err.to_string())
            }
            LlmError::Api { .. } | LlmError::EmptyContent | LlmError::Decode(_) => {
                AppError::ModelError(err.to_string())
            }
        }
    }
}

impl From<ExtractionError> for AppError {
    fn from(err: ExtractionError) -> Self {
        match err {
            ExtractionError::UnsupportedFormat(_) => AppError::UnsupportedFormat(err.to_string()),
            ExtractionError::Failure(_) => AppError::ExtractionFailure(err.to_string()),
        }
    }
}

impl From<ParseFailure> for AppError {
    fn from(err: ParseFailure) -> Self {
        AppError::ParseFailure(err.to_string())
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<MultipartRejection> for AppError {
    fn from(rejection: MultipartRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<MultipartError> for AppError {
    fn from(err: MultipartError) -> Self {
        AppError::Validation(err.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            AppError::Internal(e) => tracing::error!("Internal error: {e:?}"),
            AppError::ModelUnavailable(msg)
            | AppError::ModelError(msg)
            | AppError::ParseFailure(msg) => tracing::error!("{}: {msg}", self.code()),
            _ => {}
        }

        let body = Json(json!({ "error": self.body() }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_failure_maps_to_model_unavailable() {
        let err: AppError = LlmError::Unavailable("connection refused".to_string()).into();
        assert_eq!(err.code(), "MODEL_UNAVAILABLE");
        assert_eq!(err.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_api_failure_maps_to_model_error() {
        let err: AppError = LlmError::Api {
            status: 400,
            message: "API key not valid".to_string(),
        }
        .into();
        assert_eq!(err.code(), "MODEL_ERROR");
        assert!(err.body().message.contains("API key not valid"));
    }

    #[test]
    fn test_extraction_errors_keep_their_kind() {
        let unsupported: AppError = ExtractionError::UnsupportedFormat("rtf".to_string()).into();
        let failure: AppError = ExtractionError::Failure("bad zip".to_string()).into();
        assert_eq!(unsupported.code(), "UNSUPPORTED_FORMAT");
        assert_eq!(failure.code(), "EXTRACTION_FAILURE");
    }

    #[test]
    fn test_internal_error_message_is_not_leaked() {
        let err = AppError::Internal(anyhow::anyhow!("worker panicked at secret.rs:12"));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!err.body().message.contains("secret.rs"));
    }
}
