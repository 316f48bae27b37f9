use crate::utils::error::{AnalyzerError, ErrorCategory};
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Debug, Serialize)]
struct ErrorDetail {
    message: String,
    #[serde(rename = "type")]
    kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    suggestion: Option<&'static str>,
}

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    pub kind: &'static str,
    pub suggestion: Option<&'static str>,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
            kind: "invalid_request_error",
            suggestion: None,
        }
    }

    pub fn unprocessable(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            message: message.into(),
            kind: "validation_error",
            suggestion: None,
        }
    }
}

impl From<AnalyzerError> for ApiError {
    fn from(err: AnalyzerError) -> Self {
        let (status, kind) = match err.category() {
            ErrorCategory::Validation | ErrorCategory::Configuration => {
                (StatusCode::UNPROCESSABLE_ENTITY, "validation_error")
            }
            ErrorCategory::Network | ErrorCategory::Upstream => {
                (StatusCode::BAD_GATEWAY, "upstream_error")
            }
            ErrorCategory::Storage | ErrorCategory::Data => {
                (StatusCode::INTERNAL_SERVER_ERROR, "server_error")
            }
        };

        if status.is_server_error() {
            tracing::error!("Analysis failed: {}", err);
        } else {
            tracing::debug!("Rejected analysis request: {}", err);
        }

        Self {
            status,
            message: err.user_friendly_message(),
            kind,
            suggestion: Some(err.recovery_suggestion()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::JsonDataError(e) => Self::unprocessable(e.body_text()),
            other => Self::bad_request(other.body_text()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: ErrorDetail {
                message: self.message,
                kind: self.kind,
                suggestion: self.suggestion,
            },
        };
        (self.status, Json(body)).into_response()
    }
}
