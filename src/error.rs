use axum::{
    extract::rejection::JsonRejection,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use validator::ValidationErrors;

use crate::response::ErrorResponse;

/// Application-wide error type.
///
/// Every variant maps to an HTTP status and a response code of the shared
/// `{ isSuccess, code, message, result }` envelope.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("invalid secret key")]
    InvalidSecretKey,

    #[error("{0}")]
    ValidationError(String),

    #[error("malformed request body: {0}")]
    JsonParseFailed(String),

    #[error("rate limit exceeded, retry after {retry_after_secs}s")]
    RateLimitExceeded { retry_after_secs: u64 },

    #[error("OpenAI authentication failed")]
    OpenAiAuthError,

    #[error("OpenAI rate limit exceeded")]
    OpenAiRateLimitError,

    #[error("OpenAI temporarily unavailable")]
    OpenAiTemporaryError,

    #[error("OpenAI API error: {0}")]
    OpenAiError(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::ValidationError(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }

    /// Response code carried in the envelope
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::InvalidSecretKey => "AI_001",
            AppError::ValidationError(_) | AppError::JsonParseFailed(_) => "COMMON400",
            AppError::RateLimitExceeded { .. } => "COMMON429",
            AppError::OpenAiAuthError => "AI_003",
            AppError::OpenAiRateLimitError => "AI_004",
            AppError::OpenAiTemporaryError => "AI_005",
            AppError::OpenAiError(_) => "AI_006",
            AppError::Internal(_) => "COMMON500",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidSecretKey => StatusCode::UNAUTHORIZED,
            AppError::ValidationError(_) | AppError::JsonParseFailed(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::RateLimitExceeded { .. } => StatusCode::TOO_MANY_REQUESTS,
            AppError::OpenAiRateLimitError | AppError::OpenAiTemporaryError => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            AppError::OpenAiAuthError | AppError::OpenAiError(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message exposed to clients. Provider and internal details stay in the logs.
    pub fn client_message(&self) -> String {
        match self {
            AppError::InvalidSecretKey => "کلید محرمانه نامعتبر است".to_string(),
            AppError::ValidationError(msg) => msg.clone(),
            AppError::JsonParseFailed(_) => "قالب درخواست نامعتبر است".to_string(),
            AppError::RateLimitExceeded { retry_after_secs } => format!(
                "تعداد درخواست‌ها بیش از حد مجاز است، لطفاً {} ثانیه دیگر تلاش کنید",
                retry_after_secs
            ),
            AppError::OpenAiRateLimitError | AppError::OpenAiTemporaryError => {
                "سرویس تولید متن موقتاً در دسترس نیست".to_string()
            }
            AppError::OpenAiAuthError | AppError::OpenAiError(_) => {
                "خطا در تولید متن".to_string()
            }
            AppError::Internal(_) => "خطای داخلی سرور".to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.error_code();

        if status.is_server_error() {
            tracing::error!(code, error = %self, "Request failed");
        } else {
            tracing::warn!(code, error = %self, "Request rejected");
        }

        let mut response =
            (status, Json(ErrorResponse::new(code, self.client_message()))).into_response();

        if let AppError::RateLimitExceeded { retry_after_secs } = self {
            if let Ok(value) = HeaderValue::from_str(&retry_after_secs.to_string()) {
                response.headers_mut().insert(header::RETRY_AFTER, value);
            }
        }

        response
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::JsonParseFailed(rejection.body_text())
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        // Surface the first field message; the envelope has room for one.
        let message = errors
            .field_errors()
            .into_values()
            .flat_map(|errs| errs.iter())
            .find_map(|err| err.message.as_ref().map(|m| m.to_string()))
            .unwrap_or_else(|| errors.to_string());
        AppError::ValidationError(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use validator::Validate;

    #[derive(Validate)]
    struct Sample {
        #[validate(length(min = 1, message = "این فیلد الزامی است"))]
        name: String,
    }

    #[test]
    fn validation_errors_should_map_to_first_field_message() {
        // Arrange
        let sample = Sample {
            name: String::new(),
        };

        // Act
        let error: AppError = sample.validate().unwrap_err().into();

        // Assert
        assert!(matches!(error, AppError::ValidationError(ref m) if m == "این فیلد الزامی است"));
        assert_eq!(error.error_code(), "COMMON400");
    }

    #[test]
    fn provider_errors_should_be_classified_by_status() {
        assert_eq!(
            AppError::OpenAiTemporaryError.status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            AppError::OpenAiError("boom".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(AppError::InvalidSecretKey.status_code(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn internal_details_should_not_leak_to_clients() {
        let error = AppError::internal("db password is hunter2");
        assert!(!error.client_message().contains("hunter2"));
    }

    #[tokio::test]
    async fn rate_limit_response_should_include_retry_after_header() {
        // Arrange
        let error = AppError::RateLimitExceeded {
            retry_after_secs: 30,
        };

        // Act
        let response = error.into_response();

        // Assert
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        let retry_after = response.headers().get(header::RETRY_AFTER).unwrap();
        assert_eq!(retry_after.to_str().unwrap(), "30");
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["isSuccess"], false);
        assert_eq!(json["code"], "COMMON429");
    }
}
