use std::sync::Arc;
use std::time::Duration;

use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
    },
    Client,
};

use crate::error::AppError;

/// OpenAI call timeout (seconds)
const OPENAI_TIMEOUT_SECS: u64 = 25;

/// Health-check call timeout (seconds)
const HEALTH_CHECK_TIMEOUT_SECS: u64 = 5;

/// One text-completion call: system role, user instruction and sampling limits.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub model: String,
    pub system: String,
    pub user: String,
    pub temperature: f32,
    pub max_tokens: u16,
}

/// Map an OpenAI error to the matching `AppError`
fn classify_openai_error(error: OpenAIError) -> AppError {
    match &error {
        OpenAIError::ApiError(api_err) => {
            // `code` may be any JSON value
            let err_code = api_err
                .code
                .as_ref()
                .and_then(|v| v.as_str())
                .unwrap_or("");
            classify_api_error(
                api_err.r#type.as_deref().unwrap_or(""),
                err_code,
                &api_err.message,
            )
        }
        OpenAIError::Reqwest(req_err) => {
            let status = req_err.status().map(|s| s.as_u16());
            if req_err.is_timeout() || req_err.is_connect() {
                AppError::OpenAiTemporaryError
            } else if status == Some(401) {
                AppError::OpenAiAuthError
            } else if status == Some(429) {
                AppError::OpenAiRateLimitError
            } else if status.is_some_and(|s| (500..600).contains(&s)) {
                AppError::OpenAiTemporaryError
            } else {
                AppError::OpenAiError(req_err.to_string())
            }
        }
        _ => AppError::OpenAiError(error.to_string()),
    }
}

/// Classify a provider API error by its `type`, `code` and message
fn classify_api_error(err_type: &str, err_code: &str, message: &str) -> AppError {
    if err_type == "invalid_request_error"
        && (err_code == "invalid_api_key" || message.contains("API key"))
    {
        AppError::OpenAiAuthError
    } else if err_type == "rate_limit_error"
        || err_code == "rate_limit_exceeded"
        || message.contains("rate limit")
    {
        AppError::OpenAiRateLimitError
    } else if err_type == "server_error" || err_code.contains("server") || message.contains("server")
    {
        AppError::OpenAiTemporaryError
    } else {
        AppError::OpenAiError(message.to_string())
    }
}

/// Text-generation collaborator.
///
/// Abstracts the provider so handlers and services can be tested against mocks.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait AiClientTrait: Send + Sync {
    /// Run one chat completion and return the first choice's text
    async fn complete(&self, request: CompletionRequest) -> Result<String, AppError>;

    /// Minimal generation used by the health endpoint
    async fn health_check(&self) -> Result<String, AppError>;
}

/// Shared, clonable client handle
pub type AiClient = Arc<dyn AiClientTrait>;

/// OpenAI-backed implementation
#[derive(Clone)]
pub struct OpenAiClient {
    client: Client<OpenAIConfig>,
    health_model: String,
}

impl OpenAiClient {
    pub fn new(api_key: &str, api_base: Option<&str>, health_model: &str) -> Self {
        let mut config = OpenAIConfig::new().with_api_key(api_key);
        if let Some(base) = api_base {
            config = config.with_api_base(base);
        }
        Self {
            client: Client::with_config(config),
            health_model: health_model.to_string(),
        }
    }

    async fn chat(
        &self,
        model: &str,
        messages: Vec<ChatCompletionRequestMessage>,
        temperature: Option<f32>,
        max_tokens: u16,
        timeout: Duration,
    ) -> Result<String, AppError> {
        let mut args = CreateChatCompletionRequestArgs::default();
        args.model(model).messages(messages).max_tokens(max_tokens);
        if let Some(temperature) = temperature {
            args.temperature(temperature);
        }
        let request = args.build().map_err(|e| AppError::internal(e.to_string()))?;

        let response = tokio::time::timeout(timeout, self.client.chat().create(request))
            .await
            .map_err(|_| AppError::OpenAiTemporaryError)?
            .map_err(classify_openai_error)?;

        if let Some(usage) = &response.usage {
            tracing::debug!(
                model,
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                "Completion finished"
            );
        }

        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content);
        Ok(reply_text(content))
    }
}

#[async_trait::async_trait]
impl AiClientTrait for OpenAiClient {
    async fn complete(&self, request: CompletionRequest) -> Result<String, AppError> {
        let messages = vec![
            build_system_message(&request.system)?,
            build_user_message(&request.user)?,
        ];

        self.chat(
            &request.model,
            messages,
            Some(request.temperature),
            request.max_tokens,
            Duration::from_secs(OPENAI_TIMEOUT_SECS),
        )
        .await
    }

    async fn health_check(&self) -> Result<String, AppError> {
        let messages = vec![build_system_message("Respond with exactly 'ok'")?];

        self.chat(
            &self.health_model,
            messages,
            None,
            5,
            Duration::from_secs(HEALTH_CHECK_TIMEOUT_SECS),
        )
        .await
    }
}

/// Trimmed reply text. A missing or blank reply is an empty string, left to
/// the caller's fallbacks.
fn reply_text(content: Option<String>) -> String {
    content
        .map(|content| content.trim().to_string())
        .unwrap_or_default()
}

pub(crate) fn build_system_message(content: &str) -> Result<ChatCompletionRequestMessage, AppError> {
    Ok(ChatCompletionRequestMessage::System(
        ChatCompletionRequestSystemMessageArgs::default()
            .content(content)
            .build()
            .map_err(|e| AppError::internal(e.to_string()))?,
    ))
}

pub(crate) fn build_user_message(content: &str) -> Result<ChatCompletionRequestMessage, AppError> {
    Ok(ChatCompletionRequestMessage::User(
        ChatCompletionRequestUserMessageArgs::default()
            .content(content)
            .build()
            .map_err(|e| AppError::internal(e.to_string()))?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_build_messages() {
        assert!(build_system_message("system").is_ok());
        assert!(build_user_message("user").is_ok());
    }

    #[test]
    fn blank_or_missing_reply_should_be_empty_text() {
        assert_eq!(reply_text(Some("  پیشنهاد ویژه \n".to_string())), "پیشنهاد ویژه");
        assert_eq!(reply_text(Some(" \n ".to_string())), "");
        assert_eq!(reply_text(None), "");
    }

    #[test]
    fn invalid_api_key_should_be_auth_error() {
        let error = classify_api_error(
            "invalid_request_error",
            "invalid_api_key",
            "Incorrect API key provided",
        );
        assert!(matches!(error, AppError::OpenAiAuthError));
    }

    #[test]
    fn rate_limit_should_be_rate_limit_error() {
        let error = classify_api_error("rate_limit_error", "", "slow down");
        assert!(matches!(error, AppError::OpenAiRateLimitError));

        let error = classify_api_error("requests", "rate_limit_exceeded", "slow down");
        assert!(matches!(error, AppError::OpenAiRateLimitError));
    }

    #[test]
    fn server_error_should_be_temporary() {
        let error = classify_api_error("server_error", "", "The server had an error");
        assert!(matches!(error, AppError::OpenAiTemporaryError));
    }

    #[test]
    fn unknown_api_error_should_keep_message() {
        let error = classify_api_error("invalid_request_error", "", "context length exceeded");
        assert!(matches!(
            error,
            AppError::OpenAiError(ref m) if m == "context length exceeded"
        ));
    }

    #[test]
    fn should_create_openai_client_with_custom_base() {
        let client = OpenAiClient::new("test-api-key", Some("http://localhost:9999/v1"), "gpt-4o-mini");
        assert_eq!(client.health_model, "gpt-4o-mini");
    }
}
