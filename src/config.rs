use std::env;
use std::time::Duration;

/// Default completion model for offer and ad generation
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o";

/// Default model for the input-editing pre-pass
pub const DEFAULT_EDITOR_MODEL: &str = "gpt-4o-mini";

/// Application configuration loaded from the environment
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server_host: String,
    pub server_port: u16,
    pub openai_api_key: String,
    pub openai_api_base: Option<String>,
    pub app_secret_key: String,
    pub openai_model: String,
    pub editor_model: String,
    /// Run the editor model over free-text inputs before prompt assembly
    pub enhance_inputs: bool,
    pub rate_limit_max_requests: u32,
    pub rate_limit_window: Duration,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let server_host = env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());

        let server_port = env::var("SERVER_PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidPort)?;

        let openai_api_key =
            env::var("OPENAI_API_KEY").map_err(|_| ConfigError::Missing("OPENAI_API_KEY"))?;
        let openai_api_base = env::var("OPENAI_API_BASE").ok().filter(|s| !s.is_empty());

        let app_secret_key =
            env::var("APP_SECRET_KEY").map_err(|_| ConfigError::Missing("APP_SECRET_KEY"))?;

        let openai_model =
            env::var("OPENAI_MODEL").unwrap_or_else(|_| DEFAULT_OPENAI_MODEL.to_string());
        let editor_model =
            env::var("OPENAI_EDITOR_MODEL").unwrap_or_else(|_| DEFAULT_EDITOR_MODEL.to_string());

        let enhance_inputs = match env::var("ENHANCE_INPUTS") {
            Ok(value) => parse_bool(&value).ok_or(ConfigError::InvalidFlag("ENHANCE_INPUTS"))?,
            Err(_) => true,
        };

        let rate_limit_max_requests = env::var("RATE_LIMIT_MAX_REQUESTS")
            .unwrap_or_else(|_| "20".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidNumber("RATE_LIMIT_MAX_REQUESTS"))?;

        let rate_limit_window_secs: u64 = env::var("RATE_LIMIT_WINDOW_SECS")
            .unwrap_or_else(|_| "60".to_string())
            .parse()
            .ok()
            .filter(|secs| *secs > 0)
            .ok_or(ConfigError::InvalidNumber("RATE_LIMIT_WINDOW_SECS"))?;

        Ok(Self {
            server_host,
            server_port,
            openai_api_key,
            openai_api_base,
            app_secret_key,
            openai_model,
            editor_model,
            enhance_inputs,
            rate_limit_max_requests,
            rate_limit_window: Duration::from_secs(rate_limit_window_secs),
        })
    }

    /// Configuration for tests: fixed secret, defaults everywhere else
    pub fn for_test(secret_key: &str) -> Self {
        Self {
            server_host: "127.0.0.1".to_string(),
            server_port: 0,
            openai_api_key: "test-key".to_string(),
            openai_api_base: None,
            app_secret_key: secret_key.to_string(),
            openai_model: DEFAULT_OPENAI_MODEL.to_string(),
            editor_model: DEFAULT_EDITOR_MODEL.to_string(),
            enhance_inputs: true,
            rate_limit_max_requests: 1_000,
            rate_limit_window: Duration::from_secs(60),
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} environment variable is required")]
    Missing(&'static str),
    #[error("Invalid port number")]
    InvalidPort,
    #[error("{0} must be a positive integer")]
    InvalidNumber(&'static str),
    #[error("{0} must be a boolean (true/false)")]
    InvalidFlag(&'static str),
}
