use std::env;
use std::time::Duration;

use crate::error::AppError;

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub api_url: String,
    pub temperature: f32,
    pub timeout: Duration,
}

impl GeminiConfig {
    /// Reads the provider configuration from the environment. A missing
    /// API key is fatal; everything else has a default.
    pub fn from_env() -> Result<Self, AppError> {
        let api_key = env::var("GEMINI_API_KEY").map_err(|_| {
            AppError::Config("GEMINI_API_KEY environment variable not set".to_string())
        })?;

        let model = env::var("GEMINI_MODEL").unwrap_or_else(|_| "gemini-2.0-flash".to_string());

        let api_url = env::var("GEMINI_API_URL").unwrap_or_else(|_| {
            "https://generativelanguage.googleapis.com/v1beta/models".to_string()
        });

        let temperature = env::var("GEMINI_TEMPERATURE")
            .ok()
            .and_then(|t| t.parse().ok())
            .unwrap_or(0.7);

        let timeout = env::var("GEMINI_TIMEOUT_SECS")
            .ok()
            .and_then(|t| t.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or_else(|| Duration::from_secs(60));

        Ok(Self {
            api_key,
            model,
            api_url,
            temperature,
            timeout,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Env vars are process-global, so the missing-key and happy paths share
    // one test instead of racing each other.
    #[test]
    fn missing_api_key_is_a_config_error() {
        let saved = env::var("GEMINI_API_KEY").ok();
        env::remove_var("GEMINI_API_KEY");

        let err = GeminiConfig::from_env().unwrap_err();
        assert!(matches!(err, AppError::Config(msg) if msg.contains("GEMINI_API_KEY")));

        env::set_var("GEMINI_API_KEY", "test-key");
        let config = GeminiConfig::from_env().unwrap();
        assert_eq!(config.api_key, "test-key");

        match saved {
            Some(value) => env::set_var("GEMINI_API_KEY", value),
            None => env::remove_var("GEMINI_API_KEY"),
        }
    }
}
