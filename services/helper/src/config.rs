use iep_helper_core::Mode;
use iep_helper_core::llm_client::CompletionOptions;
use std::path::PathBuf;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingVar(String),
    #[error("Invalid value for environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Defines the supported completion service providers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Provider {
    OpenAI,
    Gemini,
}

impl Provider {
    /// Base URL of the provider's OpenAI-compatible endpoint.
    pub fn api_base(&self) -> &'static str {
        match self {
            Provider::OpenAI => "https://api.openai.com/v1",
            Provider::Gemini => "https://generativelanguage.googleapis.com/v1beta/openai",
        }
    }

    fn key_var(&self) -> &'static str {
        match self {
            Provider::OpenAI => "OPENAI_API_KEY",
            Provider::Gemini => "GEMINI_API_KEY",
        }
    }
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub mode: Mode,
    pub provider: Provider,
    pub openai_api_key: Option<String>,
    pub gemini_api_key: Option<String>,
    pub chat_model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub log_level: Level,
    pub prompts_path: PathBuf,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// Only the online mode needs an API key; offline always succeeds unless
    /// a variable that is set holds an unparsable value.
    pub fn from_env(mode: Mode) -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        let provider_str =
            std::env::var("COMPLETION_PROVIDER").unwrap_or_else(|_| "openai".to_string());
        let provider = match provider_str.to_lowercase().as_str() {
            "openai" => Provider::OpenAI,
            "gemini" => Provider::Gemini,
            other => {
                return Err(ConfigError::InvalidValue(
                    "COMPLETION_PROVIDER".to_string(),
                    format!("'{}' is not a supported provider", other),
                ));
            }
        };

        let openai_api_key = std::env::var("OPENAI_API_KEY").ok();
        let gemini_api_key = std::env::var("GEMINI_API_KEY").ok();

        let chat_model = std::env::var("CHAT_MODEL").unwrap_or_else(|_| "gpt-4o".to_string());

        let defaults = CompletionOptions::default();
        let max_tokens = match std::env::var("MAX_TOKENS") {
            Ok(raw) => raw
                .parse::<u32>()
                .ok()
                .filter(|v| *v > 0)
                .ok_or_else(|| {
                    ConfigError::InvalidValue(
                        "MAX_TOKENS".to_string(),
                        format!("'{}' is not a positive integer", raw),
                    )
                })?,
            Err(_) => defaults.max_tokens,
        };

        let temperature = match std::env::var("TEMPERATURE") {
            Ok(raw) => raw
                .parse::<f32>()
                .ok()
                .filter(|v| (0.0..=2.0).contains(v))
                .ok_or_else(|| {
                    ConfigError::InvalidValue(
                        "TEMPERATURE".to_string(),
                        format!("'{}' is not a number between 0 and 2", raw),
                    )
                })?,
            Err(_) => defaults.temperature,
        };

        let log_level_str = std::env::var("RUST_LOG").unwrap_or_else(|_| "ERROR".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        let prompts_path = std::env::var("PROMPTS_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./prompts"));

        let config = Self {
            mode,
            provider,
            openai_api_key,
            gemini_api_key,
            chat_model,
            max_tokens,
            temperature,
            log_level,
            prompts_path,
        };

        if mode == Mode::Online {
            let var = config.provider.key_var();
            match config.api_key() {
                None => {
                    return Err(ConfigError::MissingVar(format!(
                        "{} must be set for online mode with the '{:?}' provider",
                        var, config.provider
                    )));
                }
                Some(key) if key.trim().is_empty() => {
                    return Err(ConfigError::InvalidValue(
                        var.to_string(),
                        "API key is blank".to_string(),
                    ));
                }
                Some(_) => {}
            }
        }

        Ok(config)
    }

    /// The API key for the selected provider, if one was given.
    pub fn api_key(&self) -> Option<&str> {
        match self.provider {
            Provider::OpenAI => self.openai_api_key.as_deref(),
            Provider::Gemini => self.gemini_api_key.as_deref(),
        }
    }

    pub fn completion_options(&self) -> CompletionOptions {
        CompletionOptions {
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        }
    }
}
