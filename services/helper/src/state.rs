//! Shared Helper State
//!
//! Everything that lives for the whole process: the responder (offline or
//! wired to a completion service), the prompt templates, and the outline
//! context policy. Per-session state lives in the REPL.

use crate::config::{Config, ConfigError};
use async_openai::config::OpenAIConfig;
use iep_helper_core::{
    Mode,
    llm_client::{CompletionClient, OpenAICompatibleClient},
    prompts::Prompts,
    responder::Responder,
    tools::ContextPolicy,
};
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub struct HelperState {
    pub responder: Arc<Responder>,
    pub prompts: Arc<Prompts>,
    pub context_policy: ContextPolicy,
}

impl HelperState {
    pub fn new(
        config: &Config,
        prompts: Prompts,
        context_policy: ContextPolicy,
    ) -> Result<Self, ConfigError> {
        let responder = build_responder(config, &prompts)?;
        Ok(Self {
            responder: Arc::new(responder),
            prompts: Arc::new(prompts),
            context_policy,
        })
    }
}

/// Builds the responder for the configured mode and provider.
pub fn build_responder(config: &Config, prompts: &Prompts) -> Result<Responder, ConfigError> {
    match config.mode {
        Mode::Offline => {
            info!("Using offline responder.");
            Ok(Responder::offline())
        }
        Mode::Online => {
            info!(provider = ?config.provider, model = %config.chat_model, "Using online responder.");
            let api_key = config
                .api_key()
                .ok_or_else(|| ConfigError::MissingVar(format!("{:?} API key", config.provider)))?;
            let openai_config = OpenAIConfig::new()
                .with_api_key(api_key)
                .with_api_base(config.provider.api_base());
            let client: Arc<dyn CompletionClient> = Arc::new(OpenAICompatibleClient::new(
                openai_config,
                config.chat_model.clone(),
            ));
            Ok(Responder::online(
                client,
                prompts.system_prompt().to_string(),
                config.completion_options(),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Provider;
    use std::path::PathBuf;
    use tracing::Level;

    fn config(mode: Mode, key: Option<&str>) -> Config {
        Config {
            mode,
            provider: Provider::OpenAI,
            openai_api_key: key.map(str::to_string),
            gemini_api_key: None,
            chat_model: "gpt-4o".to_string(),
            max_tokens: 500,
            temperature: 0.7,
            log_level: Level::ERROR,
            prompts_path: PathBuf::from("./prompts"),
        }
    }

    #[test]
    fn test_offline_mode_builds_offline_responder() {
        let responder = build_responder(&config(Mode::Offline, None), &Prompts::default()).unwrap();
        assert!(!responder.is_online());
    }

    #[test]
    fn test_online_mode_builds_online_responder() {
        let state = HelperState::new(
            &config(Mode::Online, Some("sk-test")),
            Prompts::default(),
            ContextPolicy::RoleTagged,
        )
        .unwrap();
        assert!(state.responder.is_online());
        assert_eq!(state.context_policy, ContextPolicy::RoleTagged);
    }

    #[test]
    fn test_online_mode_without_key_is_a_config_error() {
        let result = build_responder(&config(Mode::Online, None), &Prompts::default());
        assert!(matches!(result, Err(ConfigError::MissingVar(_))));
    }
}
