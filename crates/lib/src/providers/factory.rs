//! # AI Provider Factory
//!
//! Builds provider clients from the `providers` section of the configuration so
//! that the server and tests construct them the same way.

use crate::{
    errors::PromptError,
    providers::ai::{gemini::GeminiProvider, local::LocalAiProvider, AiProvider},
    types::ProviderConfig,
};
use std::time::Duration;
use tracing::info;

/// The base of the Gemini `generateContent` endpoint.
pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Creates an AI provider instance from a named provider configuration.
///
/// - `gemini` requires an `api_key`; the URL is derived from `model_name` when absent.
/// - `local` requires an `api_url` and passes the model name through.
pub fn create_provider(
    name: &str,
    provider_config: &ProviderConfig,
) -> Result<Box<dyn AiProvider>, PromptError> {
    let timeout = provider_config.timeout_secs.map(Duration::from_secs);
    let provider: Box<dyn AiProvider> = match provider_config.provider.as_str() {
        "gemini" => {
            let api_key = provider_config
                .api_key
                .clone()
                .filter(|key| !key.is_empty())
                .ok_or_else(|| {
                    PromptError::MissingAiProvider(format!(
                        "api_key is required for gemini provider '{name}'"
                    ))
                })?;
            let api_url = provider_config
                .api_url
                .clone()
                .filter(|url| !url.is_empty())
                .unwrap_or_else(|| {
                    format!(
                        "{GEMINI_API_BASE}/{}:generateContent",
                        provider_config.model_name
                    )
                });
            info!("Configuring Gemini provider '{}' with URL: {}", name, api_url);
            let mut gemini = GeminiProvider::new(api_url, api_key)?;
            if let Some(timeout) = timeout {
                gemini = gemini.with_timeout(timeout)?;
            }
            Box::new(gemini)
        }
        "local" => {
            let api_url = provider_config
                .api_url
                .clone()
                .filter(|url| !url.is_empty())
                .ok_or_else(|| {
                    PromptError::MissingAiProvider(format!(
                        "api_url is required for local provider '{name}'. Please set LOCAL_AI_API_URL in your .env file."
                    ))
                })?;
            info!("Configuring local AI provider '{}' with URL: {}", name, api_url);
            let mut local = LocalAiProvider::new(
                api_url,
                provider_config.api_key.clone().filter(|key| !key.is_empty()),
                Some(provider_config.model_name.clone()),
            )?;
            if let Some(timeout) = timeout {
                local = local.with_timeout(timeout)?;
            }
            Box::new(local)
        }
        other => {
            return Err(PromptError::MissingAiProvider(format!(
                "Unsupported AI provider type '{other}' for provider '{name}'"
            )))
        }
    };

    Ok(provider)
}
