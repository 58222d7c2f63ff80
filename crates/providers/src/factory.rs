//! Provider factory: builds the configured backend.

use std::sync::Arc;
use std::time::Duration;

use toolloop_config::AppConfig;
use toolloop_core::error::ProviderError;
use toolloop_core::provider::Provider;
use tracing::debug;

use crate::openai_compat::OpenAiCompatProvider;

/// Build the provider named in the configuration.
///
/// Hosted backends need an API key; local ones (ollama, vllm, llama.cpp)
/// do not. Unknown provider names require an explicit `api_url`.
pub fn build_from_config(config: &AppConfig) -> Result<Arc<dyn Provider>, ProviderError> {
    let name = config.provider.as_str();

    let base_url = match (&config.api_url, default_base_url(name)) {
        (Some(url), _) => url.clone(),
        (None, Some(url)) => url.to_string(),
        (None, None) => {
            return Err(ProviderError::NotConfigured(format!(
                "unknown provider '{name}' and no api_url set"
            )));
        }
    };

    let api_key = match &config.api_key {
        Some(key) => key.clone(),
        None if is_local(name) => name.to_string(),
        None => {
            return Err(ProviderError::NotConfigured(format!(
                "no API key for '{name}'; set TOOLLOOP_API_KEY or api_key in config.toml"
            )));
        }
    };

    let provider = OpenAiCompatProvider::new(
        name,
        base_url,
        api_key,
        Duration::from_secs(config.request_timeout_secs),
    )?;
    debug!(provider = name, base_url = provider.base_url(), "Built provider");
    Ok(Arc::new(provider))
}

/// Get the default base URL for well-known providers.
pub fn default_base_url(provider_name: &str) -> Option<&'static str> {
    let url = match provider_name {
        "openai" => "https://api.openai.com/v1",
        "openrouter" => "https://openrouter.ai/api/v1",
        "ollama" => "http://localhost:11434/v1",
        "deepseek" => "https://api.deepseek.com/v1",
        "groq" => "https://api.groq.com/openai/v1",
        "together" => "https://api.together.xyz/v1",
        "fireworks" => "https://api.fireworks.ai/inference/v1",
        "vllm" => "http://localhost:8000/v1",
        "llamacpp" | "llama.cpp" => "http://localhost:8080/v1",
        _ => return None,
    };
    Some(url)
}

fn is_local(provider_name: &str) -> bool {
    matches!(provider_name, "ollama" | "vllm" | "llamacpp" | "llama.cpp")
}
