mod openai;

pub use openai::OpenAiProvider;

use crate::core::config::AppConfig;
use crate::core::error::ProviderError;
use crate::core::message::ChatTurn;
use async_trait::async_trait;
use std::sync::Arc;

/// The completion capability: ordered role-tagged turns in, one final text
/// out. Blocking single-shot; no streaming, and each call is attempted
/// exactly once.
#[async_trait]
pub trait Provider: Send + Sync {
    async fn complete(&self, turns: &[ChatTurn]) -> Result<String, ProviderError>;

    fn model(&self) -> &str;
}

pub fn create_provider(
    config: &AppConfig,
    model_override: Option<&str>,
) -> Result<Arc<dyn Provider>, ProviderError> {
    let api_key = config
        .api_key
        .clone()
        .filter(|k| !k.is_empty())
        .ok_or_else(|| {
            ProviderError::MissingApiKey(
                "REFSCOUT_API_KEY not set. Set via env var or config file.".into(),
            )
        })?;

    let model = model_override
        .map(str::to_string)
        .unwrap_or_else(|| config.chat.model.clone());

    Ok(Arc::new(OpenAiProvider::new(
        api_key,
        model,
        config.base_url.clone(),
        config.chat.max_tokens,
    )))
}
