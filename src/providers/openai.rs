use async_trait::async_trait;
use reqwest::Client;

use crate::core::error::ProviderError;
use crate::core::message::ChatTurn;
use crate::providers::Provider;

pub struct OpenAiProvider {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
    max_tokens: u64,
}

impl OpenAiProvider {
    pub fn new(api_key: String, model: String, base_url: String, max_tokens: u64) -> Self {
        Self {
            client: Client::new(),
            api_key,
            model,
            base_url,
            max_tokens,
        }
    }

    fn convert_turns(&self, turns: &[ChatTurn]) -> Vec<serde_json::Value> {
        turns
            .iter()
            .map(|t| {
                serde_json::json!({
                    "role": t.role.as_str(),
                    "content": t.content,
                })
            })
            .collect()
    }
}

#[async_trait]
impl Provider for OpenAiProvider {
    async fn complete(&self, turns: &[ChatTurn]) -> Result<String, ProviderError> {
        let body = serde_json::json!({
            "model": self.model,
            "max_tokens": self.max_tokens,
            "messages": self.convert_turns(turns),
        });

        let resp = self
            .client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::Http(e.to_string()))?;

        let status = resp.status().as_u16();
        if !resp.status().is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(ProviderError::Api {
                status,
                message: text,
            });
        }

        let api_resp: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| ProviderError::Http(e.to_string()))?;

        let content = api_resp["choices"][0]["message"]["content"]
            .as_str()
            .map(str::to_string)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| {
                ProviderError::MalformedResponse("no content in first choice".into())
            })?;

        Ok(content)
    }

    fn model(&self) -> &str {
        &self.model
    }
}
