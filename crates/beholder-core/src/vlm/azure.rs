//! Azure OpenAI VLM provider using the Chat Completions API.
//!
//! Serves both credential groups: the Azure AI inference endpoint and the
//! Azure OpenAI endpoint speak the same deployment-scoped wire format.
//! The image travels as a data URL in the user message content array.

use super::provider::{VlmProvider, VlmRequest, VlmResponse};
use crate::config::ResolvedCredentials;
use crate::error::DescribeError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Azure OpenAI provider for deployment-scoped chat completions.
pub struct AzureProvider {
    name: String,
    api_key: String,
    deployment: String,
    client: reqwest::Client,
    url: String,
    timeout: Duration,
}

impl AzureProvider {
    /// Build a provider from resolved credentials.
    pub fn new(credentials: &ResolvedCredentials, timeout_ms: u64) -> Self {
        let url = format!(
            "{}/openai/deployments/{}/chat/completions?api-version={}",
            credentials.endpoint.trim_end_matches('/'),
            credentials.deployment,
            credentials.api_version,
        );
        Self {
            name: format!("azure/{}", credentials.label),
            api_key: credentials.api_key.clone(),
            deployment: credentials.deployment.clone(),
            client: reqwest::Client::new(),
            url,
            timeout: Duration::from_millis(timeout_ms),
        }
    }

    /// Full request URL (deployment and api-version baked in).
    pub fn url(&self) -> &str {
        &self.url
    }
}

// --- Request types ---

#[derive(Serialize)]
struct ChatRequest {
    // Azure routes by deployment in the URL but still accepts the field
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: Vec<ChatContent>,
}

#[derive(Serialize)]
#[serde(tag = "type")]
enum ChatContent {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(rename = "image_url")]
    ImageUrl { image_url: ImageUrl },
}

#[derive(Serialize)]
struct ImageUrl {
    url: String,
}

// --- Response types ---

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
    model: String,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[async_trait]
impl VlmProvider for AzureProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn generate(&self, request: &VlmRequest) -> Result<VlmResponse, DescribeError> {
        let start = Instant::now();

        let body = ChatRequest {
            model: self.deployment.clone(),
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: vec![
                    ChatContent::Text {
                        text: request.prompt.clone(),
                    },
                    ChatContent::ImageUrl {
                        image_url: ImageUrl {
                            url: request.image.data_url(),
                        },
                    },
                ],
            }],
        };

        let resp = self
            .client
            .post(&self.url)
            .header("api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&body)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| DescribeError::Vlm {
                message: format!("Azure request failed: {e}"),
                status_code: None,
            })?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(DescribeError::Vlm {
                message: format!("Azure HTTP {status}: {text}"),
                status_code: Some(status.as_u16()),
            });
        }

        let chat_resp: ChatResponse = resp.json().await.map_err(|e| DescribeError::Vlm {
            message: format!("Failed to parse Azure response: {e}"),
            status_code: None,
        })?;

        let text = chat_resp
            .choices
            .first()
            .and_then(|c| c.message.content.clone())
            .ok_or_else(|| DescribeError::Vlm {
                message: "Azure returned empty choices array, no content generated".to_string(),
                status_code: None,
            })?;

        Ok(VlmResponse {
            text: text.trim().to_string(),
            model: chat_resp.model,
            latency_ms: start.elapsed().as_millis() as u64,
        })
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credentials() -> ResolvedCredentials {
        ResolvedCredentials {
            label: "inference",
            endpoint: "https://unit.openai.azure.com/".to_string(),
            api_key: "key".to_string(),
            deployment: "gpt-4o".to_string(),
            api_version: "2024-06-01".to_string(),
        }
    }

    #[test]
    fn test_url_includes_deployment_and_version() {
        let provider = AzureProvider::new(&credentials(), 60_000);
        assert_eq!(
            provider.url(),
            "https://unit.openai.azure.com/openai/deployments/gpt-4o/chat/completions?api-version=2024-06-01"
        );
    }

    #[test]
    fn test_name_carries_group_label() {
        let provider = AzureProvider::new(&credentials(), 60_000);
        assert_eq!(provider.name(), "azure/inference");
    }

    #[test]
    fn test_timeout_from_config() {
        let provider = AzureProvider::new(&credentials(), 1_500);
        assert_eq!(provider.timeout(), Duration::from_millis(1_500));
    }
}
