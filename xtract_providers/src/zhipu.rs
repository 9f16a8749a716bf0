//! Zhipu GLM chat provider.

use crate::retry::retry_with_backoff;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::info;
use xtract_character::{ChatMessage, ChatParams, ChatProvider, ChatReply, Usage};

const DEFAULT_BASE_URL: &str = "https://open.bigmodel.cn/api/paas/v4";

/// Backoff schedule in seconds for transient API failures.
const RETRY_DELAYS: [u64; 4] = [2, 4, 6, 10];

pub struct ZhipuProvider {
    client: Client,
    api_key: String,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletion {
    choices: Vec<Choice>,
    usage: Option<UsagePayload>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: String,
}

#[derive(Debug, Deserialize)]
struct UsagePayload {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}

impl ZhipuProvider {
    #[must_use]
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Point the provider at a different API endpoint (tests, proxies).
    #[must_use]
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    fn build_request(messages: &[ChatMessage], params: &ChatParams) -> serde_json::Value {
        json!({
            "model": params.model,
            "messages": messages,
            "max_tokens": params.max_tokens,
            "temperature": params.temperature,
        })
    }

    async fn try_send(&self, request: &serde_json::Value) -> anyhow::Result<ChatReply> {
        let completion = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await?
            .error_for_status()?
            .json::<ChatCompletion>()
            .await?;

        let content = completion
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| anyhow::anyhow!("Invalid response format: no choices"))?;

        Ok(ChatReply {
            content,
            usage: completion.usage.map(|u| Usage {
                prompt_tokens: u.prompt_tokens,
                completion_tokens: u.completion_tokens,
                total_tokens: u.total_tokens,
            }),
        })
    }
}

#[async_trait]
impl ChatProvider for ZhipuProvider {
    async fn chat(&self, messages: &[ChatMessage], params: &ChatParams) -> anyhow::Result<ChatReply> {
        let request = Self::build_request(messages, params);

        info!("Sending request to Zhipu API: model={}", params.model);
        let reply = retry_with_backoff(|| self.try_send(&request), &RETRY_DELAYS).await?;
        info!("Received response from Zhipu API");

        Ok(reply)
    }

    fn default_model(&self) -> &'static str {
        "glm-4-flash"
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn completion_payload_deserializes() {
        let raw = r#"{
            "choices": [ { "message": { "role": "assistant", "content": "hi" } } ],
            "usage": { "prompt_tokens": 3, "completion_tokens": 5, "total_tokens": 8 }
        }"#;

        let completion: ChatCompletion = serde_json::from_str(raw).unwrap();
        assert_eq!(completion.choices[0].message.content, "hi");
        assert_eq!(completion.usage.unwrap().total_tokens, 8);
    }

    #[test]
    fn missing_usage_is_tolerated() {
        let raw = r#"{ "choices": [ { "message": { "content": "hi" } } ] }"#;
        let completion: ChatCompletion = serde_json::from_str(raw).unwrap();
        assert!(completion.usage.is_none());
    }

    #[test]
    fn request_carries_sampling_parameters() {
        let messages = [ChatMessage {
            role: xtract_character::Role::User,
            content: "hi".to_string(),
        }];
        let params = ChatParams {
            model: "glm-4-flash".to_string(),
            max_tokens: 8192,
            temperature: 0.7,
        };

        let request = ZhipuProvider::build_request(&messages, &params);
        assert_eq!(request["model"], "glm-4-flash");
        assert_eq!(request["max_tokens"], 8192);
        assert_eq!(request["temperature"], 0.7);
    }
}
