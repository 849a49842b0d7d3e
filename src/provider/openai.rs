use async_trait::async_trait;
use anyhow::{anyhow, Context, Result};
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use super::non_blank;

pub const API_BASE: &str = "https://api.openai.com";

/// OpenAI chat completions; the prompt goes out as one user message.
pub struct OpenAIProvider {
    pub model: String,
    pub api_key: String,
    pub api_base: String,
    pub client: Client,
}

#[derive(Deserialize)]
struct ChatMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

fn request_body(model: &str, prompt: &str) -> Value {
    json!({
        "model": model,
        "messages": [
            {
                "role": "user",
                "content": prompt
            }
        ]
    })
}

fn extract_text(body: &str) -> Result<Option<String>> {
    let parsed: ChatResponse = serde_json::from_str(body)
        .map_err(|e| anyhow!("Failed to parse OpenAI response: {e}\nRaw: {body}"))?;
    Ok(parsed
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .and_then(non_blank))
}

#[async_trait]
impl super::Provider for OpenAIProvider {
    fn name(&self) -> &str {
        "openai"
    }

    async fn complete(&self, prompt: &str) -> Result<Option<String>> {
        let url = format!("{}/v1/chat/completions", self.api_base.trim_end_matches('/'));
        debug!(%url, model = %self.model, "openai: POST");

        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request_body(&self.model, prompt))
            .send()
            .await
            .context("openai request failed")?;

        let status = resp.status();
        let text = resp.text().await?;
        debug!(%status, body_len = text.len(), "openai: response");

        if !status.is_success() {
            return Err(anyhow!("OpenAI API error ({}): {}", status, text));
        }
        extract_text(&text)
    }
}
