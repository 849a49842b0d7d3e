use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{non_blank, Provider};

pub const API_BASE: &str = "https://api.anthropic.com";
pub const API_VERSION: &str = "2023-06-01";

pub struct Anthropic {
    pub model: String,
    pub api_key: String,
    pub api_base: String,
    pub api_version: String,
    pub client: Client,
}

#[derive(Serialize)]
struct MsgRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<Msg<'a>>,
}

#[derive(Serialize)]
struct Msg<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct MsgResponse {
    #[serde(default)]
    content: Vec<Block>,
}

#[derive(Deserialize)]
struct Block {
    #[serde(default)]
    text: String,
    #[serde(default)]
    r#type: String,
}

fn request_body<'a>(model: &'a str, prompt: &'a str) -> MsgRequest<'a> {
    MsgRequest {
        model,
        max_tokens: 8192,
        messages: vec![Msg { role: "user", content: prompt }],
    }
}

fn extract_text(body: &str) -> Result<Option<String>> {
    let parsed: MsgResponse = serde_json::from_str(body)
        .map_err(|e| anyhow!("anthropic response parse error: {}", e))?;
    let text = parsed
        .content
        .into_iter()
        .filter(|b| b.r#type == "text")
        .map(|b| b.text)
        .collect::<String>();
    Ok(non_blank(text))
}

#[async_trait]
impl Provider for Anthropic {
    fn name(&self) -> &str {
        "anthropic"
    }

    async fn complete(&self, prompt: &str) -> Result<Option<String>> {
        let url = format!("{}/v1/messages", self.api_base.trim_end_matches('/'));
        debug!(%url, model = %self.model, "anthropic: POST");

        let resp = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", &self.api_version)
            .json(&request_body(&self.model, prompt))
            .send()
            .await
            .context("anthropic request failed")?;

        let status = resp.status();
        let text = resp.text().await.context("anthropic read body failed")?;
        debug!(%status, body_len = text.len(), "anthropic: response");

        if !status.is_success() {
            return Err(anyhow!("Anthropic API error ({}): {}", status, text));
        }
        extract_text(&text)
    }
}
