use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{non_blank, Provider};

pub struct Ollama {
    pub model: String,
    pub url: String,
    pub client: Client,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<Msg<'a>>,
    stream: bool,
}

#[derive(Serialize)]
struct Msg<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    message: Option<MsgOut>,
}

#[derive(Deserialize)]
struct MsgOut {
    #[serde(default)]
    content: String,
}

fn request_body<'a>(model: &'a str, prompt: &'a str) -> ChatRequest<'a> {
    ChatRequest {
        model,
        messages: vec![Msg { role: "user", content: prompt }],
        stream: false,
    }
}

fn extract_text(body: &str) -> Result<Option<String>> {
    let parsed: ChatResponse = serde_json::from_str(body)
        .map_err(|e| anyhow!("ollama response parse error: {}", e))?;
    Ok(parsed.message.map(|m| m.content).and_then(non_blank))
}

#[async_trait]
impl Provider for Ollama {
    fn name(&self) -> &str {
        "ollama"
    }

    async fn complete(&self, prompt: &str) -> Result<Option<String>> {
        let url = format!("{}/api/chat", self.url.trim_end_matches('/'));
        debug!(%url, model = %self.model, "ollama: POST");

        let resp = self
            .client
            .post(&url)
            .json(&request_body(&self.model, prompt))
            .send()
            .await
            .context("ollama request failed")?;

        let status = resp.status();
        let text = resp.text().await.context("ollama read body failed")?;
        debug!(%status, body_len = text.len(), "ollama: response");

        if !status.is_success() {
            return Err(anyhow!("Ollama error ({}): {}", status, text));
        }
        extract_text(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_disables_streaming() {
        let v = serde_json::to_value(request_body("llama3.1", "hi")).unwrap();
        assert_eq!(v["stream"], false);
        assert_eq!(v["messages"][0]["role"], "user");
    }

    #[test]
    fn reads_message_content() {
        let body = r#"{"model":"llama3.1","message":{"role":"assistant","content":"ok"},"done":true}"#;
        assert_eq!(extract_text(body).unwrap().as_deref(), Some("ok"));
        assert_eq!(extract_text(r#"{"done":true}"#).unwrap(), None);
    }
}
