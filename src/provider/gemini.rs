use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{non_blank, Provider};

pub const API_BASE: &str = "https://generativelanguage.googleapis.com";

pub struct Gemini {
    pub model: String,
    pub api_key: String,
    pub api_base: String,
    pub client: Client,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<PartOut>,
}

#[derive(Deserialize)]
struct PartOut {
    #[serde(default)]
    text: String,
}

fn request_body(prompt: &str) -> GenerateRequest<'_> {
    GenerateRequest {
        contents: vec![Content { role: "user", parts: vec![Part { text: prompt }] }],
    }
}

/// Joins the text parts of the first candidate. Blocked prompts come back without candidates.
fn extract_text(body: &str) -> Result<Option<String>> {
    let parsed: GenerateResponse = serde_json::from_str(body)
        .map_err(|e| anyhow!("gemini response parse error: {}", e))?;
    let text = parsed
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|c| c.parts.into_iter().map(|p| p.text).collect::<String>())
        .unwrap_or_default();
    Ok(non_blank(text))
}

#[async_trait]
impl Provider for Gemini {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn complete(&self, prompt: &str) -> Result<Option<String>> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.api_base.trim_end_matches('/'),
            self.model
        );
        debug!(%url, prompt_len = prompt.len(), "gemini: POST");

        let resp = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request_body(prompt))
            .send()
            .await
            .context("gemini request failed")?;

        let status = resp.status();
        let text = resp.text().await.context("gemini read body failed")?;
        debug!(%status, body_len = text.len(), "gemini: response");

        if !status.is_success() {
            return Err(anyhow!("Gemini API error ({}): {}", status, text));
        }
        extract_text(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_is_a_single_user_turn() {
        let v = serde_json::to_value(request_body("hello")).unwrap();
        assert_eq!(v["contents"][0]["role"], "user");
        assert_eq!(v["contents"][0]["parts"][0]["text"], "hello");
        assert_eq!(v["contents"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn joins_parts_of_first_candidate() {
        let body = r##"{"candidates":[{"content":{"parts":[{"text":"# PRD"},{"text":"\nbody"}]}},
                        {"content":{"parts":[{"text":"other"}]}}]}"##;
        assert_eq!(extract_text(body).unwrap().as_deref(), Some("# PRD\nbody"));
    }

    #[test]
    fn blocked_prompt_has_no_text() {
        let body = r#"{"promptFeedback":{"blockReason":"SAFETY"}}"#;
        assert_eq!(extract_text(body).unwrap(), None);
        let no_content = r#"{"candidates":[{"finishReason":"SAFETY"}]}"#;
        assert_eq!(extract_text(no_content).unwrap(), None);
    }

    #[test]
    fn garbage_body_is_an_error() {
        assert!(extract_text("<html>").is_err());
    }
}
