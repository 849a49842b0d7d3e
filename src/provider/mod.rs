use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use crate::cli::ProviderKind;
use crate::config::Config;

pub mod anthropic;
pub mod gemini;
pub mod ollama;
pub mod openai;
#[cfg(test)]
pub mod stub;

/// A text-generation service. `Ok(None)` means the service answered without usable text.
#[async_trait]
pub trait Provider: Send + Sync {
    fn name(&self) -> &str;
    async fn complete(&self, prompt: &str) -> Result<Option<String>>;
}

pub type DynProvider = Box<dyn Provider + Send + Sync>;

pub fn make_provider(cfg: &Config, api_key: Option<String>) -> Result<DynProvider> {
    let model = cfg.model_name().to_string();
    let client = http_client(cfg.timeout_secs)?;
    let key = |kind: ProviderKind| {
        api_key
            .clone()
            .ok_or_else(|| anyhow!("{:?} provider needs {}", kind, kind.credential_var().unwrap_or("an API key")))
    };
    match cfg.provider {
        ProviderKind::Gemini => Ok(Box::new(gemini::Gemini {
            model,
            api_key: key(ProviderKind::Gemini)?,
            api_base: cfg.api_base.clone().unwrap_or_else(|| gemini::API_BASE.into()),
            client,
        })),
        ProviderKind::OpenAI => Ok(Box::new(openai::OpenAIProvider {
            model,
            api_key: key(ProviderKind::OpenAI)?,
            api_base: cfg.api_base.clone().unwrap_or_else(|| openai::API_BASE.into()),
            client,
        })),
        ProviderKind::Anthropic => Ok(Box::new(anthropic::Anthropic {
            model,
            api_key: key(ProviderKind::Anthropic)?,
            api_base: cfg.api_base.clone().unwrap_or_else(|| anthropic::API_BASE.into()),
            api_version: anthropic::API_VERSION.into(),
            client,
        })),
        ProviderKind::Ollama => Ok(Box::new(ollama::Ollama {
            model,
            url: cfg.api_base.clone().unwrap_or_else(|| cfg.ollama_url.clone()),
            client,
        })),
    }
}

fn http_client(timeout_secs: u64) -> Result<Client> {
    Ok(Client::builder().timeout(Duration::from_secs(timeout_secs)).build()?)
}

/// `Some(text)` unless the text is blank.
pub(crate) fn non_blank(text: String) -> Option<String> {
    if text.trim().is_empty() { None } else { Some(text) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_each_provider() {
        for kind in [ProviderKind::Gemini, ProviderKind::OpenAI, ProviderKind::Anthropic] {
            let cfg = Config { provider: kind, ..Config::default() };
            let p = make_provider(&cfg, Some("key".into())).unwrap();
            assert!(!p.name().is_empty());
        }
        let cfg = Config { provider: ProviderKind::Ollama, ..Config::default() };
        assert_eq!(make_provider(&cfg, None).unwrap().name(), "ollama");
    }

    #[test]
    fn keyed_provider_without_key_fails() {
        let cfg = Config::default();
        assert!(make_provider(&cfg, None).is_err());
    }

    #[test]
    fn blank_text_is_not_usable() {
        assert_eq!(non_blank("  \n".into()), None);
        assert_eq!(non_blank(" hi ".into()).as_deref(), Some(" hi "));
    }
}
