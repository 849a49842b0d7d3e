use chrono::Local;
use tracing::{debug, warn};

use crate::provider::DynProvider;
use crate::wire::{Fallback, GeneratedDocument};

/// Shown whenever the service gave us nothing to display.
pub const PLACEHOLDER: &str = "⚠️ No response from the model.";

/// Outcome of one generation call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Generation {
    Text(String),
    Empty,
    Failed(String),
}

impl Generation {
    /// Converts to a displayable document; `Empty` and `Failed` become the placeholder.
    pub fn into_document(self) -> GeneratedDocument {
        let (text, fallback) = match self {
            Generation::Text(t) => (t, None),
            Generation::Empty => (PLACEHOLDER.to_string(), Some(Fallback::EmptyResponse)),
            Generation::Failed(reason) => (PLACEHOLDER.to_string(), Some(Fallback::ServiceError(reason))),
        };
        GeneratedDocument { text, created_at: Local::now(), fallback }
    }
}

/// Single-shot client over a configured provider. No retries.
pub struct GenerationClient {
    provider: DynProvider,
}

impl GenerationClient {
    pub fn new(provider: DynProvider) -> Self {
        Self { provider }
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    pub async fn generate(&self, prompt: &str) -> Generation {
        debug!(provider = self.provider.name(), prompt_len = prompt.len(), "generate: called");
        match self.provider.complete(prompt).await {
            Ok(Some(text)) if !text.trim().is_empty() => {
                debug!(len = text.len(), "generate: got text");
                Generation::Text(text)
            }
            Ok(_) => {
                warn!(provider = self.provider.name(), "generate: empty response");
                Generation::Empty
            }
            Err(e) => {
                warn!(provider = self.provider.name(), error = %format!("{e:#}"), "generate: call failed");
                Generation::Failed(format!("{e:#}"))
            }
        }
    }
}
