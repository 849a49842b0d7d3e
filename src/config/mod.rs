use anyhow::{Context, Result};
use fs_err as fs;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

use crate::cli::{GlobalArgs, ProviderKind};
use crate::errors::ForgeError;

pub const DEFAULT_CONFIG_FILE: &str = "prd_forge.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub provider: ProviderKind,
    /// Model identifier; each provider has its own default.
    pub model: Option<String>,
    pub timeout_secs: u64,
    pub out_dir: String,
    /// Override for the provider's API base URL.
    pub api_base: Option<String>,
    pub ollama_url: String,
    pub save_prompts: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            provider: ProviderKind::Gemini,
            model: None,
            timeout_secs: 2400,
            out_dir: ".".into(),
            api_base: None,
            ollama_url: "http://localhost:11434".into(),
            save_prompts: false,
        }
    }
}

impl ProviderKind {
    pub fn default_model(self) -> &'static str {
        match self {
            ProviderKind::Gemini => "gemini-1.5-flash",
            ProviderKind::OpenAI => "gpt-4.1-mini",
            ProviderKind::Anthropic => "claude-3-5-sonnet-latest",
            ProviderKind::Ollama => "llama3.1",
        }
    }

    /// Environment variable holding the provider credential, if it needs one.
    pub fn credential_var(self) -> Option<&'static str> {
        match self {
            ProviderKind::Gemini => Some("GOOGLE_API_KEY"),
            ProviderKind::OpenAI => Some("OPENAI_API_KEY"),
            ProviderKind::Anthropic => Some("ANTHROPIC_API_KEY"),
            ProviderKind::Ollama => None,
        }
    }
}

impl Config {
    /// Defaults, then the TOML file (explicit path, or ./prd_forge.toml if present), then CLI flags.
    pub fn load(args: &GlobalArgs) -> Result<Config> {
        let mut cfg = match &args.config {
            Some(path) => Self::from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).is_file() => Self::from_file(Path::new(DEFAULT_CONFIG_FILE))?,
            None => Config::default(),
        };
        cfg.apply_args(args);
        debug!(provider = ?cfg.provider, model = %cfg.model_name(), out_dir = %cfg.out_dir, "config loaded");
        Ok(cfg)
    }

    pub fn from_file(path: &Path) -> Result<Config> {
        let raw = fs::read_to_string(path)?;
        Self::from_toml(&raw).with_context(|| format!("invalid config file {}", path.display()))
    }

    pub fn from_toml(raw: &str) -> Result<Config> {
        Ok(toml::from_str(raw)?)
    }

    pub fn apply_args(&mut self, args: &GlobalArgs) {
        if let Some(p) = args.provider {
            if p != self.provider {
                // a model chosen for another provider would not resolve
                self.model = None;
            }
            self.provider = p;
        }
        if let Some(m) = &args.model {
            self.model = Some(m.clone());
        }
        if let Some(t) = args.timeout_secs {
            self.timeout_secs = t;
        }
        if let Some(d) = &args.out_dir {
            self.out_dir = d.clone();
        }
        if args.save_prompts {
            self.save_prompts = true;
        }
    }

    pub fn model_name(&self) -> &str {
        self.model.as_deref().unwrap_or(self.provider.default_model())
    }
}

/// Load a local `.env` file into the process environment, if there is one.
pub fn load_env_file() {
    match dotenvy::dotenv() {
        Ok(path) => debug!(path = %path.display(), "loaded env file"),
        Err(e) if e.not_found() => debug!("no .env file"),
        Err(e) => tracing::warn!(error = %e, "could not read .env file"),
    }
}

/// Resolve the provider credential from the environment.
pub fn credential(kind: ProviderKind) -> Result<Option<String>, ForgeError> {
    credential_from(kind, |var| std::env::var(var).ok())
}

pub fn credential_from(
    kind: ProviderKind,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<Option<String>, ForgeError> {
    let Some(var) = kind.credential_var() else {
        return Ok(None);
    };
    match lookup(var) {
        Some(v) if !v.trim().is_empty() => Ok(Some(v.trim().to_string())),
        _ => Err(ForgeError::Configuration(format!("{var} not set in environment or .env file."))),
    }
}
