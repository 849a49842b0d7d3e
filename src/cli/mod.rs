use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::wire::{AppType, ExportFormat, Language};

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[default]
    #[value(alias = "google")]
    Gemini,
    #[value(name = "openai", alias = "open-ai")]
    OpenAI,
    Anthropic,
    Ollama,
}

#[derive(Parser, Debug)]
#[command(name = "prd_forge", version, about = "Generate a PRD from an app idea, then a phased implementation plan from the PRD")]
pub struct Args {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(ClapArgs, Debug, Default, Clone)]
pub struct GlobalArgs {
    #[arg(long, global = true, value_enum)]
    pub provider: Option<ProviderKind>,

    #[arg(long, global = true)]
    pub model: Option<String>,

    #[arg(long, global = true)]
    pub timeout_secs: Option<u64>,

    /// Directory exported documents are written to.
    #[arg(long, global = true)]
    pub out_dir: Option<String>,

    /// TOML config file (defaults to ./prd_forge.toml when present).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Save each prompt and response as JSON under <out_dir>/.prd_forge/runs.
    #[arg(long, global = true, default_value_t = false)]
    pub save_prompts: bool,

    #[arg(long, global = true, default_value_t = false)]
    pub debug: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate a Product Requirements Document.
    Prd(PrdArgs),
    /// Generate an implementation plan from an existing PRD.
    Plan(PlanArgs),
    /// Two-step interactive session (default).
    Interactive,
}

#[derive(ClapArgs, Debug)]
pub struct PrdArgs {
    #[arg(long)]
    pub name: String,

    #[arg(long)]
    pub description: String,

    #[arg(long, value_enum, default_value_t = AppType::WebApp)]
    pub app_type: AppType,

    #[arg(long, value_enum, default_value_t = Language::English)]
    pub language: Language,

    #[arg(long, value_enum, default_value_t = ExportFormat::Markdown)]
    pub format: ExportFormat,

    #[arg(long, default_value_t = false)]
    pub no_export: bool,

    /// Continue with an implementation plan built from the generated PRD.
    #[arg(long, default_value_t = false)]
    pub with_plan: bool,

    /// Plan language when --with-plan is set (defaults to --language).
    #[arg(long, value_enum)]
    pub plan_language: Option<Language>,
}

#[derive(ClapArgs, Debug)]
pub struct PlanArgs {
    /// PRD to plan from; read from stdin when omitted.
    #[arg(long)]
    pub prd_file: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = Language::English)]
    pub language: Language,

    #[arg(long, default_value_t = false)]
    pub no_export: bool,
}
