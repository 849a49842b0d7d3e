use chrono::{DateTime, Local};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

/// ========================================
/// Request/response types shared by the workflows
/// ========================================

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AppType {
    WebApp,
    MobileApp,
    Hybrid,
    AiTool,
    IotApp,
}

impl AppType {
    pub const ALL: [AppType; 5] = [
        AppType::WebApp,
        AppType::MobileApp,
        AppType::Hybrid,
        AppType::AiTool,
        AppType::IotApp,
    ];

    pub fn label(self) -> &'static str {
        match self {
            AppType::WebApp => "Web App",
            AppType::MobileApp => "Mobile App",
            AppType::Hybrid => "Hybrid",
            AppType::AiTool => "AI Tool",
            AppType::IotApp => "IoT App",
        }
    }
}

impl fmt::Display for AppType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    English,
    Hindi,
    Telugu,
}

impl Language {
    pub const ALL: [Language; 3] = [Language::English, Language::Hindi, Language::Telugu];

    pub fn label(self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Hindi => "Hindi",
            Language::Telugu => "Telugu",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Markdown,
    Text,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 2] = [ExportFormat::Markdown, ExportFormat::Text];

    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Markdown => "md",
            ExportFormat::Text => "txt",
        }
    }

    pub fn mime(self) -> &'static str {
        match self {
            ExportFormat::Markdown => "text/markdown",
            ExportFormat::Text => "text/plain",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ExportFormat::Markdown => "Markdown",
            ExportFormat::Text => "Text",
        })
    }
}

/// Inputs of the PRD step.
#[derive(Debug, Clone)]
pub struct PrdRequest {
    pub name: String,
    pub description: String,
    pub app_type: AppType,
    pub language: Language,
}

/// Inputs of the implementation-plan step.
#[derive(Debug, Clone)]
pub struct PlanRequest {
    pub source_document: String,
    pub language: Language,
}

/// Why a document carries the placeholder instead of model output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "reason", rename_all = "snake_case")]
pub enum Fallback {
    EmptyResponse,
    ServiceError(String),
}

#[derive(Debug, Clone, Serialize)]
pub struct GeneratedDocument {
    pub text: String,
    pub created_at: DateTime<Local>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback: Option<Fallback>,
}

impl GeneratedDocument {
    pub fn is_placeholder(&self) -> bool {
        self.fallback.is_some()
    }
}
