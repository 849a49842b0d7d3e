use anyhow::Context;
use chrono::NaiveDateTime;
use fs_err as fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::errors::ForgeError;
use crate::wire::ExportFormat;

pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";
pub const PLAN_PREFIX: &str = "ImplementationPlan";

/// Spaces become underscores; path separators too, so the file stays in the target dir.
pub fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            ' ' | '/' | '\\' => '_',
            other => other,
        })
        .collect()
}

pub fn prd_file_name(app_name: &str, at: NaiveDateTime, format: ExportFormat) -> String {
    format!(
        "{}_PRD_{}.{}",
        sanitize_name(app_name),
        at.format(TIMESTAMP_FORMAT),
        format.extension()
    )
}

pub fn plan_file_name(at: NaiveDateTime) -> String {
    format!("{PLAN_PREFIX}_{}.{}", at.format(TIMESTAMP_FORMAT), ExportFormat::Markdown.extension())
}

/// Writes `text` as UTF-8 to `dir/file_name`, creating `dir` when needed.
pub fn write_document(dir: &Path, file_name: &str, text: &str) -> Result<PathBuf, ForgeError> {
    let path = dir.join(file_name);
    fs::create_dir_all(dir)
        .and_then(|_| fs::write(&path, text.as_bytes()))
        .with_context(|| format!("writing {}", path.display()))
        .map_err(|e| ForgeError::Export(format!("{e:#}")))?;
    info!(path = %path.display(), bytes = text.len(), "document exported");
    Ok(path)
}
