use chrono::{DateTime, Local};
use fs_err as fs;
use serde::Serialize;
use serde_json::to_string_pretty;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use crate::wire::{Fallback, GeneratedDocument};

/// Logs go to stderr so stdout carries only documents. `RUST_LOG` wins over `debug`.
pub fn init_tracing(debug: bool) {
    let level = if debug { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("prd_forge={level}")));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

pub fn run_dir(root: &Path, session: Uuid) -> PathBuf {
    root.join(".prd_forge").join("runs").join(session.to_string())
}

#[derive(Serialize)]
struct StageRecord<'a> {
    stage: &'a str,
    prompt: &'a str,
    response: &'a str,
    created_at: DateTime<Local>,
    #[serde(skip_serializing_if = "Option::is_none")]
    fallback: Option<&'a Fallback>,
}

/// Writes `<dir>/<stage>.json`; repeated stages get a numeric suffix.
pub fn save_stage(dir: &Path, stage: &str, prompt: &str, doc: &GeneratedDocument) -> anyhow::Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let mut path = dir.join(format!("{stage}.json"));
    let mut n = 1;
    while path.exists() {
        n += 1;
        path = dir.join(format!("{stage}.{n}.json"));
    }
    let record = StageRecord {
        stage,
        prompt,
        response: &doc.text,
        created_at: doc.created_at,
        fallback: doc.fallback.as_ref(),
    };
    fs::write(&path, to_string_pretty(&record)?)?;
    Ok(path)
}
