//! PRD and implementation-plan workflows.
//!
//! Both run `AwaitingInput → Validating → Generating → Ready → Exported`. A failed
//! validation (or a session without a configured client) drops back to
//! `AwaitingInput` before any call is made. `Exported` is not terminal: a new
//! submit starts over and replaces the previous document.

use tracing::{debug, warn};

use crate::errors::ForgeError;
use crate::session::Session;
use crate::wire::GeneratedDocument;

mod plan;
mod prd;

pub use plan::PlanWorkflow;
pub use prd::PrdWorkflow;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    AwaitingInput,
    Validating,
    Generating,
    Ready,
    Exported,
}

impl Stage {
    pub fn can_export(self) -> bool {
        matches!(self, Stage::Ready | Stage::Exported)
    }
}

fn move_to(stage: &mut Stage, next: Stage, workflow: &str) {
    debug!(workflow, from = ?*stage, to = ?next, "stage transition");
    *stage = next;
}

/// Generating step shared by both workflows: one call, then optional artifact capture.
async fn generate(session: &Session, stage_name: &str, prompt: &str) -> Result<GeneratedDocument, ForgeError> {
    let client = session.generator()?;
    let doc = client.generate(prompt).await.into_document();
    if let Some(dir) = session.artifacts_dir() {
        if let Err(e) = crate::log::save_stage(dir, stage_name, prompt, &doc) {
            warn!(stage = stage_name, error = %e, "could not save prompt artifact");
        }
    }
    Ok(doc)
}

fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}
