use chrono::Local;
use std::path::{Path, PathBuf};
use tracing::info;

use super::{generate, move_to, Stage};
use crate::errors::ForgeError;
use crate::export;
use crate::prompt::build_prd_prompt;
use crate::session::Session;
use crate::wire::{ExportFormat, GeneratedDocument, PrdRequest};

pub const MISSING_FIELDS: &str = "Please enter both App Name and Description.";

pub struct PrdWorkflow {
    stage: Stage,
    request: Option<PrdRequest>,
    document: Option<GeneratedDocument>,
}

impl Default for PrdWorkflow {
    fn default() -> Self {
        Self::new()
    }
}

impl PrdWorkflow {
    pub fn new() -> Self {
        Self { stage: Stage::AwaitingInput, request: None, document: None }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn document(&self) -> Option<&GeneratedDocument> {
        self.document.as_ref()
    }

    /// Validates, generates, and on success writes the PRD into the session handoff.
    pub async fn submit(&mut self, session: &mut Session, req: PrdRequest) -> Result<&GeneratedDocument, ForgeError> {
        self.document = None;
        self.request = None;
        move_to(&mut self.stage, Stage::Validating, "prd");

        if req.name.is_empty() || req.description.is_empty() {
            info!("prd: missing name or description");
            move_to(&mut self.stage, Stage::AwaitingInput, "prd");
            return Err(ForgeError::Validation(MISSING_FIELDS.into()));
        }
        if let Err(e) = session.generator() {
            move_to(&mut self.stage, Stage::AwaitingInput, "prd");
            return Err(e);
        }

        move_to(&mut self.stage, Stage::Generating, "prd");
        let prompt = build_prd_prompt(&req.name, &req.description, req.app_type, req.language);
        let doc = match generate(session, "prd", &prompt).await {
            Ok(doc) => doc,
            Err(e) => {
                move_to(&mut self.stage, Stage::AwaitingInput, "prd");
                return Err(e);
            }
        };

        session.record_prd(&doc.text);
        info!(app = %req.name, len = doc.text.len(), placeholder = doc.is_placeholder(), "prd: ready");
        self.request = Some(req);
        move_to(&mut self.stage, Stage::Ready, "prd");
        Ok(&*self.document.insert(doc))
    }

    /// Writes the current PRD to `dir` as `<name>_PRD_<timestamp>.<ext>`.
    pub fn export(&mut self, dir: &Path, format: ExportFormat) -> Result<PathBuf, ForgeError> {
        let (Some(req), Some(doc)) = (&self.request, &self.document) else {
            return Err(ForgeError::Export("no PRD has been generated yet".into()));
        };
        if !self.stage.can_export() {
            return Err(ForgeError::Export("no PRD has been generated yet".into()));
        }
        let name = export::prd_file_name(&req.name, Local::now().naive_local(), format);
        let path = export::write_document(dir, &name, &doc.text)?;
        move_to(&mut self.stage, Stage::Exported, "prd");
        Ok(path)
    }
}
