use chrono::Local;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::{generate, is_blank, move_to, Stage};
use crate::errors::ForgeError;
use crate::export;
use crate::prompt::build_plan_prompt;
use crate::session::Session;
use crate::wire::{GeneratedDocument, Language, PlanRequest};

pub const MISSING_PRD: &str = "Please provide a PRD to generate a plan.";

pub struct PlanWorkflow {
    stage: Stage,
    input: String,
    document: Option<GeneratedDocument>,
}

impl PlanWorkflow {
    /// The input defaults to the session's last PRD, read once here.
    pub fn init(session: &Session) -> Self {
        let input = session.last_prd().unwrap_or_default().to_string();
        debug!(prefilled = !input.is_empty(), "plan: init");
        Self { stage: Stage::AwaitingInput, input, document: None }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    pub fn document(&self) -> Option<&GeneratedDocument> {
        self.document.as_ref()
    }

    pub async fn submit(&mut self, session: &Session, language: Language) -> Result<&GeneratedDocument, ForgeError> {
        self.document = None;
        move_to(&mut self.stage, Stage::Validating, "plan");

        let req = PlanRequest { source_document: self.input.clone(), language };
        if is_blank(&req.source_document) {
            info!("plan: empty PRD input");
            move_to(&mut self.stage, Stage::AwaitingInput, "plan");
            return Err(ForgeError::Validation(MISSING_PRD.into()));
        }
        if let Err(e) = session.generator() {
            move_to(&mut self.stage, Stage::AwaitingInput, "plan");
            return Err(e);
        }

        move_to(&mut self.stage, Stage::Generating, "plan");
        let prompt = build_plan_prompt(&req.source_document, req.language);
        let doc = match generate(session, "plan", &prompt).await {
            Ok(doc) => doc,
            Err(e) => {
                move_to(&mut self.stage, Stage::AwaitingInput, "plan");
                return Err(e);
            }
        };

        info!(len = doc.text.len(), placeholder = doc.is_placeholder(), "plan: ready");
        move_to(&mut self.stage, Stage::Ready, "plan");
        Ok(&*self.document.insert(doc))
    }

    /// Writes the plan to `dir` as `ImplementationPlan_<timestamp>.md`.
    pub fn export(&mut self, dir: &Path) -> Result<PathBuf, ForgeError> {
        let Some(doc) = &self.document else {
            return Err(ForgeError::Export("no implementation plan has been generated yet".into()));
        };
        if !self.stage.can_export() {
            return Err(ForgeError::Export("no implementation plan has been generated yet".into()));
        }
        let name = export::plan_file_name(Local::now().naive_local());
        let path = export::write_document(dir, &name, &doc.text)?;
        move_to(&mut self.stage, Stage::Exported, "plan");
        Ok(path)
    }
}
