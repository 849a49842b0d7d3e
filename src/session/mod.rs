use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use uuid::Uuid;

use crate::errors::ForgeError;
use crate::generate::GenerationClient;

/// State of one user session: the configured client and the PRD handoff slot.
pub struct Session {
    id: Uuid,
    opened_at: DateTime<Local>,
    generator: Result<GenerationClient, ForgeError>,
    last_prd: Option<String>,
    artifacts_dir: Option<PathBuf>,
}

impl Session {
    /// Opens a session. A configuration error keeps the session usable but disables generation.
    pub fn open(generator: Result<GenerationClient, ForgeError>) -> Self {
        let id = Uuid::new_v4();
        match &generator {
            Ok(c) => info!(session = %id, provider = c.provider_name(), "session opened"),
            Err(e) => info!(session = %id, error = %e, "session opened without generation"),
        }
        Self { id, opened_at: Local::now(), generator, last_prd: None, artifacts_dir: None }
    }

    /// Save prompt/response artifacts under `<root>/.prd_forge/runs/<session id>`.
    pub fn with_artifacts(mut self, root: &Path) -> Self {
        self.artifacts_dir = Some(crate::log::run_dir(root, self.id));
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn artifacts_dir(&self) -> Option<&Path> {
        self.artifacts_dir.as_deref()
    }

    pub fn generator(&self) -> Result<&GenerationClient, ForgeError> {
        self.generator.as_ref().map_err(ForgeError::clone)
    }

    /// Overwrites the handoff slot with the latest PRD.
    pub fn record_prd(&mut self, text: &str) {
        debug!(session = %self.id, len = text.len(), "handoff: PRD recorded");
        self.last_prd = Some(text.to_string());
    }

    /// Reads the handoff slot without consuming it.
    pub fn last_prd(&self) -> Option<&str> {
        self.last_prd.as_deref()
    }

    pub fn close(self) {
        info!(
            session = %self.id,
            had_prd = self.last_prd.is_some(),
            secs = (Local::now() - self.opened_at).num_seconds(),
            "session closed"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::stub::StubProvider;

    fn session() -> Session {
        Session::open(Ok(GenerationClient::new(Box::new(StubProvider::text("x")))))
    }

    #[test]
    fn handoff_is_overwritten_and_read_without_consuming() {
        let mut s = session();
        assert_eq!(s.last_prd(), None);
        s.record_prd("R");
        assert_eq!(s.last_prd(), Some("R"));
        assert_eq!(s.last_prd(), Some("R"));
        s.record_prd("R'");
        assert_eq!(s.last_prd(), Some("R'"));
        s.close();
    }

    #[test]
    fn sessions_do_not_share_handoff() {
        let mut a = session();
        let b = session();
        a.record_prd("only in a");
        assert_eq!(b.last_prd(), None);
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn configuration_error_is_reported_on_every_access() {
        let s = Session::open(Err(ForgeError::Configuration("GOOGLE_API_KEY not set".into())));
        for _ in 0..2 {
            let err = s.generator().err().unwrap();
            assert!(matches!(err, ForgeError::Configuration(_)));
            assert!(err.to_string().contains("GOOGLE_API_KEY"));
        }
    }

    #[test]
    fn startup_error_keeps_its_kind() {
        let s = Session::open(Err(ForgeError::Export("out dir is read-only".into())));
        let err = s.generator().err().unwrap();
        assert!(matches!(err, ForgeError::Export(_)));
        assert_eq!(err.to_string(), "export failed: out dir is read-only");
    }

    #[test]
    fn artifacts_dir_is_per_session() {
        let s = session().with_artifacts(Path::new("out"));
        let dir = s.artifacts_dir().unwrap();
        assert!(dir.starts_with("out/.prd_forge/runs"));
        assert!(dir.ends_with(s.id().to_string()));
    }
}
