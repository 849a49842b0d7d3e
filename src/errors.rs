use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum ForgeError {
    #[error("configuration error: {0}")] Configuration(String),
    #[error("{0}")] Validation(String),
    #[error("export failed: {0}")] Export(String),
}

impl ForgeError {
    /// Validation problems are shown as warnings and leave the workflow waiting for input.
    pub fn is_warning(&self) -> bool {
        matches!(self, ForgeError::Validation(_))
    }
}
