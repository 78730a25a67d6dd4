use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("unknown assessment step: {0}")]
    UnknownStep(String),

    #[error("missing required field: {0}")]
    MissingField(String),
}
