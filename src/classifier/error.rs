use std::io;

/// Errors surfaced by checkpoint loading and classification.
#[derive(Debug, thiserror::Error)]
pub enum ClassifierError {
    #[error("Checkpoint error: {0}")]
    CheckpointError(String),
    #[error("Tokenizer error: {0}")]
    TokenizerError(String),
    #[error("Inference error: {0}")]
    InferenceError(String),
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
    #[error("Invalid JSON in {file}: {detail}")]
    InvalidJson { file: String, detail: String },
}

impl From<ort::Error> for ClassifierError {
    fn from(err: ort::Error) -> Self {
        ClassifierError::InferenceError(err.to_string())
    }
}
