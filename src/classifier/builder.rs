use log::{error, info, warn};
use ort::session::Session;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokenizers::Tokenizer;

use super::checkpoint::{missing_files, CheckpointConfig};
use super::classifier::Classifier;
use super::error::ClassifierError;
use super::labels::LabelEncoder;
use crate::registry::CategoryRegistry;
use crate::runtime::{create_session_builder, RuntimeConfig};

/// Files a checkpoint directory must contain before the classifier will
/// attempt to load it.
pub(crate) const REQUIRED_CHECKPOINT_FILES: [&str; 3] =
    ["config.json", "tokenizer.json", "model.onnx"];

const DEFAULT_BATCH_SIZE: usize = 16;
const DEFAULT_MAX_TOKENS: usize = 128;

/// A builder for constructing a [`Classifier`] with a fluent interface.
///
/// # Example
/// ```no_run
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use querylabel::Classifier;
///
/// let classifier = Classifier::builder()
///     .with_checkpoint("./model")?
///     .with_batch_size(8)?
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct ClassifierBuilder {
    checkpoint_dir: Option<PathBuf>,
    tokenizer: Option<Tokenizer>,
    session: Option<Session>,
    config: Option<CheckpointConfig>,
    batch_size: Option<usize>,
    max_tokens: Option<usize>,
    runtime_config: RuntimeConfig,
}

impl ClassifierBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the runtime configuration for ONNX session execution.
    pub fn with_runtime_config(mut self, config: RuntimeConfig) -> Self {
        self.runtime_config = config;
        self
    }

    /// Loads the model, tokenizer, and configuration from a checkpoint
    /// directory.
    ///
    /// # Errors
    /// - `CheckpointError` if the directory or any required file is missing
    /// - `TokenizerError` if `tokenizer.json` cannot be loaded
    /// - `InferenceError` if the ONNX graph fails to load or has an
    ///   unexpected input/output structure
    pub fn with_checkpoint<P: AsRef<Path>>(mut self, dir: P) -> Result<Self, ClassifierError> {
        if self.checkpoint_dir.is_some() {
            return Err(ClassifierError::CheckpointError(
                "Checkpoint directory already set".to_string(),
            ));
        }

        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(ClassifierError::CheckpointError(format!(
                "Checkpoint directory {:?} does not exist",
                dir
            )));
        }
        let missing = missing_files(dir, &REQUIRED_CHECKPOINT_FILES);
        if !missing.is_empty() {
            return Err(ClassifierError::CheckpointError(format!(
                "Checkpoint {:?} is missing required files: {}",
                dir,
                missing.join(", ")
            )));
        }

        let config = CheckpointConfig::from_checkpoint(dir)?;

        let tokenizer_path = dir.join("tokenizer.json");
        let tokenizer = Tokenizer::from_file(&tokenizer_path).map_err(|e| {
            error!("Failed to load tokenizer from {:?}: {}", tokenizer_path, e);
            ClassifierError::TokenizerError(e.to_string())
        })?;
        info!("Tokenizer loaded from {:?}", tokenizer_path);

        let model_path = dir.join("model.onnx");
        let session = create_session_builder(&self.runtime_config)?
            .commit_from_file(&model_path)?;
        Self::validate_model(&session)?;
        info!("Model loaded and validated from {:?}", model_path);

        self.checkpoint_dir = Some(dir.to_path_buf());
        self.config = Some(config);
        self.tokenizer = Some(tokenizer);
        self.session = Some(session);
        Ok(self)
    }

    /// Sets the maximum number of queries sent through the model at once.
    pub fn with_batch_size(mut self, batch_size: usize) -> Result<Self, ClassifierError> {
        if batch_size == 0 {
            return Err(ClassifierError::ValidationError(
                "Batch size must be at least 1".to_string(),
            ));
        }
        self.batch_size = Some(batch_size);
        Ok(self)
    }

    /// Sets the token length queries are truncated to before inference.
    pub fn with_max_tokens(mut self, max_tokens: usize) -> Result<Self, ClassifierError> {
        if max_tokens == 0 {
            return Err(ClassifierError::ValidationError(
                "Max tokens must be at least 1".to_string(),
            ));
        }
        self.max_tokens = Some(max_tokens);
        Ok(self)
    }

    /// Builds the final [`Classifier`].
    ///
    /// # Errors
    /// - `CheckpointError` if no checkpoint was loaded or the checkpoint
    ///   carries no label mapping
    pub fn build(mut self) -> Result<Classifier, ClassifierError> {
        let checkpoint_dir = self.checkpoint_dir.take().ok_or_else(|| {
            ClassifierError::CheckpointError("No checkpoint directory set".to_string())
        })?;
        let config = self.config.take().ok_or_else(|| {
            ClassifierError::CheckpointError("Checkpoint configuration not loaded".to_string())
        })?;
        let tokenizer = self.tokenizer.take().ok_or_else(|| {
            ClassifierError::CheckpointError("No tokenizer loaded".to_string())
        })?;
        let session = self.session.take().ok_or_else(|| {
            ClassifierError::CheckpointError("No ONNX model loaded".to_string())
        })?;

        let encoder = LabelEncoder::load(&checkpoint_dir, &config)?;
        if config.num_labels != 0 && encoder.len() != config.num_labels {
            warn!(
                "Label encoder has {} entries but config.json declares {} labels",
                encoder.len(),
                config.num_labels
            );
        }

        // The model can never see more tokens than it has positions for.
        let max_tokens = self
            .max_tokens
            .unwrap_or(DEFAULT_MAX_TOKENS)
            .min(config.max_position_embeddings);

        let registry = CategoryRegistry::new();
        let unmapped: Vec<String> = encoder
            .labels()
            .into_iter()
            .filter(|label| !registry.contains(label))
            .collect();
        if !unmapped.is_empty() {
            warn!(
                "{} trained label(s) have no category record and will resolve to the fallback: {}",
                unmapped.len(),
                unmapped.join(", ")
            );
        }

        Ok(Classifier {
            checkpoint_dir: checkpoint_dir.display().to_string(),
            tokenizer: Arc::new(tokenizer),
            session: Arc::new(session),
            encoder: Arc::new(encoder),
            registry,
            pad_token_id: config.pad_token_id,
            batch_size: self.batch_size.unwrap_or(DEFAULT_BATCH_SIZE),
            max_tokens,
        })
    }

    /// Validates that the graph has the sequence-classification shape:
    /// `input_ids` and `attention_mask` in, logits out.
    fn validate_model(session: &Session) -> Result<(), ClassifierError> {
        let inputs = &session.inputs;
        if inputs.len() < 2 {
            return Err(ClassifierError::InferenceError(format!(
                "Model must have at least 2 inputs (input_ids and attention_mask), found {}",
                inputs.len()
            )));
        }
        if session.outputs.is_empty() {
            return Err(ClassifierError::InferenceError(
                "Model must have at least 1 output for logits".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_without_checkpoint_fails() {
        let result = ClassifierBuilder::new().build();
        assert!(matches!(result, Err(ClassifierError::CheckpointError(_))));
    }

    #[test]
    fn test_missing_checkpoint_dir_is_reported() {
        let result =
            ClassifierBuilder::new().with_checkpoint("/nonexistent/querylabel-checkpoint");
        match result {
            Err(ClassifierError::CheckpointError(msg)) => {
                assert!(msg.contains("does not exist"))
            }
            other => panic!("expected CheckpointError, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_incomplete_checkpoint_lists_missing_files() {
        let dir = std::env::temp_dir().join("querylabel-test-incomplete-checkpoint");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("config.json"), "{}").unwrap();
        let result = ClassifierBuilder::new().with_checkpoint(&dir);
        match result {
            Err(ClassifierError::CheckpointError(msg)) => {
                assert!(msg.contains("tokenizer.json"));
                assert!(msg.contains("model.onnx"));
            }
            other => panic!("expected CheckpointError, got {:?}", other.map(|_| ())),
        }
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_zero_batch_size_rejected() {
        assert!(ClassifierBuilder::new().with_batch_size(0).is_err());
        assert!(ClassifierBuilder::new().with_max_tokens(0).is_err());
    }
}
