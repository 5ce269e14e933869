mod builder;
mod checkpoint;
#[allow(clippy::module_inception)]
mod classifier;
mod error;
mod labels;

pub use builder::ClassifierBuilder;
pub use checkpoint::{missing_files, CheckpointConfig};
pub use classifier::{Classification, Classifier};
pub use error::ClassifierError;
pub use labels::LabelEncoder;

use std::sync::Arc;

/// Summary of a built classifier, for logging and the health endpoint.
#[derive(Debug, Clone)]
pub struct ClassifierInfo {
    pub checkpoint_dir: String,
    pub num_labels: usize,
    pub labels: Arc<Vec<String>>,
    pub batch_size: usize,
    pub max_tokens: usize,
}
