//! Batch text classification over a fine-tuned ONNX transformer, plus the
//! HTTP surface that serves it.
//!
//! The crate loads a sequence-classification checkpoint (ONNX graph,
//! tokenizer, label encoder) from a local directory, classifies batches of
//! short text queries, and resolves each predicted label to a display
//! category (id, name, color) from a fixed registry.
//!
//! # Basic Usage
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use querylabel::Classifier;
//!
//! let classifier = Classifier::builder()
//!     .with_checkpoint("./model")?
//!     .build()?;
//!
//! let results = classifier.classify_batch(&[
//!     "I love football".to_string(),
//!     "new CPU benchmarks".to_string(),
//! ])?;
//! for result in &results {
//!     println!("{} -> {}", result.query, result.category.name);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Thread Safety
//!
//! `Classifier` is `Send + Sync`; the server shares one instance across
//! request handlers behind an `Arc`.

pub mod classifier;
pub mod registry;
mod runtime;
pub mod server;

pub use classifier::{
    CheckpointConfig, Classification, Classifier, ClassifierBuilder, ClassifierError,
    ClassifierInfo, LabelEncoder,
};
pub use registry::{Category, CategoryRegistry};
pub use runtime::{create_session_builder, RuntimeConfig};

pub fn init_logger() {
    env_logger::init();
}
