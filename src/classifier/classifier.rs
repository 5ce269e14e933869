use ndarray::Array2;
use ort::session::Session;
use ort::value::Tensor;
use std::collections::HashMap;
use std::sync::Arc;
use tokenizers::Tokenizer;

use super::error::ClassifierError;
use super::labels::LabelEncoder;
use crate::registry::{Category, CategoryRegistry};

/// One classified query: the original text, the predicted label, and the
/// display category it resolves to.
#[derive(Debug, Clone)]
pub struct Classification {
    pub query: String,
    pub label: String,
    pub confidence: f32,
    pub category: Category,
}

/// A thread-safe batch text classifier backed by an ONNX
/// sequence-classification model.
///
/// All fields are read-only after construction; the type is `Send + Sync`
/// and is shared across request handlers behind an `Arc`.
pub struct Classifier {
    pub(crate) checkpoint_dir: String,
    pub(crate) tokenizer: Arc<Tokenizer>,
    pub(crate) session: Arc<Session>,
    pub(crate) encoder: Arc<LabelEncoder>,
    pub(crate) registry: CategoryRegistry,
    pub(crate) pad_token_id: u32,
    pub(crate) batch_size: usize,
    pub(crate) max_tokens: usize,
}

// Compile-time verification of thread-safety
const _: () = {
    fn assert_send_sync<T: Send + Sync>() {}
    fn verify_thread_safety() {
        assert_send_sync::<Classifier>();
    }
};

impl Classifier {
    /// Creates a new ClassifierBuilder for fluent construction
    pub fn builder() -> super::builder::ClassifierBuilder {
        super::builder::ClassifierBuilder::new()
    }

    /// Returns information about the classifier's current state
    pub fn info(&self) -> super::ClassifierInfo {
        super::ClassifierInfo {
            checkpoint_dir: self.checkpoint_dir.clone(),
            num_labels: self.encoder.len(),
            labels: Arc::new(self.encoder.labels()),
            batch_size: self.batch_size,
            max_tokens: self.max_tokens,
        }
    }

    /// Classifies a single query. Equivalent to a batch of one.
    pub fn classify(&self, query: &str) -> Result<Classification, ClassifierError> {
        let queries = [query.to_string()];
        let mut results = self.classify_batch(&queries)?;
        results.pop().ok_or_else(|| {
            ClassifierError::InferenceError("Model returned no result for query".to_string())
        })
    }

    /// Classifies an ordered list of queries, returning one result per query
    /// in input order.
    ///
    /// Input is processed in contiguous chunks of at most the configured
    /// batch size. Any failure aborts the whole call; results from chunks
    /// already processed are discarded.
    ///
    /// # Errors
    /// - `ValidationError` if `queries` is empty
    /// - `TokenizerError` / `InferenceError` on tokenization or model failure
    pub fn classify_batch(
        &self,
        queries: &[String],
    ) -> Result<Vec<Classification>, ClassifierError> {
        if queries.is_empty() {
            return Err(ClassifierError::ValidationError(
                "No queries provided".to_string(),
            ));
        }

        let mut results = Vec::with_capacity(queries.len());
        for chunk in queries.chunks(self.batch_size) {
            results.extend(self.classify_chunk(chunk)?);
        }
        Ok(results)
    }

    fn classify_chunk(&self, chunk: &[String]) -> Result<Vec<Classification>, ClassifierError> {
        let encodings = self
            .tokenizer
            .encode_batch(chunk.to_vec(), true)
            .map_err(|e| ClassifierError::TokenizerError(e.to_string()))?;

        // Pad every sequence in the chunk to the longest one, capped at the
        // configured token limit.
        let max_len = encodings
            .iter()
            .map(|e| e.len())
            .max()
            .unwrap_or(1)
            .clamp(1, self.max_tokens);

        let batch_size = chunk.len();
        let mut input_ids = vec![self.pad_token_id as i64; batch_size * max_len];
        let mut attention_mask = vec![0i64; batch_size * max_len];
        for (i, encoding) in encodings.iter().enumerate() {
            let seq_len = encoding.len().min(max_len);
            let ids = encoding.get_ids();
            let mask = encoding.get_attention_mask();
            for j in 0..seq_len {
                input_ids[i * max_len + j] = ids[j] as i64;
                attention_mask[i * max_len + j] = mask[j] as i64;
            }
        }

        let logits = self.run_model(batch_size, max_len, input_ids, attention_mask)?;

        let mut results = Vec::with_capacity(batch_size);
        for (query, row) in chunk.iter().zip(logits.rows()) {
            let probs = softmax(row.as_slice().unwrap_or(&[]));
            let (class_id, confidence) = argmax(&probs).ok_or_else(|| {
                ClassifierError::InferenceError("Model produced an empty logits row".to_string())
            })?;
            let label = self.encoder.label(class_id);
            let category = self.registry.resolve(&label).clone();
            results.push(Classification {
                query: query.clone(),
                label,
                confidence,
                category,
            });
        }
        Ok(results)
    }

    fn run_model(
        &self,
        batch_size: usize,
        max_len: usize,
        input_ids: Vec<i64>,
        attention_mask: Vec<i64>,
    ) -> Result<Array2<f32>, ClassifierError> {
        let ids_array = Array2::from_shape_vec((batch_size, max_len), input_ids)
            .map_err(|e| ClassifierError::InferenceError(format!("Failed to shape input ids: {}", e)))?;
        let ids_dyn = ids_array.into_dyn();
        let ids_layout = ids_dyn.as_standard_layout();

        let mask_array = Array2::from_shape_vec((batch_size, max_len), attention_mask)
            .map_err(|e| ClassifierError::InferenceError(format!("Failed to shape attention mask: {}", e)))?;
        let mask_dyn = mask_array.into_dyn();
        let mask_layout = mask_dyn.as_standard_layout();

        let mut inputs = HashMap::new();
        inputs.insert(
            "input_ids",
            Tensor::from_array(&ids_layout).map_err(|e| {
                ClassifierError::InferenceError(format!("Failed to create input tensor: {}", e))
            })?,
        );
        inputs.insert(
            "attention_mask",
            Tensor::from_array(&mask_layout).map_err(|e| {
                ClassifierError::InferenceError(format!("Failed to create mask tensor: {}", e))
            })?,
        );

        let outputs = self
            .session
            .run(inputs)
            .map_err(|e| ClassifierError::InferenceError(format!("Failed to run model: {}", e)))?;
        let logits = outputs[0].try_extract_tensor::<f32>().map_err(|e| {
            ClassifierError::InferenceError(format!("Failed to extract logits: {}", e))
        })?;

        let shape = logits.shape();
        if shape.len() != 2 || shape[0] != batch_size {
            return Err(ClassifierError::InferenceError(format!(
                "Unexpected logits shape {:?} for batch of {}",
                shape, batch_size
            )));
        }

        let flat: Vec<f32> = logits.iter().cloned().collect();
        Array2::from_shape_vec((shape[0], shape[1]), flat)
            .map_err(|e| ClassifierError::InferenceError(format!("Failed to reshape logits: {}", e)))
    }
}

/// Numerically stable softmax over one logits row.
pub(crate) fn softmax(row: &[f32]) -> Vec<f32> {
    let max_val = row.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
    let exp_vals: Vec<f32> = row.iter().map(|&x| (x - max_val).exp()).collect();
    let sum_exp: f32 = exp_vals.iter().sum();
    exp_vals.iter().map(|&x| x / sum_exp).collect()
}

/// Index and value of the largest probability, or `None` for an empty row.
pub(crate) fn argmax(probs: &[f32]) -> Option<(usize, f32)> {
    probs
        .iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(i, &p)| (i, p))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_softmax_sums_to_one() {
        let probs = softmax(&[1.0, 2.0, 3.0]);
        let total: f32 = probs.iter().sum();
        assert!((total - 1.0).abs() < 1e-6);
        assert!(probs[2] > probs[1] && probs[1] > probs[0]);
    }

    #[test]
    fn test_softmax_is_stable_for_large_logits() {
        let probs = softmax(&[1000.0, 1001.0]);
        assert!(probs.iter().all(|p| p.is_finite()));
        assert!(probs[1] > probs[0]);
    }

    #[test]
    fn test_argmax_picks_highest_probability() {
        assert_eq!(argmax(&[0.1, 0.7, 0.2]), Some((1, 0.7)));
        assert_eq!(argmax(&[]), None);
    }

    #[test]
    fn test_chunking_covers_all_queries_in_order() {
        let queries: Vec<String> = (0..37).map(|i| format!("query {}", i)).collect();
        let chunked: Vec<String> = queries.chunks(16).flatten().cloned().collect();
        assert_eq!(chunked, queries);
        assert_eq!(queries.chunks(16).count(), 3);
    }
}
