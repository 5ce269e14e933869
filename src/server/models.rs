use serde::{Deserialize, Serialize};

use crate::registry::Category;
use crate::Classification;

#[derive(Debug, Deserialize)]
pub struct ClassifyRequest {
    #[serde(default)]
    pub queries: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ClassifyResult {
    pub query: String,
    pub category: Category,
}

impl From<Classification> for ClassifyResult {
    fn from(classification: Classification) -> Self {
        Self {
            query: classification.query,
            category: classification.category,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub checkpoint: String,
    pub num_labels: usize,
}
