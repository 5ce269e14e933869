use log::info;
use std::collections::HashMap;
use std::path::Path;

use super::checkpoint::CheckpointConfig;
use super::error::ClassifierError;

/// Bidirectional mapping between model class indices and label strings.
///
/// Loaded once at startup from `id_to_label.json` when the checkpoint
/// carries one, otherwise from the `id2label` table in `config.json`.
/// Read-only thereafter.
#[derive(Debug, Clone)]
pub struct LabelEncoder {
    id_to_label: HashMap<usize, String>,
    label_to_id: HashMap<String, usize>,
}

impl LabelEncoder {
    /// Loads the encoder for a checkpoint directory.
    pub fn load(
        checkpoint_dir: &Path,
        config: &CheckpointConfig,
    ) -> Result<Self, ClassifierError> {
        let sidecar = checkpoint_dir.join("id_to_label.json");
        if sidecar.exists() {
            info!("Loading label encoder from {:?}", sidecar);
            let raw = std::fs::read_to_string(&sidecar)?;
            let parsed: HashMap<String, String> =
                serde_json::from_str(&raw).map_err(|e| ClassifierError::InvalidJson {
                    file: sidecar.display().to_string(),
                    detail: e.to_string(),
                })?;
            return Self::from_string_keys(&parsed, &sidecar.display().to_string());
        }

        if config.id2label.is_empty() {
            return Err(ClassifierError::CheckpointError(format!(
                "No label mapping found: neither {:?} nor an id2label table in config.json",
                sidecar
            )));
        }
        info!("Loading label encoder from config.json id2label table");
        Ok(Self::from_pairs(
            config.id2label.iter().map(|(&id, label)| (id, label.clone())),
        ))
    }

    fn from_string_keys(
        raw: &HashMap<String, String>,
        source: &str,
    ) -> Result<Self, ClassifierError> {
        let mut pairs = Vec::with_capacity(raw.len());
        for (key, label) in raw {
            let id = key.parse::<usize>().map_err(|_| ClassifierError::InvalidJson {
                file: source.to_string(),
                detail: format!("class index '{}' is not an integer", key),
            })?;
            pairs.push((id, label.clone()));
        }
        Ok(Self::from_pairs(pairs))
    }

    pub fn from_pairs(pairs: impl IntoIterator<Item = (usize, String)>) -> Self {
        let mut id_to_label = HashMap::new();
        let mut label_to_id = HashMap::new();
        for (id, label) in pairs {
            label_to_id.insert(label.clone(), id);
            id_to_label.insert(id, label);
        }
        Self {
            id_to_label,
            label_to_id,
        }
    }

    /// Label for a predicted class index. Indices outside the trained label
    /// set map to a synthetic `LABEL_{id}` name, which the registry then
    /// resolves to the fallback category.
    pub fn label(&self, id: usize) -> String {
        self.id_to_label
            .get(&id)
            .cloned()
            .unwrap_or_else(|| format!("LABEL_{}", id))
    }

    pub fn id(&self, label: &str) -> Option<usize> {
        self.label_to_id.get(label).copied()
    }

    pub fn len(&self) -> usize {
        self.id_to_label.len()
    }

    pub fn is_empty(&self) -> bool {
        self.id_to_label.is_empty()
    }

    pub fn labels(&self) -> Vec<String> {
        let mut ids: Vec<&usize> = self.id_to_label.keys().collect();
        ids.sort();
        ids.iter().map(|id| self.id_to_label[id].clone()).collect()
    }
}
