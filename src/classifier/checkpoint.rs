use std::collections::HashMap;
use std::path::Path;

use super::error::ClassifierError;

/// The slice of a checkpoint's `config.json` the classifier needs.
#[derive(Debug, Clone)]
pub struct CheckpointConfig {
    pub num_labels: usize,
    pub max_position_embeddings: usize,
    pub pad_token_id: u32,
    pub id2label: HashMap<usize, String>,
}

impl CheckpointConfig {
    /// Parses `config.json` from a checkpoint directory.
    pub fn from_checkpoint(dir: &Path) -> Result<Self, ClassifierError> {
        let config_path = dir.join("config.json");
        if !config_path.exists() {
            return Err(ClassifierError::CheckpointError(format!(
                "config.json not found in {:?}",
                dir
            )));
        }
        let raw = std::fs::read_to_string(&config_path)?;
        Self::from_json_str(&raw, &config_path.display().to_string())
    }

    fn from_json_str(raw: &str, source: &str) -> Result<Self, ClassifierError> {
        let json: serde_json::Value =
            serde_json::from_str(raw).map_err(|e| ClassifierError::InvalidJson {
                file: source.to_string(),
                detail: e.to_string(),
            })?;

        let mut id2label = HashMap::new();
        if let Some(table) = json.get("id2label").and_then(|v| v.as_object()) {
            for (key, value) in table {
                if let (Ok(id), Some(label)) = (key.parse::<usize>(), value.as_str()) {
                    id2label.insert(id, label.to_string());
                }
            }
        }

        let num_labels = json["num_labels"]
            .as_u64()
            .unwrap_or(id2label.len() as u64) as usize;

        Ok(Self {
            num_labels,
            max_position_embeddings: json["max_position_embeddings"].as_u64().unwrap_or(512)
                as usize,
            pad_token_id: json["pad_token_id"].as_u64().unwrap_or(0) as u32,
            id2label,
        })
    }
}

/// Checks a checkpoint directory for a set of required files, returning the
/// names that are missing. An empty result means the directory is usable.
pub fn missing_files(dir: &Path, required: &[&str]) -> Vec<String> {
    required
        .iter()
        .filter(|name| !dir.join(name).exists())
        .map(|name| name.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONFIG: &str = r#"{
        "model_type": "bert",
        "num_labels": 3,
        "max_position_embeddings": 512,
        "pad_token_id": 0,
        "id2label": {"0": "Sports", "1": "Shopping", "2": "News, Politics & Society"},
        "label2id": {"Sports": 0, "Shopping": 1, "News, Politics & Society": 2}
    }"#;

    #[test]
    fn test_parses_id2label_and_sizes() {
        let config = CheckpointConfig::from_json_str(CONFIG, "config.json").unwrap();
        assert_eq!(config.num_labels, 3);
        assert_eq!(config.max_position_embeddings, 512);
        assert_eq!(config.pad_token_id, 0);
        assert_eq!(config.id2label[&2], "News, Politics & Society");
    }

    #[test]
    fn test_num_labels_defaults_to_table_size() {
        let raw = r#"{"id2label": {"0": "A", "1": "B"}}"#;
        let config = CheckpointConfig::from_json_str(raw, "config.json").unwrap();
        assert_eq!(config.num_labels, 2);
    }

    #[test]
    fn test_malformed_json_is_reported_with_source() {
        let result = CheckpointConfig::from_json_str("not json", "model/config.json");
        match result {
            Err(ClassifierError::InvalidJson { file, .. }) => {
                assert_eq!(file, "model/config.json")
            }
            other => panic!("expected InvalidJson, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_files_lists_each_absent_name() {
        let dir = std::env::temp_dir().join("querylabel-test-missing-files");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("config.json"), "{}").unwrap();
        let missing = missing_files(&dir, &["config.json", "tokenizer.json", "model.onnx"]);
        assert_eq!(missing, vec!["tokenizer.json", "model.onnx"]);
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
