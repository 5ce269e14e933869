use querylabel::{CategoryRegistry, Classifier, ClassifierError};

#[test]
fn test_builder_requires_a_checkpoint() {
    let result = Classifier::builder().build();
    assert!(matches!(result, Err(ClassifierError::CheckpointError(_))));
}

#[test]
fn test_builder_rejects_zero_sized_batches() {
    let result = Classifier::builder().with_batch_size(0);
    assert!(matches!(result, Err(ClassifierError::ValidationError(_))));
}

#[test]
fn test_builder_reports_missing_checkpoint_files() {
    let dir = std::env::temp_dir().join("querylabel-validation-missing");
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("config.json"), "{}").unwrap();
    std::fs::write(dir.join("tokenizer.json"), "{}").unwrap();

    let result = Classifier::builder().with_checkpoint(&dir);
    match result {
        Err(ClassifierError::CheckpointError(msg)) => {
            assert!(msg.contains("model.onnx"));
            assert!(!msg.contains("tokenizer.json"));
        }
        other => panic!("expected CheckpointError, got {:?}", other.map(|_| ())),
    }
    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_every_registry_category_has_display_metadata() {
    let registry = CategoryRegistry::new();
    for category in registry.categories() {
        assert!(!category.id.is_empty());
        assert!(!category.name.is_empty());
        assert!(category.color.starts_with('#'));
        assert_eq!(category.color.len(), 7);
    }
}

#[test]
fn test_fallback_category_is_part_of_the_registry() {
    let registry = CategoryRegistry::new();
    let fallback = registry.resolve("definitely not a trained label");
    assert!(registry.contains(&fallback.name));
}
