//! Bundles a fine-tuned checkpoint into a portable inference bundle for
//! client-side (browser) use.
//!
//! Scans an ordered list of candidate checkpoint directories, takes the
//! first one carrying the full required file set, verifies the ONNX graph
//! loads, and stages the model, tokenizer artifacts, and configuration into
//! the output directory. Optional label-mapping files are copied when
//! present. The training pipeline is responsible for having exported the
//! graph itself.

use anyhow::{bail, Context};
use clap::Parser;
use log::info;
use std::fs;
use std::path::{Path, PathBuf};

use querylabel::classifier::missing_files;
use querylabel::{create_session_builder, RuntimeConfig};

/// Files a candidate directory must contain to be exportable.
const REQUIRED: [&str; 5] = [
    "config.json",
    "tokenizer.json",
    "tokenizer_config.json",
    "vocab.txt",
    "model.onnx",
];

/// Tokenizer artifacts copied alongside the model when present.
const OPTIONAL: [&str; 3] = [
    "special_tokens_map.json",
    "id_to_label.json",
    "label_to_id.json",
];

const DEFAULT_CHECKPOINT_NAME: &str = "microsoft__MiniLM-L12-H384-uncased";

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Candidate checkpoint directories, first valid one wins.
    /// Defaults to ./runs_multi_model/<name> and ../runs_multi_model/<name>.
    #[arg(short = 'i', long = "input")]
    candidates: Vec<PathBuf>,

    /// Directory the bundle is written to
    #[arg(short, long, default_value = "./public/models/minilm-iab")]
    output: PathBuf,
}

fn default_candidates() -> Vec<PathBuf> {
    vec![
        PathBuf::from("runs_multi_model").join(DEFAULT_CHECKPOINT_NAME),
        PathBuf::from("..")
            .join("runs_multi_model")
            .join(DEFAULT_CHECKPOINT_NAME),
    ]
}

/// Returns the first candidate with the full required file set, or an error
/// describing what was checked and what each candidate was missing.
fn pick_model_dir(candidates: &[PathBuf]) -> anyhow::Result<&Path> {
    let mut problems = Vec::new();
    for candidate in candidates {
        if !candidate.is_dir() {
            problems.push(format!("- {} (does not exist)", candidate.display()));
            continue;
        }
        let missing = missing_files(candidate, &REQUIRED);
        if missing.is_empty() {
            return Ok(candidate);
        }
        problems.push(format!(
            "- {} (missing: {})",
            candidate.display(),
            missing.join(", ")
        ));
    }
    bail!(
        "Couldn't find a valid model folder.\nChecked:\n{}",
        problems.join("\n")
    )
}

fn stage_bundle(model_dir: &Path, output: &Path) -> anyhow::Result<Vec<String>> {
    fs::create_dir_all(output)
        .with_context(|| format!("Failed to create output directory {}", output.display()))?;

    let mut staged = Vec::new();
    for name in REQUIRED {
        let src = model_dir.join(name);
        fs::copy(&src, output.join(name))
            .with_context(|| format!("Failed to copy {}", src.display()))?;
        staged.push(name.to_string());
    }
    for name in OPTIONAL {
        let src = model_dir.join(name);
        if src.exists() {
            fs::copy(&src, output.join(name))
                .with_context(|| format!("Failed to copy {}", src.display()))?;
            staged.push(name.to_string());
        }
    }
    Ok(staged)
}

fn main() -> anyhow::Result<()> {
    querylabel::init_logger();
    let args = Args::parse();

    let candidates = if args.candidates.is_empty() {
        default_candidates()
    } else {
        args.candidates.clone()
    };

    let model_dir = pick_model_dir(&candidates)?;
    info!("Using model dir: {}", model_dir.display());

    // Make sure the graph the bundle ships actually loads before copying it
    // anywhere.
    create_session_builder(&RuntimeConfig::default())?
        .commit_from_file(model_dir.join("model.onnx"))
        .context("Exported model.onnx failed to load")?;
    info!("ONNX graph verified");

    let staged = stage_bundle(model_dir, &args.output)?;

    println!("Export complete! Files written to: {}", args.output.display());
    for name in &staged {
        println!("  {}", name);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_checkpoint(dir: &Path, files: &[&str]) {
        fs::create_dir_all(dir).unwrap();
        for name in files {
            fs::write(dir.join(name), b"stub").unwrap();
        }
    }

    #[test]
    fn test_first_complete_candidate_wins() {
        let base = std::env::temp_dir().join("querylabel-export-pick");
        let _ = fs::remove_dir_all(&base);
        let incomplete = base.join("incomplete");
        let complete = base.join("complete");
        make_checkpoint(&incomplete, &["config.json", "tokenizer.json"]);
        make_checkpoint(&complete, &REQUIRED);

        let candidates = vec![incomplete.clone(), complete.clone()];
        let picked = pick_model_dir(&candidates).unwrap();
        assert_eq!(picked, complete.as_path());
        fs::remove_dir_all(&base).unwrap();
    }

    #[test]
    fn test_diagnostic_names_every_candidate() {
        let base = std::env::temp_dir().join("querylabel-export-diagnostic");
        let _ = fs::remove_dir_all(&base);
        let incomplete = base.join("incomplete");
        make_checkpoint(&incomplete, &["config.json"]);
        let absent = base.join("absent");

        let candidates = vec![incomplete.clone(), absent.clone()];
        let err = pick_model_dir(&candidates).unwrap_err().to_string();
        assert!(err.contains(&incomplete.display().to_string()));
        assert!(err.contains("vocab.txt"));
        assert!(err.contains(&absent.display().to_string()));
        assert!(err.contains("does not exist"));
        fs::remove_dir_all(&base).unwrap();
    }

    #[test]
    fn test_stage_bundle_copies_required_and_optional_files() {
        let base = std::env::temp_dir().join("querylabel-export-stage");
        let _ = fs::remove_dir_all(&base);
        let checkpoint = base.join("checkpoint");
        let output = base.join("out");
        make_checkpoint(&checkpoint, &REQUIRED);
        fs::write(checkpoint.join("id_to_label.json"), b"{}").unwrap();

        let staged = stage_bundle(&checkpoint, &output).unwrap();
        assert!(staged.contains(&"model.onnx".to_string()));
        assert!(staged.contains(&"id_to_label.json".to_string()));
        assert!(!staged.contains(&"label_to_id.json".to_string()));
        assert!(output.join("model.onnx").exists());
        assert!(output.join("id_to_label.json").exists());
        fs::remove_dir_all(&base).unwrap();
    }
}
