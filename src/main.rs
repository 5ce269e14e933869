use anyhow::Context;
use clap::Parser;
use log::info;
use std::sync::Arc;
use std::time::Instant;

use querylabel::server::{create_router, AppState};
use querylabel::Classifier;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory containing model.onnx, tokenizer.json, and config.json
    #[arg(short, long, default_value = "./model")]
    checkpoint: String,

    /// Address to bind the HTTP server to
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Port to listen on
    #[arg(short, long, default_value_t = 8000)]
    port: u16,

    /// Maximum number of queries per model invocation
    #[arg(short, long, default_value_t = 16)]
    batch_size: usize,

    /// Token length queries are truncated to
    #[arg(long, default_value_t = 128)]
    max_tokens: usize,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    querylabel::init_logger();
    let args = Args::parse();

    let start_time = Instant::now();
    info!("Loading classifier from {}", args.checkpoint);

    let classifier = Classifier::builder()
        .with_checkpoint(&args.checkpoint)?
        .with_batch_size(args.batch_size)?
        .with_max_tokens(args.max_tokens)?
        .build()?;

    let classifier_info = classifier.info();
    info!(
        "Classifier ready in {:.2?}: {} labels, batch size {}, max {} tokens",
        start_time.elapsed(),
        classifier_info.num_labels,
        classifier_info.batch_size,
        classifier_info.max_tokens
    );

    let state = Arc::new(AppState { classifier });
    let app = create_router(state);

    let addr = format!("{}:{}", args.host, args.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Listening on http://{}", addr);

    axum::serve(listener, app)
        .await
        .context("HTTP server error")?;

    Ok(())
}
