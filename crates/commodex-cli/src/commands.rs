//! Command implementations.

use crate::cli::{ExtractArgs, PreviewArgs};
use anyhow::Context;
use commodex_domain::{CommodityRecord, ErrorRecord};
use commodex_extractor::{
    estimate_tokens, ExtractionPipeline, ExtractorConfig, ExtractorError, PipelineEvent,
};
use commodex_llm::{ChatBackend, LlmBackend, PromptBackend};
use std::path::Path;
use std::time::Duration;

pub async fn extract(args: ExtractArgs) -> anyhow::Result<()> {
    let document = commodex_document::extract_text(&args.file)
        .with_context(|| format!("could not convert {}", args.file.display()))?;

    let mut config = ExtractorConfig::default();
    if let Some(token_budget) = args.token_budget {
        config.chunk_token_budget = token_budget;
    }
    if let Some(timeout) = args.timeout {
        config.request_timeout_secs = timeout;
    }
    config.validate().map_err(anyhow::Error::msg)?;

    let timeout = Duration::from_secs(config.request_timeout_secs);
    let result = if args.chat {
        let backend = ChatBackend::new(&args.api_url, &args.api_token)
            .with_model(args.model.clone())
            .with_timeout(timeout);
        run_pipeline(backend, config, &document.text).await
    } else {
        let backend = PromptBackend::new(&args.api_url, &args.api_token).with_timeout(timeout);
        run_pipeline(backend, config, &document.text).await
    };

    match result {
        Ok(record) => {
            write_artifact(args.output.as_deref(), &serde_json::to_string_pretty(&record)?)
        }
        Err(error) => {
            let record = ErrorRecord::from(&error);
            write_artifact(args.output.as_deref(), &serde_json::to_string_pretty(&record)?)?;
            std::process::exit(1);
        }
    }
}

pub fn preview(args: PreviewArgs) -> anyhow::Result<()> {
    let document = commodex_document::extract_text(&args.file)
        .with_context(|| format!("could not convert {}", args.file.display()))?;

    println!("{}", document.text);

    let tokens = estimate_tokens(&document.text);
    let config = ExtractorConfig::default();
    eprintln!("Estimated token count: {tokens}");
    if tokens > config.chunk_token_budget {
        eprintln!(
            "Document exceeds the default chunk budget ({}); extraction will chunk it.",
            config.chunk_token_budget
        );
    }
    Ok(())
}

async fn run_pipeline<B>(
    backend: B,
    config: ExtractorConfig,
    text: &str,
) -> Result<CommodityRecord, ExtractorError>
where
    B: LlmBackend + Send + Sync + 'static,
{
    let pipeline = ExtractionPipeline::new(backend, config).with_observer(report_progress);
    pipeline.extract(text).await
}

/// Progress reporting for interactive runs; events go to stderr so stdout
/// stays a clean JSON artifact.
fn report_progress(event: &PipelineEvent) {
    match event {
        PipelineEvent::DocumentChunked {
            chunk_count,
            estimated_tokens,
        } => {
            eprintln!("Document estimated at {estimated_tokens} tokens; split into {chunk_count} chunks");
        }
        PipelineEvent::ChunkStarted { index, total } => {
            eprintln!("Analyzing chunk {}/{total}...", index + 1);
        }
        PipelineEvent::ChunkCompleted { .. } => {}
        PipelineEvent::ChunkFailed { index, total, reason } => {
            eprintln!("Warning: chunk {}/{total} failed and was skipped: {reason}", index + 1);
        }
    }
}

fn write_artifact(output: Option<&Path>, json: &str) -> anyhow::Result<()> {
    match output {
        Some(path) => std::fs::write(path, json)
            .with_context(|| format!("could not write {}", path.display()))?,
        None => println!("{json}"),
    }
    Ok(())
}
