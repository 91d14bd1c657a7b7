//! Integration tests for the extraction pipeline.

use crate::{ExtractionPipeline, ExtractorConfig, ExtractorError, PipelineEvent};
use commodex_llm::MockBackend;
use std::sync::{Arc, Mutex};

fn config_with_budget(chunk_token_budget: usize) -> ExtractorConfig {
    ExtractorConfig {
        chunk_token_budget,
        request_timeout_secs: 30,
        ..ExtractorConfig::default()
    }
}

/// Two marker-delimited sections, each ~13 estimated tokens.
fn two_page_document() -> String {
    "--- Page 1 ---\nSugar strategy overview with cost detail.\n\
     --- Page 2 ---\nInitiative detail for the sugar strategy.\n"
        .to_string()
}

#[tokio::test]
async fn single_pass_standardizes_fenced_reply() {
    let backend = MockBackend::new(
        "Here is the extracted data:\n```json\n{\n  \"commodity_name\": \"Sugar\",\n  \"responsible_managers\": \"J. Meier\",\n  \"qualitative_initiatives\": [\"Reduce packaging\"]\n}\n```",
    );
    let pipeline = ExtractionPipeline::new(backend, ExtractorConfig::default());

    let record = pipeline.extract("Short sugar document.").await.unwrap();

    assert_eq!(record.commodity_name.as_deref(), Some("Sugar"));
    assert_eq!(
        record.responsible_managers,
        Some(vec!["J. Meier".to_string()])
    );
    let initiatives = record.qualitative_initiatives.unwrap();
    assert_eq!(initiatives[0].id, "Q1");
    assert_eq!(initiatives[0].title, "Reduce packaging");
    assert_eq!(initiatives[0].description, None);
}

#[tokio::test]
async fn unparseable_reply_fails_with_raw_text() {
    let backend = MockBackend::new("I could not find any structured information.");
    let pipeline = ExtractionPipeline::new(backend, ExtractorConfig::default());

    let result = pipeline.extract("Short document.").await;
    match result {
        Err(ExtractorError::Parse { raw_response, .. }) => {
            assert_eq!(raw_response, "I could not find any structured information.");
        }
        other => panic!("expected parse error, got {other:?}"),
    }
}

#[tokio::test]
async fn chunked_path_merges_partial_records() {
    let backend = MockBackend::new("{}");
    backend.push_response(
        r#"{"commodity_name": "Sugar",
            "quantitative_initiatives": [{"description": "Energy cost reduction", "value_eur": 50000}]}"#,
    );
    backend.push_response(
        r#"{"commodity_name": null,
            "quantitative_initiatives": [
                {"description": "Energy cost reduction", "value_eur": 50000},
                {"description": "Hedge contract", "value_eur": 20000}
            ]}"#,
    );

    let pipeline = ExtractionPipeline::new(backend, config_with_budget(10));
    let record = pipeline.extract(&two_page_document()).await.unwrap();

    // First chunk supplies the name; the second chunk's null does not.
    assert_eq!(record.commodity_name.as_deref(), Some("Sugar"));

    let initiatives = record.quantitative_initiatives.unwrap();
    assert_eq!(initiatives.len(), 2);
    assert_eq!(initiatives[0].description, "Energy cost reduction");
    assert_eq!(initiatives[1].description, "Hedge contract");
    assert_eq!(initiatives[0].id, "QT1");
    assert_eq!(initiatives[1].id, "QT2");
}

#[tokio::test]
async fn failed_chunk_is_skipped_not_fatal() {
    let backend = MockBackend::new("{}");
    backend.push_error("connection reset by peer");
    backend.push_response(r#"{"commodity_name": "Sugar"}"#);

    let pipeline = ExtractionPipeline::new(backend, config_with_budget(10));
    let record = pipeline.extract(&two_page_document()).await.unwrap();

    assert_eq!(record.commodity_name.as_deref(), Some("Sugar"));
}

#[tokio::test]
async fn all_chunks_failing_is_an_error() {
    let backend = MockBackend::new("{}");
    backend.push_error("connection reset by peer");
    backend.push_error("connection reset by peer");

    let pipeline = ExtractionPipeline::new(backend, config_with_budget(10));
    let result = pipeline.extract(&two_page_document()).await;

    assert!(matches!(result, Err(ExtractorError::AllChunksFailed)));
}

#[tokio::test]
async fn observer_sees_chunk_lifecycle() {
    let backend = MockBackend::new("{}");
    backend.push_response(r#"{"commodity_name": "Sugar"}"#);
    backend.push_error("boom");

    let events: Arc<Mutex<Vec<PipelineEvent>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&events);

    let pipeline = ExtractionPipeline::new(backend, config_with_budget(10))
        .with_observer(move |event| sink.lock().unwrap().push(event.clone()));

    pipeline.extract(&two_page_document()).await.unwrap();

    let events = events.lock().unwrap();
    assert!(matches!(
        events[0],
        PipelineEvent::DocumentChunked { chunk_count: 2, .. }
    ));
    assert!(matches!(events[1], PipelineEvent::ChunkStarted { index: 0, total: 2 }));
    assert!(matches!(events[2], PipelineEvent::ChunkCompleted { index: 0, .. }));
    assert!(matches!(events[3], PipelineEvent::ChunkStarted { index: 1, .. }));
    assert!(matches!(
        &events[4],
        PipelineEvent::ChunkFailed { index: 1, reason, .. } if reason.contains("boom")
    ));
}

#[tokio::test]
async fn small_document_takes_single_pass() {
    let backend = MockBackend::new(r#"{"commodity_name": "Dairy"}"#);
    let pipeline = ExtractionPipeline::new(backend.clone(), ExtractorConfig::default());

    let record = pipeline.extract("One short dairy note.").await.unwrap();

    assert_eq!(record.commodity_name.as_deref(), Some("Dairy"));
    assert_eq!(backend.call_count(), 1);
}
