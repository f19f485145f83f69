mod common;

use httpmock::prelude::*;
use pdf_wordcloud::{AppConfig, LocalStorage, PipelineEngine, PipelineError, WordcloudPipeline};
use std::io::Read;
use std::path::Path;
use tempfile::TempDir;

fn config_for(output_path: &str) -> AppConfig {
    let mut config = AppConfig::default();
    config.output.path = output_path.to_string();
    config.download.retry_attempts = 0;
    config
}

#[tokio::test]
async fn test_end_to_end_from_url() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let server = MockServer::start_async().await;
    let pdf_mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/speeches/dream.pdf");
            then.status(200)
                .header("Content-Type", "application/pdf")
                .body(common::dream_speech_pdf());
        })
        .await;

    let mut config = config_for(&output_path);
    config.source.url = Some(server.url("/speeches/dream.pdf"));
    config.output.archive = true;

    let storage = LocalStorage::new(output_path.clone());
    let pipeline = WordcloudPipeline::new(storage, config).unwrap();
    let engine = PipelineEngine::new(pipeline);

    let output = engine.run().await.unwrap();
    pdf_mock.assert_async().await;

    assert!(output.summary.starts_with("Extracted "));
    assert!(output.summary.ends_with(" words from 3 pages."));

    for file in [
        "extracted_text.txt",
        "wordcloud.svg",
        "report.html",
        "word_frequencies.csv",
        "extraction.json",
        "pdf_wordcloud_output.zip",
    ] {
        assert!(Path::new(&output_path).join(file).exists(), "{} missing", file);
    }
    assert!(!Path::new(&output_path).join("source.pdf").exists());
    assert_eq!(
        output.report,
        Path::new(&output_path).join("report.html").display().to_string()
    );

    let text = std::fs::read_to_string(&output.extracted_text).unwrap();
    assert!(text.contains("dream"));
    assert!(text.contains("freedom"));
    assert!(!text.contains("AmericanRhetoric"));

    let report = std::fs::read_to_string(&output.report).unwrap();
    assert!(report.contains("I Have a Dream"));
    assert!(report.contains("civil rights, freedom"));
    assert!(report.contains("📖 Page 3"));
    assert!(report.contains("data:image/svg+xml;base64,"));

    let svg = std::fs::read_to_string(&output.wordcloud_image).unwrap();
    assert!(svg.contains("width=\"1200\" height=\"600\""));
    assert!(svg.contains("</text>"));

    let csv = std::fs::read_to_string(&output.frequencies).unwrap();
    assert!(csv.starts_with("word,count\n"));
    assert!(csv.contains("\ndream,2\n"));

    let archive_path = output.archive.unwrap();
    let zip_data = std::fs::read(&archive_path).unwrap();
    let mut archive = zip::ZipArchive::new(std::io::Cursor::new(zip_data)).unwrap();
    assert_eq!(archive.len(), 5);
    let mut archived_text = String::new();
    archive
        .by_name("extracted_text.txt")
        .unwrap()
        .read_to_string(&mut archived_text)
        .unwrap();
    assert_eq!(archived_text, text);
}

#[tokio::test]
async fn test_end_to_end_from_local_file() {
    let temp_dir = TempDir::new().unwrap();
    let pdf_path = temp_dir.path().join("dream.pdf");
    std::fs::write(&pdf_path, common::dream_speech_pdf()).unwrap();
    let output_path = temp_dir.path().join("out").to_str().unwrap().to_string();

    let mut config = config_for(&output_path);
    config.source.file = Some(pdf_path.to_str().unwrap().to_string());
    config.output.save_pdf = true;

    let storage = LocalStorage::new(output_path.clone());
    let engine = PipelineEngine::new_with_monitoring(
        WordcloudPipeline::new(storage, config).unwrap(),
        true,
    );
    let output = engine.run().await.unwrap();

    let copied = std::fs::read(output.pdf.unwrap()).unwrap();
    assert_eq!(copied, common::dream_speech_pdf());

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&output.extraction_json).unwrap()).unwrap();
    assert_eq!(json["metadata"]["author"], "Martin Luther King, Jr.");
    assert_eq!(json["metadata"]["page_count"], 3);
    assert_eq!(json["pages"][0]["page_number"], 1);
    assert!(json["stats"]["word_count"].as_u64().unwrap() > 20);
}

#[tokio::test]
async fn test_download_failure_writes_nothing() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().join("out").to_str().unwrap().to_string();

    let server = MockServer::start_async().await;
    let missing = server
        .mock_async(|when, then| {
            when.method(GET).path("/gone.pdf");
            then.status(404);
        })
        .await;

    let mut config = config_for(&output_path);
    config.source.url = Some(server.url("/gone.pdf"));

    let storage = LocalStorage::new(output_path.clone());
    let engine = PipelineEngine::new(WordcloudPipeline::new(storage, config).unwrap());
    let err = engine.run().await.unwrap_err();

    missing.assert_async().await;
    assert!(matches!(
        err,
        PipelineError::DownloadStatusError { status: 404, .. }
    ));
    assert!(!Path::new(&output_path).exists());
}

#[tokio::test]
async fn test_local_file_that_is_not_a_pdf() {
    let temp_dir = TempDir::new().unwrap();
    let fake = temp_dir.path().join("notes.pdf");
    std::fs::write(&fake, "just some notes").unwrap();

    let mut config = config_for(temp_dir.path().join("out").to_str().unwrap());
    config.source.file = Some(fake.to_str().unwrap().to_string());

    let storage = LocalStorage::new(temp_dir.path().join("out"));
    let engine = PipelineEngine::new(WordcloudPipeline::new(storage, config).unwrap());
    let err = engine.run().await.unwrap_err();

    assert!(matches!(err, PipelineError::InvalidPdfError { .. }));
}

#[tokio::test]
async fn test_missing_local_file_is_io_error() {
    let temp_dir = TempDir::new().unwrap();
    let mut config = config_for(temp_dir.path().to_str().unwrap());
    config.source.file = Some(temp_dir.path().join("absent.pdf").to_str().unwrap().to_string());

    let engine = PipelineEngine::new(
        WordcloudPipeline::new(LocalStorage::new(temp_dir.path()), config).unwrap(),
    );
    let err = engine.run().await.unwrap_err();

    assert!(matches!(err, PipelineError::IoError(_)));
}
