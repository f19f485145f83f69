use crate::adapters::http::{ensure_pdf, PdfDownloader};
use crate::adapters::storage::LocalStorage;
use crate::core::extract::extract_document_blocking;
use crate::core::frequency::WordCounter;
use crate::core::layout::layout_cloud;
use crate::core::render::render_svg;
use crate::core::report::{build_report, summary, ReportInput};
use crate::core::{ConfigProvider, Pipeline, Storage};
use crate::domain::model::{
    AnalysisResult, DocumentMetadata, ExtractedDocument, PageText, PdfSource, PipelineOutput,
    TextStats, WordFrequency,
};
use crate::utils::error::{PipelineError, Result};
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use zip::write::{FileOptions, ZipWriter};

pub const TEXT_FILE: &str = "extracted_text.txt";
pub const IMAGE_FILE: &str = "wordcloud.svg";
pub const REPORT_FILE: &str = "report.html";
pub const FREQUENCIES_FILE: &str = "word_frequencies.csv";
pub const EXTRACTION_FILE: &str = "extraction.json";
pub const PDF_FILE: &str = "source.pdf";
pub const ARCHIVE_FILE: &str = "pdf_wordcloud_output.zip";

#[derive(Serialize)]
struct ExtractionRecord<'a> {
    source: &'a PdfSource,
    metadata: &'a DocumentMetadata,
    stats: TextStats,
    pages: &'a [PageText],
    full_text: &'a str,
}

pub struct WordcloudPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    downloader: PdfDownloader,
    /// 本機 PDF 來源；路徑相對於工作目錄
    input: LocalStorage,
}

impl<S: Storage, C: ConfigProvider> WordcloudPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Result<Self> {
        let downloader = PdfDownloader::new(config.download())?;
        Ok(Self {
            storage,
            config,
            downloader,
            input: LocalStorage::new(""),
        })
    }

    fn output_file(&self, name: &str) -> String {
        Path::new(&self.config.output().path)
            .join(name)
            .display()
            .to_string()
    }
}

fn frequencies_csv(frequencies: &[WordFrequency]) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["word", "count"])?;
    for entry in frequencies {
        writer.write_record([entry.word.as_str(), entry.count.to_string().as_str()])?;
    }
    writer
        .into_inner()
        .map_err(|e| PipelineError::ProcessingError {
            message: format!("failed to finish CSV output: {}", e),
        })
}

fn bundle(files: &[(&str, Vec<u8>)]) -> Result<Vec<u8>> {
    let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));
    for (name, data) in files {
        zip.start_file::<_, ()>(*name, FileOptions::default())?;
        zip.write_all(data)?;
    }
    let cursor = zip.finish()?;
    Ok(cursor.into_inner())
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for WordcloudPipeline<S, C> {
    async fn extract(&self) -> Result<ExtractedDocument> {
        let source = self.config.source()?;

        let bytes = match &source {
            PdfSource::Url(url) => self.downloader.download(url).await?,
            PdfSource::File(path) => {
                tracing::info!("📂 Reading PDF from: {}", path.display());
                ensure_pdf(self.input.read_file(&path.to_string_lossy()).await?)?
            }
        };

        extract_document_blocking(source, bytes, self.config.extract().strip_phrases.clone()).await
    }

    async fn transform(&self, document: ExtractedDocument) -> Result<AnalysisResult> {
        let cloud_config = self.config.cloud();
        let stats = TextStats::from_text(&document.full_text);

        let frequencies = WordCounter::new(cloud_config)?.count(&document.full_text);
        if frequencies.is_empty() {
            tracing::warn!("⚠️ No words left after filtering; the word cloud will be empty");
        }
        tracing::debug!("Counted {} distinct words", frequencies.len());

        tracing::info!("☁️ Generating wordcloud...");
        let cloud = layout_cloud(&frequencies, cloud_config)?;
        let svg = render_svg(&cloud);

        let top_n = self.config.output().top_words_in_report.min(frequencies.len());
        let report_html = build_report(&ReportInput {
            source: &document.source,
            metadata: &document.metadata,
            pages: &document.pages,
            stats,
            svg: &svg,
            top_words: &frequencies[..top_n],
            generated_at: chrono::Utc::now(),
        });
        let summary = summary(&stats, document.metadata.page_count);

        Ok(AnalysisResult {
            document,
            stats,
            frequencies,
            cloud,
            svg,
            report_html,
            summary,
        })
    }

    async fn load(&self, result: AnalysisResult) -> Result<PipelineOutput> {
        let output_config = self.config.output();

        let extraction = serde_json::to_vec_pretty(&ExtractionRecord {
            source: &result.document.source,
            metadata: &result.document.metadata,
            stats: result.stats,
            pages: &result.document.pages,
            full_text: &result.document.full_text,
        })?;

        let mut files: Vec<(&str, Vec<u8>)> = vec![
            (TEXT_FILE, result.document.full_text.as_bytes().to_vec()),
            (IMAGE_FILE, result.svg.into_bytes()),
            (REPORT_FILE, result.report_html.into_bytes()),
            (FREQUENCIES_FILE, frequencies_csv(&result.frequencies)?),
            (EXTRACTION_FILE, extraction),
        ];
        if output_config.save_pdf {
            files.push((PDF_FILE, result.document.pdf_bytes));
        }

        for (name, data) in &files {
            tracing::debug!("Writing {} ({} bytes)", name, data.len());
            self.storage.write_file(name, data).await?;
        }

        let archive = if output_config.archive {
            let zip_data = bundle(&files)?;
            tracing::debug!("Writing ZIP bundle ({} bytes)", zip_data.len());
            self.storage.write_file(ARCHIVE_FILE, &zip_data).await?;
            Some(self.output_file(ARCHIVE_FILE))
        } else {
            None
        };

        Ok(PipelineOutput {
            summary: result.summary,
            extracted_text: self.output_file(TEXT_FILE),
            wordcloud_image: self.output_file(IMAGE_FILE),
            report: self.output_file(REPORT_FILE),
            frequencies: self.output_file(FREQUENCIES_FILE),
            extraction_json: self.output_file(EXTRACTION_FILE),
            archive,
            pdf: output_config.save_pdf.then(|| self.output_file(PDF_FILE)),
        })
    }
}
