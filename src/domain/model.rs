use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// PDF 的來源
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PdfSource {
    Url(String),
    File(PathBuf),
}

impl fmt::Display for PdfSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PdfSource::Url(url) => write!(f, "{}", url),
            PdfSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub title: String,
    pub author: String,
    pub subject: String,
    pub keywords: String,
    pub page_count: usize,
}

impl DocumentMetadata {
    /// 報告中依序顯示的欄位
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        vec![
            ("title", self.title.clone()),
            ("author", self.author.clone()),
            ("subject", self.subject.clone()),
            ("keywords", self.keywords.clone()),
            ("page_count", self.page_count.to_string()),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageText {
    pub page_number: usize,
    pub text: String,
    pub char_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedDocument {
    pub source: PdfSource,
    pub metadata: DocumentMetadata,
    pub pages: Vec<PageText>,
    pub full_text: String,
    #[serde(skip)]
    pub pdf_bytes: Vec<u8>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextStats {
    pub total_chars: usize,
    pub word_count: usize,
}

impl TextStats {
    pub fn from_text(text: &str) -> Self {
        Self {
            total_chars: text.chars().count(),
            word_count: text.split_whitespace().count(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordFrequency {
    pub word: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedWord {
    pub word: String,
    pub count: usize,
    pub font_size: u32,
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    pub vertical: bool,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordCloud {
    pub width: u32,
    pub height: u32,
    pub background_color: String,
    pub words: Vec<PlacedWord>,
}

#[derive(Debug, Clone)]
pub struct AnalysisResult {
    pub document: ExtractedDocument,
    pub stats: TextStats,
    pub frequencies: Vec<WordFrequency>,
    pub cloud: WordCloud,
    pub svg: String,
    pub report_html: String,
    pub summary: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineOutput {
    pub summary: String,
    pub extracted_text: String,
    pub wordcloud_image: String,
    pub report: String,
    pub frequencies: String,
    pub extraction_json: String,
    pub archive: Option<String>,
    pub pdf: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_stats_counts_chars_not_bytes() {
        let stats = TextStats::from_text("naïve  café\n\nfin");
        assert_eq!(stats.total_chars, 16);
        assert_eq!(stats.word_count, 3);
    }

    #[test]
    fn test_source_display() {
        assert_eq!(
            PdfSource::Url("https://example.com/a.pdf".to_string()).to_string(),
            "https://example.com/a.pdf"
        );
        assert_eq!(
            PdfSource::File(PathBuf::from("docs/a.pdf")).to_string(),
            "docs/a.pdf"
        );
    }
}
