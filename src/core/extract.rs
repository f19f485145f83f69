use crate::domain::model::{DocumentMetadata, ExtractedDocument, PageText, PdfSource};
use crate::utils::error::{PipelineError, Result};
use lopdf::{Dictionary, Document, Object};

/// 在 blocking 執行緒上解析 PDF；解析器 panic 也會轉成 `PdfParseError`
pub async fn extract_document_blocking(
    source: PdfSource,
    bytes: Vec<u8>,
    strip_phrases: Vec<String>,
) -> Result<ExtractedDocument> {
    tokio::task::spawn_blocking(move || extract_document(source, bytes, &strip_phrases))
        .await
        .map_err(|e| PipelineError::PdfParseError {
            message: format!("text extraction aborted: {}", e),
        })?
}

pub fn extract_document(
    source: PdfSource,
    bytes: Vec<u8>,
    strip_phrases: &[String],
) -> Result<ExtractedDocument> {
    let doc = Document::load_mem(&bytes).map_err(|e| PipelineError::PdfParseError {
        message: e.to_string(),
    })?;

    let page_count = doc.get_pages().len();
    let metadata = read_metadata(&doc, page_count);
    tracing::info!("📄 Processing PDF with {} pages", page_count);

    let raw_pages = pdf_extract::extract_text_from_mem_by_pages(&bytes).map_err(|e| {
        PipelineError::PdfParseError {
            message: e.to_string(),
        }
    })?;

    let phrases = ordered_phrases(strip_phrases);

    let pages: Vec<PageText> = raw_pages
        .iter()
        .enumerate()
        .map(|(index, raw)| {
            let text = strip_phrases_from(raw, &phrases);
            PageText {
                page_number: index + 1,
                char_count: text.chars().count(),
                text,
            }
        })
        .collect();

    let full_text = strip_phrases_from(&raw_pages.join("\n\n"), &phrases);
    tracing::info!("✂️ Extracted {} characters total", full_text.chars().count());

    Ok(ExtractedDocument {
        source,
        metadata,
        pages,
        full_text,
        pdf_bytes: bytes,
    })
}

/// 長的字串先移除，避免 "Property of X" 只剩下 "Property of "
fn ordered_phrases(phrases: &[String]) -> Vec<&str> {
    let mut ordered: Vec<&str> = phrases
        .iter()
        .map(String::as_str)
        .filter(|p| !p.is_empty())
        .collect();
    ordered.sort_by(|a, b| b.len().cmp(&a.len()));
    ordered
}

fn strip_phrases_from(text: &str, phrases: &[&str]) -> String {
    phrases
        .iter()
        .fold(text.to_string(), |acc, phrase| acc.replace(phrase, ""))
}

fn read_metadata(doc: &Document, page_count: usize) -> DocumentMetadata {
    let info: Option<&Dictionary> = match doc.trailer.get(b"Info") {
        Ok(Object::Reference(id)) => doc.get_dictionary(*id).ok(),
        Ok(Object::Dictionary(dict)) => Some(dict),
        _ => None,
    };

    let field = |key: &[u8]| -> String {
        info.and_then(|dict| dict.get(key).ok())
            .map(|object| decode_text_object(doc, object))
            .unwrap_or_default()
    };

    DocumentMetadata {
        title: field(b"Title"),
        author: field(b"Author"),
        subject: field(b"Subject"),
        keywords: field(b"Keywords"),
        page_count,
    }
}

fn decode_text_object(doc: &Document, object: &Object) -> String {
    match object {
        Object::String(bytes, _) => decode_text_string(bytes),
        Object::Reference(id) => match doc.get_object(*id) {
            Ok(Object::String(bytes, _)) => decode_text_string(bytes),
            _ => String::new(),
        },
        _ => String::new(),
    }
}

/// PDF text string: UTF-16BE with BOM, UTF-8 with BOM, otherwise one byte per char.
fn decode_text_string(bytes: &[u8]) -> String {
    let decoded = if let Some(rest) = bytes.strip_prefix(&[0xfe, 0xff]) {
        let units = rest
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]));
        char::decode_utf16(units)
            .map(|r| r.unwrap_or(char::REPLACEMENT_CHARACTER))
            .collect()
    } else if let Some(rest) = bytes.strip_prefix(&[0xef, 0xbb, 0xbf]) {
        String::from_utf8_lossy(rest).into_owned()
    } else {
        bytes.iter().map(|&b| b as char).collect::<String>()
    };

    decoded.trim_end_matches('\0').trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::testing::{build_pdf, build_pdf_with, FixtureOptions};

    fn source() -> PdfSource {
        PdfSource::Url("https://example.com/speech.pdf".to_string())
    }

    #[test]
    fn test_extracts_metadata_and_pages() {
        let bytes = build_pdf(
            &[&["I have a dream today"], &["Let freedom ring"]],
            &[("Title", "Dream Speech"), ("Author", "Martin Luther King Jr.")],
        );

        let doc = extract_document(source(), bytes, &[]).unwrap();

        assert_eq!(doc.metadata.title, "Dream Speech");
        assert_eq!(doc.metadata.author, "Martin Luther King Jr.");
        assert_eq!(doc.metadata.subject, "");
        assert_eq!(doc.metadata.page_count, 2);

        assert_eq!(doc.pages.len(), 2);
        assert_eq!(doc.pages[0].page_number, 1);
        assert_eq!(doc.pages[1].page_number, 2);
        assert!(doc.pages[0].text.contains("dream"));
        assert!(doc.pages[1].text.contains("freedom"));
        assert_eq!(doc.pages[0].char_count, doc.pages[0].text.chars().count());

        assert!(doc.full_text.contains("dream"));
        assert!(doc.full_text.contains("freedom"));
        assert!(doc.full_text.contains("\n\n"));
    }

    #[test]
    fn test_strips_watermark_phrases_longest_first() {
        let bytes = build_pdf(
            &[&["Property of AmericanRhetoric.com", "Free at last"]],
            &[],
        );
        let phrases = vec![
            "AmericanRhetoric.com".to_string(),
            "Property of AmericanRhetoric.com".to_string(),
        ];

        let doc = extract_document(source(), bytes, &phrases).unwrap();

        assert!(!doc.full_text.contains("AmericanRhetoric"));
        assert!(!doc.full_text.contains("Property of"));
        assert!(!doc.pages[0].text.contains("AmericanRhetoric"));
        assert!(doc.full_text.contains("Free at last"));
    }

    #[test]
    fn test_missing_info_dictionary_gives_empty_metadata() {
        let bytes = build_pdf(&[&["text"]], &[]);
        let doc = extract_document(source(), bytes, &[]).unwrap();
        assert_eq!(doc.metadata.title, "");
        assert_eq!(doc.metadata.keywords, "");
        assert_eq!(doc.metadata.page_count, 1);
    }

    #[test]
    fn test_inline_info_dictionary_is_read() {
        let bytes = build_pdf_with(
            &[&["Let freedom ring"]],
            &[("Title", "Inline Title"), ("Keywords", "freedom")],
            FixtureOptions {
                inline_info: true,
                ..FixtureOptions::default()
            },
        );

        let doc = extract_document(source(), bytes, &[]).unwrap();
        assert_eq!(doc.metadata.title, "Inline Title");
        assert_eq!(doc.metadata.keywords, "freedom");
    }

    #[tokio::test]
    async fn test_extractor_panic_becomes_parse_error() {
        // Font /F9 is missing from the page resources
        let bytes = build_pdf_with(
            &[&["unreadable"]],
            &[],
            FixtureOptions {
                content_font: "F9",
                ..FixtureOptions::default()
            },
        );

        let err = extract_document_blocking(source(), bytes, Vec::new())
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::PdfParseError { .. }));
    }

    #[test]
    fn test_garbage_is_parse_error() {
        let err = extract_document(source(), b"%PDF-1.4 not really".to_vec(), &[]).unwrap_err();
        assert!(matches!(err, PipelineError::PdfParseError { .. }));
    }

    #[tokio::test]
    async fn test_blocking_wrapper() {
        let bytes = build_pdf(&[&["content"]], &[]);
        let doc = extract_document_blocking(source(), bytes, Vec::new())
            .await
            .unwrap();
        assert_eq!(doc.pages.len(), 1);
        assert!(!doc.pdf_bytes.is_empty());
    }

    #[test]
    fn test_decode_text_string() {
        assert_eq!(decode_text_string(b"Plain title"), "Plain title");
        assert_eq!(
            decode_text_string(&[0xfe, 0xff, 0x00, 0x43, 0x00, 0x61, 0x00, 0x66, 0x00, 0xe9]),
            "Café"
        );
        assert_eq!(decode_text_string(&[0xef, 0xbb, 0xbf, b'O', b'K']), "OK");
    }
}
