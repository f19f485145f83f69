use crate::domain::model::{DocumentMetadata, PageText, PdfSource, TextStats, WordFrequency};
use base64::{engine::general_purpose, Engine as _};
use chrono::{DateTime, Utc};

const SOURCE_DISPLAY_LIMIT: usize = 80;

pub struct ReportInput<'a> {
    pub source: &'a PdfSource,
    pub metadata: &'a DocumentMetadata,
    pub pages: &'a [PageText],
    pub stats: TextStats,
    pub svg: &'a str,
    pub top_words: &'a [WordFrequency],
    pub generated_at: DateTime<Utc>,
}

pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// 1234567 -> "1,234,567"
pub fn format_thousands(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

pub fn summary(stats: &TextStats, page_count: usize) -> String {
    format!(
        "Extracted {} words from {} pages.",
        format_thousands(stats.word_count),
        format_thousands(page_count)
    )
}

fn truncate_source(source: &str) -> String {
    if source.chars().count() > SOURCE_DISPLAY_LIMIT {
        let head: String = source.chars().take(SOURCE_DISPLAY_LIMIT).collect();
        format!("{}...", head)
    } else {
        source.to_string()
    }
}

const HTML_HEADER: &str = r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>PDF Text Extraction &amp; Word Cloud Report</title>
<style>
body { margin: 0; background: #16213e; }
.container { font-family: 'Segoe UI', system-ui, sans-serif; max-width: 1200px; margin: 0 auto; padding: 20px; color: #eee; }
.header { background: linear-gradient(90deg, #0f3460, #533483); padding: 30px; border-radius: 12px; margin-bottom: 30px; }
.header h1 { margin: 0 0 15px 0; color: #ff6b6b; }
.source-link { color: #4ecdc4; word-break: break-all; }
.summary-stats { display: flex; gap: 20px; flex-wrap: wrap; margin-bottom: 30px; }
.stat-card { background: rgba(233, 69, 96, 0.1); border: 1px solid rgba(233, 69, 96, 0.3); padding: 20px; border-radius: 10px; text-align: center; min-width: 150px; }
.stat-value { font-size: 2.5em; font-weight: 700; color: #e94560; }
.stat-label { color: #888; font-size: 0.9em; margin-top: 5px; }
section { background: rgba(255,255,255,0.05); border-radius: 12px; padding: 20px; margin-bottom: 30px; }
section h2 { color: #e94560; margin-top: 0; }
.wordcloud-img { max-width: 100%; border-radius: 8px; }
.metadata-grid { display: grid; grid-template-columns: repeat(auto-fit, minmax(200px, 1fr)); gap: 15px; }
.metadata-item { background: rgba(0,0,0,0.2); padding: 10px 15px; border-radius: 6px; }
.metadata-label { color: #888; font-size: 0.85em; text-transform: uppercase; }
.metadata-value { color: #fff; font-weight: 500; margin-top: 5px; }
table.top-words { border-collapse: collapse; width: 100%; }
table.top-words td, table.top-words th { padding: 4px 10px; border-bottom: 1px solid rgba(255,255,255,0.1); text-align: left; }
.page-header { font-weight: 600; font-size: 1.1em; margin-bottom: 10px; }
.badge { display: inline-block; padding: 4px 10px; border-radius: 12px; font-size: 0.75em; background: #0f3460; margin-left: 10px; }
.text-box { background: rgba(0,0,0,0.3); padding: 15px; border-radius: 8px; font-family: 'Fira Code', monospace; font-size: 0.9em; line-height: 1.6; white-space: pre-wrap; word-break: break-word; max-height: 400px; overflow-y: auto; }
.empty-page { color: #888; font-style: italic; }
footer { color: #666; font-size: 0.8em; text-align: center; }
</style>
</head>
<body>
<div class="container">
"#;

const HTML_FOOTER: &str = "</div>\n</body>\n</html>\n";

fn stat_card(html: &mut String, value: usize, label: &str) {
    html.push_str(&format!(
        "<div class=\"stat-card\"><div class=\"stat-value\">{}</div><div class=\"stat-label\">{}</div></div>\n",
        format_thousands(value),
        label
    ));
}

pub fn build_report(input: &ReportInput<'_>) -> String {
    let mut html = String::from(HTML_HEADER);
    let source = input.source.to_string();

    html.push_str("<div class=\"header\">\n<h1>📄 PDF Text Extraction &amp; Word Cloud Report</h1>\n");
    match input.source {
        PdfSource::Url(url) => html.push_str(&format!(
            "<p>Source: <a href=\"{}\" class=\"source-link\" target=\"_blank\">{}</a></p>\n",
            html_escape(url),
            html_escape(&truncate_source(url))
        )),
        PdfSource::File(_) => html.push_str(&format!(
            "<p>Source: <span class=\"source-link\">{}</span></p>\n",
            html_escape(&truncate_source(&source))
        )),
    }
    html.push_str("</div>\n");

    html.push_str("<div class=\"summary-stats\">\n");
    stat_card(&mut html, input.metadata.page_count, "Pages");
    stat_card(&mut html, input.stats.total_chars, "Characters");
    stat_card(&mut html, input.stats.word_count, "Words");
    html.push_str("</div>\n");

    let encoded = general_purpose::STANDARD.encode(input.svg.as_bytes());
    html.push_str("<section class=\"wordcloud-section\">\n<h2>☁️ Word Cloud</h2>\n");
    html.push_str(&format!(
        "<img src=\"data:image/svg+xml;base64,{}\" class=\"wordcloud-img\" alt=\"Word Cloud\">\n",
        encoded
    ));
    html.push_str("</section>\n");

    if !input.top_words.is_empty() {
        html.push_str("<section class=\"top-words-section\">\n<h2>🔤 Top Words</h2>\n");
        html.push_str("<table class=\"top-words\">\n<tr><th>#</th><th>Word</th><th>Count</th></tr>\n");
        for (rank, entry) in input.top_words.iter().enumerate() {
            html.push_str(&format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td></tr>\n",
                rank + 1,
                html_escape(&entry.word),
                format_thousands(entry.count)
            ));
        }
        html.push_str("</table>\n</section>\n");
    }

    html.push_str("<section class=\"metadata\">\n<h2>📋 Document Metadata</h2>\n<div class=\"metadata-grid\">\n");
    for (key, value) in input.metadata.entries() {
        if value.is_empty() {
            continue;
        }
        html.push_str(&format!(
            "<div class=\"metadata-item\"><div class=\"metadata-label\">{}</div><div class=\"metadata-value\">{}</div></div>\n",
            html_escape(key),
            html_escape(&value)
        ));
    }
    html.push_str("</div>\n</section>\n");

    for page in input.pages {
        html.push_str("<section class=\"page-section\">\n");
        html.push_str(&format!(
            "<div class=\"page-header\">📖 Page {}<span class=\"badge\">{} chars</span></div>\n",
            page.page_number,
            format_thousands(page.char_count)
        ));
        if page.text.trim().is_empty() {
            html.push_str("<p class=\"empty-page\">No text found on this page.</p>\n");
        } else {
            html.push_str(&format!(
                "<div class=\"text-box\">{}</div>\n",
                html_escape(&page.text)
            ));
        }
        html.push_str("</section>\n");
    }

    html.push_str(&format!(
        "<footer>Generated at {}</footer>\n",
        input.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    html.push_str(HTML_FOOTER);
    html
}
