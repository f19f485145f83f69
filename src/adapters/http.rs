use crate::config::DownloadConfig;
use crate::utils::error::{PipelineError, Result};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, USER_AGENT};
use reqwest::redirect::Policy;
use reqwest::Client;
use std::time::Duration;

const PDF_MAGIC: &[u8] = b"%PDF-";

/// 下載 PDF，遇到暫時性錯誤會重試
pub struct PdfDownloader {
    client: Client,
    retry_attempts: u32,
    retry_delay: Duration,
}

impl PdfDownloader {
    pub fn new(config: &DownloadConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, header_value("download.user_agent", &config.user_agent)?);
        headers.insert(ACCEPT, HeaderValue::from_static("application/pdf,*/*"));
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));

        for (key, value) in &config.headers {
            let name = HeaderName::from_bytes(key.as_bytes()).map_err(|e| {
                PipelineError::InvalidConfigValueError {
                    field: "download.headers".to_string(),
                    value: key.clone(),
                    reason: e.to_string(),
                }
            })?;
            headers.insert(name, header_value("download.headers", value)?);
        }

        let client = Client::builder()
            .default_headers(headers)
            .redirect(Policy::limited(10))
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            retry_attempts: config.retry_attempts,
            retry_delay: Duration::from_secs(config.retry_delay_seconds),
        })
    }

    pub async fn download(&self, url: &str) -> Result<Vec<u8>> {
        tracing::info!("📥 Downloading PDF from: {}", url);

        let mut attempt = 0;
        loop {
            match self.fetch_once(url).await {
                Ok(bytes) => {
                    tracing::debug!("Downloaded {} bytes", bytes.len());
                    return ensure_pdf(bytes);
                }
                Err(e) if e.is_retryable() && attempt < self.retry_attempts => {
                    attempt += 1;
                    tracing::warn!(
                        "⚠️ Download attempt {} failed: {}. Retrying in {:?}",
                        attempt,
                        e,
                        self.retry_delay
                    );
                    tokio::time::sleep(self.retry_delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn fetch_once(&self, url: &str) -> Result<Vec<u8>> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        tracing::debug!("Response status: {}", status);

        if !status.is_success() {
            return Err(PipelineError::DownloadStatusError {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let bytes = response.bytes().await?;
        Ok(bytes.to_vec())
    }
}

fn header_value(field: &str, value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value).map_err(|e| PipelineError::InvalidConfigValueError {
        field: field.to_string(),
        value: value.to_string(),
        reason: e.to_string(),
    })
}

/// 檢查 `%PDF-` 檔頭 (允許前置空白)
pub fn ensure_pdf(bytes: Vec<u8>) -> Result<Vec<u8>> {
    if bytes.is_empty() {
        return Err(PipelineError::InvalidPdfError {
            reason: "response body is empty".to_string(),
        });
    }

    let start = bytes
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(bytes.len());

    if !bytes[start..].starts_with(PDF_MAGIC) {
        let preview: String = String::from_utf8_lossy(&bytes[start..bytes.len().min(start + 32)])
            .chars()
            .filter(|c| !c.is_control())
            .collect();
        return Err(PipelineError::InvalidPdfError {
            reason: format!("missing %PDF- header (starts with {:?})", preview),
        });
    }

    Ok(bytes)
}
