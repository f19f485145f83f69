use crate::core::colormap::Colormap;
use crate::domain::model::PdfSource;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{PipelineError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub source: SourceConfig,
    pub download: DownloadConfig,
    pub extract: ExtractConfig,
    pub wordcloud: CloudConfig,
    pub output: OutputConfig,
    pub monitoring: MonitoringConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub url: Option<String>,
    pub file: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DownloadConfig {
    pub timeout_seconds: u64,
    pub retry_attempts: u32,
    pub retry_delay_seconds: u64,
    pub user_agent: String,
    pub headers: HashMap<String, String>,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 60,
            retry_attempts: 2,
            retry_delay_seconds: 1,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            headers: HashMap::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractConfig {
    /// 從每頁與全文移除的浮水印字串
    pub strip_phrases: Vec<String>,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            strip_phrases: vec![
                "Property of AmericanRhetoric.com".to_string(),
                "AmericanRhetoric.com".to_string(),
            ],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CloudConfig {
    pub width: u32,
    pub height: u32,
    pub background_color: String,
    pub colormap: String,
    pub max_words: usize,
    pub min_font_size: u32,
    pub max_font_size: u32,
    pub font_step: u32,
    pub relative_scaling: f64,
    pub prefer_horizontal: f64,
    pub margin: u32,
    pub random_seed: u64,
    pub min_word_length: usize,
    pub include_numbers: bool,
    pub normalize_plurals: bool,
    pub stopwords: Vec<String>,
}

impl Default for CloudConfig {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 600,
            background_color: "white".to_string(),
            colormap: "viridis".to_string(),
            max_words: 200,
            min_font_size: 10,
            max_font_size: 150,
            font_step: 1,
            relative_scaling: 0.5,
            prefer_horizontal: 0.9,
            margin: 2,
            random_seed: 42,
            min_word_length: 0,
            include_numbers: false,
            normalize_plurals: true,
            stopwords: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub path: String,
    pub archive: bool,
    pub save_pdf: bool,
    pub top_words_in_report: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: "./output".to_string(),
            archive: false,
            save_pdf: false,
            top_words_in_report: 25,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitoringConfig {
    pub enabled: bool,
}

impl AppConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;
        Ok(toml::from_str(&processed_content)?)
    }

    /// 替換環境變數 (例如 ${PDF_URL})；找不到的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| PipelineError::ConfigError {
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.enabled
    }

    pub fn output_path(&self) -> &str {
        &self.output.path
    }
}

impl ConfigProvider for AppConfig {
    fn source(&self) -> Result<PdfSource> {
        match (&self.source.url, &self.source.file) {
            (Some(url), None) => Ok(PdfSource::Url(url.clone())),
            (None, Some(file)) => Ok(PdfSource::File(PathBuf::from(file))),
            (Some(_), Some(_)) => Err(PipelineError::ConfigError {
                message: "source.url and source.file are mutually exclusive".to_string(),
            }),
            (None, None) => Err(PipelineError::MissingConfigError {
                field: "source.url or source.file".to_string(),
            }),
        }
    }

    fn download(&self) -> &DownloadConfig {
        &self.download
    }

    fn extract(&self) -> &ExtractConfig {
        &self.extract
    }

    fn cloud(&self) -> &CloudConfig {
        &self.wordcloud
    }

    fn output(&self) -> &OutputConfig {
        &self.output
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        match self.source()? {
            PdfSource::Url(url) => validation::validate_url("source.url", &url)?,
            PdfSource::File(path) => {
                validation::validate_path("source.file", &path.to_string_lossy())?
            }
        }

        validation::validate_positive_number(
            "download.timeout_seconds",
            self.download.timeout_seconds as usize,
            1,
        )?;

        let cloud = &self.wordcloud;
        validation::validate_positive_number("wordcloud.width", cloud.width as usize, 1)?;
        validation::validate_positive_number("wordcloud.height", cloud.height as usize, 1)?;
        validation::validate_positive_number("wordcloud.max_words", cloud.max_words, 1)?;
        validation::validate_positive_number("wordcloud.min_font_size", cloud.min_font_size as usize, 1)?;
        validation::validate_positive_number("wordcloud.font_step", cloud.font_step as usize, 1)?;
        if cloud.min_font_size > cloud.max_font_size {
            return Err(PipelineError::InvalidConfigValueError {
                field: "wordcloud.max_font_size".to_string(),
                value: cloud.max_font_size.to_string(),
                reason: format!(
                    "Must not be smaller than min_font_size ({})",
                    cloud.min_font_size
                ),
            });
        }
        validation::validate_range("wordcloud.relative_scaling", cloud.relative_scaling, 0.0, 1.0)?;
        validation::validate_range("wordcloud.prefer_horizontal", cloud.prefer_horizontal, 0.0, 1.0)?;
        validation::validate_range("wordcloud.margin", cloud.margin, 0, cloud.width.max(cloud.height))?;
        validation::validate_one_of("wordcloud.colormap", &cloud.colormap, Colormap::NAMES)?;
        validation::validate_color("wordcloud.background_color", &cloud.background_color)?;

        validation::validate_path("output.path", &self.output.path)?;

        Ok(())
    }
}
