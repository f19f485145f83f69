use crate::config::toml_config::AppConfig;
use crate::utils::error::Result;
use clap::Parser;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize, Parser)]
#[command(name = "pdf-wordcloud")]
#[command(about = "Extract text from a PDF, build a word cloud and an HTML report")]
pub struct CliConfig {
    /// URL of the PDF to process
    pub url: Option<String>,

    /// Local PDF file instead of a URL
    #[arg(long, conflicts_with = "url")]
    pub file: Option<String>,

    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Output directory
    #[arg(short, long)]
    pub output: Option<String>,

    #[arg(long)]
    pub max_words: Option<usize>,

    #[arg(long)]
    pub width: Option<u32>,

    #[arg(long)]
    pub height: Option<u32>,

    #[arg(long)]
    pub colormap: Option<String>,

    #[arg(long)]
    pub background: Option<String>,

    /// Seed for word orientation and colors
    #[arg(long)]
    pub seed: Option<u64>,

    /// Also bundle all outputs into a ZIP archive
    #[arg(long)]
    pub archive: bool,

    /// Keep a copy of the source PDF next to the outputs
    #[arg(long)]
    pub save_pdf: bool,

    #[arg(long, help = "Enable system resource monitoring")]
    pub monitor: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,

    /// Show what would be processed without executing
    #[arg(long)]
    pub dry_run: bool,
}

impl CliConfig {
    /// 載入配置檔 (若有) 並套用命令列覆蓋設定
    pub fn resolve(&self) -> Result<AppConfig> {
        let mut config = match &self.config {
            Some(path) => AppConfig::from_file(path)?,
            None => AppConfig::default(),
        };
        self.apply_to(&mut config);
        Ok(config)
    }

    pub fn apply_to(&self, config: &mut AppConfig) {
        if let Some(url) = &self.url {
            config.source.url = Some(url.clone());
            config.source.file = None;
        }
        if let Some(file) = &self.file {
            config.source.file = Some(file.clone());
            config.source.url = None;
        }
        if let Some(output) = &self.output {
            config.output.path = output.clone();
        }
        if let Some(max_words) = self.max_words {
            config.wordcloud.max_words = max_words;
        }
        if let Some(width) = self.width {
            config.wordcloud.width = width;
        }
        if let Some(height) = self.height {
            config.wordcloud.height = height;
        }
        if let Some(colormap) = &self.colormap {
            config.wordcloud.colormap = colormap.clone();
        }
        if let Some(background) = &self.background {
            config.wordcloud.background_color = background.clone();
        }
        if let Some(seed) = self.seed {
            config.wordcloud.random_seed = seed;
        }
        if self.archive {
            config.output.archive = true;
        }
        if self.save_pdf {
            config.output.save_pdf = true;
        }
        if self.monitor {
            config.monitoring.enabled = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::PdfSource;
    use crate::domain::ports::ConfigProvider;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_positional_url() {
        let cli = CliConfig::parse_from([
            "pdf-wordcloud",
            "https://example.com/speech.pdf",
            "--max-words",
            "80",
            "--archive",
        ]);
        let config = cli.resolve().unwrap();

        assert_eq!(
            config.source().unwrap(),
            PdfSource::Url("https://example.com/speech.pdf".to_string())
        );
        assert_eq!(config.wordcloud.max_words, 80);
        assert!(config.output.archive);
    }

    #[test]
    fn test_url_and_file_conflict() {
        let result = CliConfig::try_parse_from([
            "pdf-wordcloud",
            "https://example.com/a.pdf",
            "--file",
            "a.pdf",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_overrides_config_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(
                br#"
[source]
url = "https://example.com/from-file.pdf"

[wordcloud]
colormap = "magma"
width = 800

[output]
path = "./from-file"
"#,
            )
            .unwrap();

        let config_path = temp_file.path().to_str().unwrap().to_string();
        let cli = CliConfig::parse_from([
            "pdf-wordcloud",
            "--config",
            config_path.as_str(),
            "--file",
            "local.pdf",
            "--output",
            "./from-cli",
            "--colormap",
            "inferno",
        ]);
        let config = cli.resolve().unwrap();

        assert_eq!(config.source().unwrap(), PdfSource::File("local.pdf".into()));
        assert_eq!(config.output.path, "./from-cli");
        assert_eq!(config.wordcloud.colormap, "inferno");
        assert_eq!(config.wordcloud.width, 800);
    }
}
