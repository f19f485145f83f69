use clap::Parser;
use pdf_wordcloud::core::ConfigProvider;
use pdf_wordcloud::utils::error::ErrorSeverity;
use pdf_wordcloud::utils::logger::{self, LogFormat};
use pdf_wordcloud::utils::validation::Validate;
use pdf_wordcloud::{AppConfig, CliConfig, LocalStorage, PipelineEngine, WordcloudPipeline};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    let log_format = if cli.json_logs {
        LogFormat::Json
    } else {
        LogFormat::Compact
    };
    logger::init_logger(log_format, cli.verbose);

    tracing::info!("Starting pdf-wordcloud");
    if let Some(path) = &cli.config {
        tracing::info!("📁 Loading configuration from: {}", path);
    }

    let config = match cli.resolve() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    if cli.dry_run {
        display_config_summary(&config)?;
        return Ok(());
    }

    let monitor_enabled = config.monitoring_enabled();

    let storage = LocalStorage::new(config.output_path());
    let pipeline = WordcloudPipeline::new(storage, config)?;
    let engine = PipelineEngine::new_with_monitoring(pipeline, monitor_enabled);

    match engine.run().await {
        Ok(output) => {
            println!("✅ {}", output.summary);
            println!("📄 Extracted text: {}", output.extracted_text);
            println!("☁️ Word cloud:     {}", output.wordcloud_image);
            println!("📊 Report:         {}", output.report);
            println!("🔤 Frequencies:    {}", output.frequencies);
            println!("🗂️ Extraction:     {}", output.extraction_json);
            if let Some(pdf) = &output.pdf {
                println!("📎 Source PDF:     {}", pdf);
            }
            if let Some(archive) = &output.archive {
                println!("📦 Archive:        {}", archive);
            }
        }
        Err(e) => {
            tracing::error!(
                "❌ Pipeline failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            // 根據錯誤嚴重程度決定退出碼
            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };

            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}

fn display_config_summary(config: &AppConfig) -> anyhow::Result<()> {
    let cloud = config.cloud();
    println!("🔍 Dry Run Analysis:");
    println!("  Source: {}", config.source()?);
    println!(
        "  Download: timeout {}s, {} retries",
        config.download.timeout_seconds, config.download.retry_attempts
    );
    println!("  Strip phrases: {}", config.extract.strip_phrases.len());
    println!(
        "  Word cloud: {}x{} {} on {}, up to {} words, font {}-{}px, seed {}",
        cloud.width,
        cloud.height,
        cloud.colormap,
        cloud.background_color,
        cloud.max_words,
        cloud.min_font_size,
        cloud.max_font_size,
        cloud.random_seed
    );
    println!("  Output: {}", config.output_path());
    if config.output.archive {
        println!("  Archive: enabled (ZIP)");
    }
    println!();
    println!("✅ Dry run analysis complete. Nothing was downloaded or written.");
    Ok(())
}
