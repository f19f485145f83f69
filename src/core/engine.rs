use crate::core::Pipeline;
use crate::domain::model::PipelineOutput;
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

pub struct PipelineEngine<P: Pipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: Pipeline> PipelineEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    pub async fn run(&self) -> Result<PipelineOutput> {
        tracing::info!("🚀 Starting PDF text extraction and wordcloud pipeline...");
        if self.monitor.is_enabled() {
            tracing::info!("🔍 System monitoring enabled");
        }
        self.monitor.log_stats("Start");

        // Extract
        let document = self.pipeline.extract().await?;
        tracing::info!(
            "✅ Extracted {} pages from {}",
            document.pages.len(),
            document.source
        );
        self.monitor.log_stats("Extract");

        // Transform
        let result = self.pipeline.transform(document).await?;
        tracing::info!(
            "✅ Counted {} distinct words, placed {} in the cloud",
            result.frequencies.len(),
            result.cloud.words.len()
        );
        self.monitor.log_stats("Transform");

        // Load
        let output = self.pipeline.load(result).await?;
        tracing::info!("📁 Report saved to: {}", output.report);
        self.monitor.log_stats("Load");
        self.monitor.log_final_stats();

        tracing::info!("🎉 Pipeline complete: {}", output.summary);
        Ok(output)
    }
}
