use crate::config::{CloudConfig, DownloadConfig, ExtractConfig, OutputConfig};
use crate::domain::model::{AnalysisResult, ExtractedDocument, PdfSource, PipelineOutput};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn source(&self) -> Result<PdfSource>;
    fn download(&self) -> &DownloadConfig;
    fn extract(&self) -> &ExtractConfig;
    fn cloud(&self) -> &CloudConfig;
    fn output(&self) -> &OutputConfig;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<ExtractedDocument>;
    async fn transform(&self, document: ExtractedDocument) -> Result<AnalysisResult>;
    async fn load(&self, result: AnalysisResult) -> Result<PipelineOutput>;
}
