pub mod colormap;
pub mod engine;
pub mod extract;
pub mod frequency;
pub mod layout;
pub mod pipeline;
pub mod render;
pub mod report;

#[cfg(test)]
pub(crate) mod testing;

pub use crate::domain::model::{AnalysisResult, ExtractedDocument, PipelineOutput};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
