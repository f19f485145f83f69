pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{LocalStorage, PdfDownloader};
pub use config::AppConfig;
pub use core::{engine::PipelineEngine, pipeline::WordcloudPipeline};
pub use domain::model::{PdfSource, PipelineOutput};
pub use utils::error::{PipelineError, Result};
