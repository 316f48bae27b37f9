pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
#[cfg(feature = "server")]
pub mod server;
pub mod utils;

pub use adapters::storage::LocalStorage;
#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::AnalyzerConfig;

pub use core::{context::AnalyzerContext, etl::EtlEngine, pipeline::DeckPipeline};
pub use domain::model::{AnalysisReport, RunRequest};
pub use utils::error::{AnalyzerError, Result};
