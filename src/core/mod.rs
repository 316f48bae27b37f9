pub mod analysis;
pub mod context;
pub mod etl;
pub mod pipeline;
pub mod report;

pub use crate::domain::model::{AnalysisReport, ExtractedDecks, RunRequest};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
