use crate::domain::model::{AnalysisReport, ExtractedDecks};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
    /// Make sure `path` exists as an empty directory.
    fn reset_dir(&self, path: &str) -> impl std::future::Future<Output = Result<()>> + Send;
    /// Human readable location of `path`, for logs and reports.
    fn location(&self, path: &str) -> String;
}

pub trait ConfigProvider: Send + Sync {
    fn edhrec_base_url(&self) -> &str;
    fn edhrec_json_base_url(&self) -> &str;
    fn scryfall_base_url(&self) -> &str;
    fn edhrec_min_delay(&self) -> Duration;
    fn scryfall_min_delay(&self) -> Duration;
    fn concurrent_requests(&self) -> usize;
    fn request_timeout(&self) -> Duration;
    fn user_agent(&self) -> &str;
    fn cache_dir(&self) -> &str;
    fn output_path(&self) -> &str;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<ExtractedDecks>;
    async fn transform(&self, data: ExtractedDecks) -> Result<AnalysisReport>;
    async fn load(&self, result: &AnalysisReport) -> Result<String>;
}
