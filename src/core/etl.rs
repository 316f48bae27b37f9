use crate::core::Pipeline;
use crate::domain::model::AnalysisReport;
use crate::utils::error::Result;
use std::time::Instant;

#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub report: AnalysisReport,
    pub output_path: String,
}

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    /// Extract and transform only; nothing is written.
    pub async fn analyze(&self) -> Result<AnalysisReport> {
        let started = Instant::now();

        tracing::info!("Extracting decks...");
        let extracted = self.pipeline.extract().await?;
        tracing::info!(
            "Extracted {} of {} selected decks",
            extracted.decks.len(),
            extracted.selected_hashes.len()
        );

        tracing::info!("Counting and classifying cards...");
        let report = self.pipeline.transform(extracted).await?;
        tracing::info!(
            "Analyzed {} distinct cards in {:?}",
            report.cards.len(),
            started.elapsed()
        );

        Ok(report)
    }

    pub async fn run(&self) -> Result<RunOutcome> {
        let report = self.analyze().await?;

        tracing::info!("Writing reports...");
        let output_path = self.pipeline.load(&report).await?;
        tracing::info!("Output saved to: {}", output_path);

        Ok(RunOutcome {
            report,
            output_path,
        })
    }
}
