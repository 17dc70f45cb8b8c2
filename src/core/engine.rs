use crate::core::Pipeline;
use crate::utils::error::Result;

pub struct BackfillEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> BackfillEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    /// Runs extract, transform and load in order and returns the rendered report.
    pub async fn run(&self) -> Result<String> {
        tracing::info!("Fetching catalog data...");
        let raw_data = self.pipeline.extract().await?;

        tracing::info!("Reconciling module lists...");
        let result = self.pipeline.transform(raw_data).await?;
        tracing::info!(
            "{} keys after reconciliation, {} backfilled",
            result.modules.len(),
            result.backfills.len()
        );

        self.pipeline.load(result).await
    }
}
