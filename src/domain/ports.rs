use crate::domain::model::{CatalogRequest, Dataset, RawCatalog, ReconcileResult};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::{Duration, SystemTime};

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
    /// Last modification time, `None` when the file does not exist.
    fn modified(
        &self,
        path: &str,
    ) -> impl std::future::Future<Output = Result<Option<SystemTime>>> + Send;
}

/// Fetch-with-cache access to the remote catalog.
pub trait CatalogSource: Send + Sync {
    fn fetch(
        &self,
        request: &CatalogRequest,
    ) -> impl std::future::Future<Output = Result<serde_json::Value>> + Send;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachePolicy {
    pub max_age_days: u32,
    pub force_refresh: bool,
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self {
            max_age_days: 1,
            force_refresh: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Json,
    Counts,
    Csv,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReportOptions {
    pub format: ReportFormat,
    pub pretty: bool,
    pub duplicates: bool,
}

pub trait ConfigProvider: Send + Sync {
    fn endpoint(&self, dataset: Dataset) -> Result<String>;
    fn cache_dir(&self) -> &str;
    fn cache_policy(&self) -> CachePolicy;
    fn request_timeout(&self) -> Duration;
    fn report_options(&self) -> ReportOptions;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<RawCatalog>;
    async fn transform(&self, data: RawCatalog) -> Result<ReconcileResult>;
    async fn load(&self, result: ReconcileResult) -> Result<String>;
}
