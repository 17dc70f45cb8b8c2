use crate::domain::model::CatalogRequest;
use crate::domain::ports::{CachePolicy, CatalogSource, Storage};
use crate::utils::error::{BackfillError, Result};
use chrono::{DateTime, Utc};
use reqwest::Client;
use std::time::Duration;

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(600);

/// Cache file for a catalog key, `<key>.json`.
pub fn cache_file_name(key: &str) -> Result<String> {
    if key.trim().is_empty() {
        return Err(BackfillError::MissingConfigError {
            field: "cache key".to_string(),
        });
    }
    Ok(format!("{}.json", key))
}

/// Catalog API client that keeps the last response of every dataset on disk.
///
/// A cached response is served while it is younger than
/// `policy.max_age_days`; otherwise, or when `policy.force_refresh` is set,
/// the API is queried and the cache file overwritten.
pub struct CachedCatalog<S: Storage> {
    storage: S,
    client: Client,
    policy: CachePolicy,
    timeout: Duration,
}

impl<S: Storage> CachedCatalog<S> {
    pub fn new(storage: S, policy: CachePolicy) -> Self {
        Self {
            storage,
            client: Client::new(),
            policy,
            timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    async fn is_fresh(&self, file_name: &str) -> Result<bool> {
        let Some(modified) = self.storage.modified(file_name).await? else {
            return Ok(false);
        };
        tracing::debug!("cache file '{}' found", file_name);

        let age = Utc::now() - DateTime::<Utc>::from(modified);
        let max_age = chrono::Duration::days(i64::from(self.policy.max_age_days));
        Ok(age < max_age)
    }

    /// Raw response body of a successful GET.
    async fn download(&self, request: &CatalogRequest) -> Result<Vec<u8>> {
        tracing::debug!("fetching cache update from '{}'", request.url);
        let response = self
            .client
            .get(&request.url)
            .query(&request.params)
            .timeout(self.timeout)
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("API response status: {}", status);
        if !status.is_success() {
            return Err(BackfillError::HttpStatusError {
                status: status.as_u16(),
                url: request.url.clone(),
            });
        }

        Ok(response.bytes().await?.to_vec())
    }
}

impl<S: Storage> CatalogSource for CachedCatalog<S> {
    async fn fetch(&self, request: &CatalogRequest) -> Result<serde_json::Value> {
        tracing::info!("get {} resources", request.key);
        let file_name = cache_file_name(&request.key)?;

        if !self.policy.force_refresh && self.is_fresh(&file_name).await? {
            tracing::debug!("loading cached data for resource '{}'", request.key);
            let bytes = self.storage.read_file(&file_name).await?;
            return Ok(serde_json::from_slice(&bytes)?);
        }

        let body = self.download(request).await?;
        let data = serde_json::from_slice(&body)?;
        self.storage.write_file(&file_name, &body).await?;
        tracing::debug!("cache update successful");
        Ok(data)
    }
}
