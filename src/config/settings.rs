use crate::config::toml_config::TomlConfig;
use crate::core::catalog::DEFAULT_REQUEST_TIMEOUT;
use crate::core::ConfigProvider;
use crate::domain::model::Dataset;
use crate::domain::ports::{CachePolicy, ReportOptions};
use crate::utils::error::{BackfillError, Result};
use std::time::Duration;
use url::Url;

pub const DEFAULT_CATALOG_URL: &str = "https://operations-api.access-ci.org";
pub const DEFAULT_GROUPS_PATH: &str = "wh2/cider/v1/access-active-groups/";
pub const DEFAULT_MODULES_PATH: &str = "wh2/glue2/v1/software_fast/";
pub const MAX_REQUEST_TIMEOUT_SECONDS: u64 = 86_400;

/// Fully resolved run configuration: defaults, then config file, then flags.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub catalog_url: String,
    pub groups_path: String,
    pub modules_path: String,
    pub cache_dir: String,
    pub cache: CachePolicy,
    pub request_timeout_seconds: u64,
    pub report: ReportOptions,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            catalog_url: DEFAULT_CATALOG_URL.to_string(),
            groups_path: DEFAULT_GROUPS_PATH.to_string(),
            modules_path: DEFAULT_MODULES_PATH.to_string(),
            cache_dir: ".".to_string(),
            cache: CachePolicy::default(),
            request_timeout_seconds: DEFAULT_REQUEST_TIMEOUT.as_secs(),
            report: ReportOptions::default(),
        }
    }
}

impl Settings {
    /// Overlays every value present in the config file.
    pub fn apply_file(&mut self, file: &TomlConfig) {
        if let Some(url) = &file.source.catalog_url {
            self.catalog_url = url.clone();
        }
        if let Some(path) = &file.source.groups_path {
            self.groups_path = path.clone();
        }
        if let Some(path) = &file.source.modules_path {
            self.modules_path = path.clone();
        }
        if let Some(timeout) = file.source.timeout_seconds {
            self.request_timeout_seconds = timeout;
        }
        if let Some(dir) = &file.cache.dir {
            self.cache_dir = dir.clone();
        }
        if let Some(days) = file.cache.max_age_days {
            self.cache.max_age_days = days;
        }
        if let Some(pretty) = file.output.pretty {
            self.report.pretty = pretty;
        }
        if let Some(format) = file.output.format {
            self.report.format = format;
        }
    }

    fn dataset_path(&self, dataset: Dataset) -> &str {
        match dataset {
            Dataset::ResourceGroups => &self.groups_path,
            Dataset::SoftwareModules => &self.modules_path,
        }
    }

    /// Rejects settings a run cannot work with: a non-HTTP catalog URL,
    /// blank endpoint paths, an unusable cache directory or a request
    /// timeout outside 1 second to 1 day.
    pub fn validate(&self) -> Result<()> {
        self.check_catalog_url()?;
        check_endpoint_path("groups_path", &self.groups_path)?;
        check_endpoint_path("modules_path", &self.modules_path)?;
        self.check_cache_dir()?;
        self.check_request_timeout()
    }

    fn check_catalog_url(&self) -> Result<()> {
        let url = Url::parse(&self.catalog_url)
            .map_err(|e| invalid("catalog_url", &self.catalog_url, format!("not a URL: {}", e)))?;
        match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(invalid(
                "catalog_url",
                &self.catalog_url,
                format!("catalog API must be served over http or https, not {}", scheme),
            )),
        }
    }

    fn check_cache_dir(&self) -> Result<()> {
        if self.cache_dir.trim().is_empty() {
            return Err(invalid("cache_dir", &self.cache_dir, "cache directory cannot be empty"));
        }
        if self.cache_dir.contains('\0') {
            return Err(invalid("cache_dir", &self.cache_dir, "cache directory contains a NUL byte"));
        }
        Ok(())
    }

    fn check_request_timeout(&self) -> Result<()> {
        if (1..=MAX_REQUEST_TIMEOUT_SECONDS).contains(&self.request_timeout_seconds) {
            return Ok(());
        }
        Err(invalid(
            "request_timeout",
            &self.request_timeout_seconds.to_string(),
            format!("must be between 1 and {} seconds", MAX_REQUEST_TIMEOUT_SECONDS),
        ))
    }
}

fn check_endpoint_path(field: &str, path: &str) -> Result<()> {
    if path.trim().is_empty() {
        return Err(invalid(field, path, "endpoint path cannot be blank"));
    }
    Ok(())
}

fn invalid(field: &str, value: &str, reason: impl Into<String>) -> BackfillError {
    BackfillError::InvalidConfigValueError {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

impl ConfigProvider for Settings {
    fn endpoint(&self, dataset: Dataset) -> Result<String> {
        let base = Url::parse(&self.catalog_url)?;
        Ok(base.join(self.dataset_path(dataset))?.to_string())
    }

    fn cache_dir(&self) -> &str {
        &self.cache_dir
    }

    fn cache_policy(&self) -> CachePolicy {
        self.cache
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }

    fn report_options(&self) -> ReportOptions {
        self.report
    }
}
