use crate::core::duplicates::find_duplicates;
use crate::core::groups::extract_resource_groups;
use crate::core::modules::{index_modules, parse_module_records};
use crate::core::reconcile::populate_empty_resources;
use crate::core::report::{render_json, render_modules};
use crate::core::{CatalogSource, ConfigProvider, Pipeline};
use crate::domain::model::{CatalogRequest, Dataset, RawCatalog, ReconcileResult};
use crate::utils::error::Result;

/// Fetches both catalogs, backfills empty resources and renders the result.
pub struct BackfillPipeline<S: CatalogSource, C: ConfigProvider> {
    catalog: S,
    config: C,
}

impl<S: CatalogSource, C: ConfigProvider> BackfillPipeline<S, C> {
    pub fn new(catalog: S, config: C) -> Self {
        Self { catalog, config }
    }

    async fn fetch(&self, dataset: Dataset) -> Result<serde_json::Value> {
        let url = self.config.endpoint(dataset)?;
        let request = CatalogRequest::json(dataset.cache_key(), &url);
        self.catalog.fetch(&request).await
    }
}

#[async_trait::async_trait]
impl<S: CatalogSource, C: ConfigProvider> Pipeline for BackfillPipeline<S, C> {
    async fn extract(&self) -> Result<RawCatalog> {
        let groups = self.fetch(Dataset::ResourceGroups).await?;
        let software = self.fetch(Dataset::SoftwareModules).await?;
        Ok(RawCatalog { groups, software })
    }

    async fn transform(&self, data: RawCatalog) -> Result<ReconcileResult> {
        let groups = extract_resource_groups(&data.groups)?;
        tracing::debug!("{} groups with compute resources", groups.len());

        let records = parse_module_records(&data.software)?;
        let mut modules = index_modules(&records);

        let backfills = populate_empty_resources(&groups, &mut modules);
        tracing::info!("backfilled {} resources", backfills.len());

        let duplicates = if self.config.report_options().duplicates {
            let report = find_duplicates(&records);
            tracing::info!("{} resources with duplicate modules", report.len());
            Some(report)
        } else {
            None
        };

        Ok(ReconcileResult {
            modules,
            backfills,
            duplicates,
        })
    }

    async fn load(&self, result: ReconcileResult) -> Result<String> {
        let options = self.config.report_options();
        match &result.duplicates {
            Some(duplicates) => render_json(duplicates, options.pretty),
            None => render_modules(&result.modules, &options),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{CachePolicy, ReportOptions};
    use crate::utils::error::BackfillError;
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::time::Duration;

    struct MockCatalog {
        responses: HashMap<String, serde_json::Value>,
        requests: Mutex<Vec<CatalogRequest>>,
    }

    impl MockCatalog {
        fn new(groups: serde_json::Value, software: serde_json::Value) -> Self {
            let mut responses = HashMap::new();
            responses.insert("rp_groups".to_string(), groups);
            responses.insert("sw_fast".to_string(), software);
            Self {
                responses,
                requests: Mutex::new(Vec::new()),
            }
        }
    }

    impl CatalogSource for MockCatalog {
        async fn fetch(&self, request: &CatalogRequest) -> Result<serde_json::Value> {
            self.requests.lock().unwrap().push(request.clone());
            self.responses
                .get(&request.key)
                .cloned()
                .ok_or_else(|| BackfillError::HttpStatusError {
                    status: 404,
                    url: request.url.clone(),
                })
        }
    }

    struct MockConfig {
        report: ReportOptions,
    }

    impl MockConfig {
        fn new() -> Self {
            Self {
                report: ReportOptions::default(),
            }
        }
    }

    impl ConfigProvider for MockConfig {
        fn endpoint(&self, dataset: Dataset) -> Result<String> {
            Ok(format!("http://catalog.test/{}/", dataset.cache_key()))
        }

        fn cache_dir(&self) -> &str {
            "."
        }

        fn cache_policy(&self) -> CachePolicy {
            CachePolicy::default()
        }

        fn request_timeout(&self) -> Duration {
            Duration::from_secs(5)
        }

        fn report_options(&self) -> ReportOptions {
            self.report
        }
    }

    fn groups_doc() -> serde_json::Value {
        json!({
            "results": {
                "resources": [
                    {"cider_type": "Compute", "info_resourceid": "R1"},
                    {"cider_type": "Compute", "info_resourceid": "R2"}
                ],
                "active_groups": [
                    {"info_groupid": "G1", "rollup_info_resourceids": ["R1", "R2"]}
                ]
            }
        })
    }

    fn software_doc() -> serde_json::Value {
        json!({
            "results": [
                {"ID": "m1", "ResourceID": "R1", "AppName": "gcc", "AppVersion": "12"},
                {"ID": "m2", "ResourceID": "R1", "AppName": "gcc", "AppVersion": "12"}
            ]
        })
    }

    #[tokio::test]
    async fn test_extract_requests_both_datasets_as_json() {
        let pipeline = BackfillPipeline::new(
            MockCatalog::new(groups_doc(), software_doc()),
            MockConfig::new(),
        );

        let raw = pipeline.extract().await.unwrap();

        assert_eq!(raw.groups, groups_doc());
        let requests = pipeline.catalog.requests.lock().unwrap();
        let keys: Vec<&str> = requests.iter().map(|r| r.key.as_str()).collect();
        assert_eq!(keys, vec!["rp_groups", "sw_fast"]);
        assert_eq!(requests[0].url, "http://catalog.test/rp_groups/");
        assert_eq!(
            requests[1].params,
            vec![("format".to_string(), "json".to_string())]
        );
    }

    #[tokio::test]
    async fn test_transform_backfills_from_peer() {
        let pipeline = BackfillPipeline::new(
            MockCatalog::new(groups_doc(), software_doc()),
            MockConfig::new(),
        );

        let raw = pipeline.extract().await.unwrap();
        let result = pipeline.transform(raw).await.unwrap();

        assert_eq!(result.modules.count("R2"), 2);
        assert_eq!(result.backfills.len(), 1);
        assert!(result.duplicates.is_none());
    }

    #[tokio::test]
    async fn test_load_renders_duplicates_when_requested() {
        let mut config = MockConfig::new();
        config.report.duplicates = true;
        let pipeline =
            BackfillPipeline::new(MockCatalog::new(groups_doc(), software_doc()), config);

        let raw = pipeline.extract().await.unwrap();
        let result = pipeline.transform(raw).await.unwrap();
        let output = pipeline.load(result).await.unwrap();

        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["R1"]["gcc:12"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_fetch_error_stops_extract() {
        let pipeline = BackfillPipeline::new(
            MockCatalog {
                responses: HashMap::new(),
                requests: Mutex::new(Vec::new()),
            },
            MockConfig::new(),
        );

        let err = pipeline.extract().await.unwrap_err();
        assert!(matches!(err, BackfillError::HttpStatusError { status: 404, .. }));
        assert_eq!(pipeline.catalog.requests.lock().unwrap().len(), 1);
    }
}
