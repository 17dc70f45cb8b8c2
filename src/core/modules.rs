use crate::domain::model::{ModuleRecord, ModulesByKey};
use crate::utils::error::{BackfillError, Result};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct SoftwareDocument {
    #[serde(default)]
    results: Vec<ModuleRecord>,
}

/// Parses the flat module listing of the software catalog.
pub fn parse_module_records(document: &serde_json::Value) -> Result<Vec<ModuleRecord>> {
    SoftwareDocument::deserialize(document)
        .map(|doc| doc.results)
        .map_err(|e| BackfillError::ProcessingError {
            message: format!("unexpected software catalog layout: {}", e),
        })
}

/// Groups records by `ResourceID`, keeping their relative order.
pub fn index_modules(records: &[ModuleRecord]) -> ModulesByKey {
    let mut modules = ModulesByKey::new();
    for record in records {
        modules.push(record.resource_id(), record.clone());
    }
    tracing::debug!(
        "indexed {} modules under {} keys",
        records.len(),
        modules.len()
    );
    modules
}
