use crate::domain::model::{scalar_text, ModulesByKey};
use crate::domain::ports::{ReportFormat, ReportOptions};
use crate::utils::error::{BackfillError, Result};
use serde::Serialize;

/// Renders the module mapping in the requested format. Output is ordered by key.
pub fn render_modules(modules: &ModulesByKey, options: &ReportOptions) -> Result<String> {
    match options.format {
        ReportFormat::Json => render_json(modules, options.pretty),
        ReportFormat::Counts => Ok(render_counts(modules)),
        ReportFormat::Csv => render_csv(modules),
    }
}

/// Compact JSON, or indented by two spaces when `pretty` is set.
pub fn render_json<T: Serialize + ?Sized>(value: &T, pretty: bool) -> Result<String> {
    let rendered = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(rendered)
}

/// One `\t<key> : <count>` line per key.
pub fn render_counts(modules: &ModulesByKey) -> String {
    modules
        .iter()
        .map(|(key, list)| format!("\t{} : {}\n", key, list.len()))
        .collect()
}

pub fn render_csv(modules: &ModulesByKey) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["key", "ResourceID", "ID", "AppName", "AppVersion"])?;

    for (key, list) in modules.iter() {
        for module in list {
            let id = cell_text(module.id());
            let name = cell_text(module.app_name());
            let version = cell_text(module.app_version());
            writer.write_record([
                key.as_str(),
                module.resource_id(),
                id.as_str(),
                name.as_str(),
                version.as_str(),
            ])?;
        }
    }

    let bytes = writer.into_inner().map_err(|e| BackfillError::ProcessingError {
        message: format!("failed to flush CSV output: {}", e),
    })?;
    String::from_utf8(bytes).map_err(|e| BackfillError::ProcessingError {
        message: format!("CSV output is not UTF-8: {}", e),
    })
}

/// Scalars as text, structured values as their JSON.
fn cell_text(value: Option<&serde_json::Value>) -> String {
    scalar_text(value).unwrap_or_else(|| value.map(|v| v.to_string()).unwrap_or_default())
}
