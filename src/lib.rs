pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::storage::LocalStorage;
pub use config::Settings;
pub use crate::core::{
    catalog::CachedCatalog, engine::BackfillEngine, pipeline::BackfillPipeline,
    reconcile::populate_empty_resources,
};
pub use domain::model::{ModuleRecord, ModulesByKey, ResourceGroups};
pub use utils::error::{BackfillError, Result};
