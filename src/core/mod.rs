pub mod catalog;
pub mod duplicates;
pub mod engine;
pub mod groups;
pub mod modules;
pub mod pipeline;
pub mod reconcile;
pub mod report;

pub use crate::domain::model::{ModuleRecord, ModulesByKey, ResourceGroups};
pub use crate::domain::ports::{CatalogSource, ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
