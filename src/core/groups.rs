use crate::domain::model::{GroupId, ResourceGroups, ResourceId};
use crate::utils::error::{BackfillError, Result};
use serde::Deserialize;
use std::collections::HashSet;

const COMPUTE_TYPE: &str = "Compute";

#[derive(Debug, Deserialize)]
struct GroupsDocument {
    results: GroupsResults,
}

#[derive(Debug, Default, Deserialize)]
struct GroupsResults {
    #[serde(default)]
    resources: Vec<ResourceDescriptor>,
    #[serde(default)]
    active_groups: Vec<GroupDescriptor>,
}

#[derive(Debug, Deserialize)]
struct ResourceDescriptor {
    #[serde(default)]
    cider_type: Option<String>,
    info_resourceid: ResourceId,
}

#[derive(Debug, Deserialize)]
struct GroupDescriptor {
    info_groupid: GroupId,
    #[serde(default)]
    rollup_info_resourceids: Vec<ResourceId>,
}

/// Builds group membership from the groups catalog, keeping only Compute resources.
///
/// Groups left without any Compute member are dropped.
pub fn extract_resource_groups(document: &serde_json::Value) -> Result<ResourceGroups> {
    let document = GroupsDocument::deserialize(document).map_err(|e| {
        BackfillError::ProcessingError {
            message: format!("unexpected groups catalog layout: {}", e),
        }
    })?;

    let compute: HashSet<&str> = document
        .results
        .resources
        .iter()
        .filter(|rp| rp.cider_type.as_deref() == Some(COMPUTE_TYPE))
        .map(|rp| rp.info_resourceid.as_str())
        .collect();
    tracing::debug!("{} compute resources in catalog", compute.len());

    let mut groups = ResourceGroups::new();
    for group in &document.results.active_groups {
        let members: Vec<ResourceId> = group
            .rollup_info_resourceids
            .iter()
            .filter(|id| compute.contains(id.as_str()))
            .cloned()
            .collect();
        if members.is_empty() {
            tracing::debug!("skipping group '{}' without compute resources", group.info_groupid);
            continue;
        }
        groups.insert(group.info_groupid.clone(), members);
    }

    Ok(groups)
}
