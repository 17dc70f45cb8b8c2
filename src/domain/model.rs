use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub type ResourceId = String;
pub type GroupId = String;

pub const RESOURCE_ID_FIELD: &str = "ResourceID";
pub const APP_NAME_FIELD: &str = "AppName";
pub const APP_VERSION_FIELD: &str = "AppVersion";
pub const ID_FIELD: &str = "ID";

/// One software module reported for a resource provider.
///
/// The catalog record is kept as received, field order and nulls included.
/// Only `ResourceID`, `AppName` and `AppVersion` are inspected; `ResourceID`
/// must be a string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    try_from = "serde_json::Map<String, serde_json::Value>",
    into = "serde_json::Map<String, serde_json::Value>"
)]
pub struct ModuleRecord {
    fields: serde_json::Map<String, serde_json::Value>,
}

impl TryFrom<serde_json::Map<String, serde_json::Value>> for ModuleRecord {
    type Error = String;

    fn try_from(fields: serde_json::Map<String, serde_json::Value>) -> Result<Self, Self::Error> {
        match fields.get(RESOURCE_ID_FIELD) {
            Some(serde_json::Value::String(_)) => Ok(Self { fields }),
            Some(other) => Err(format!("{} must be a string, got {}", RESOURCE_ID_FIELD, other)),
            None => Err(format!("missing field `{}`", RESOURCE_ID_FIELD)),
        }
    }
}

impl From<ModuleRecord> for serde_json::Map<String, serde_json::Value> {
    fn from(record: ModuleRecord) -> Self {
        record.fields
    }
}

impl ModuleRecord {
    pub fn new(resource_id: &str, app_name: &str, app_version: &str) -> Self {
        let mut fields = serde_json::Map::new();
        fields.insert(RESOURCE_ID_FIELD.to_string(), resource_id.into());
        fields.insert(APP_NAME_FIELD.to_string(), app_name.into());
        fields.insert(APP_VERSION_FIELD.to_string(), app_version.into());
        Self { fields }
    }

    pub fn with_field(mut self, name: &str, value: serde_json::Value) -> Self {
        self.fields.insert(name.to_string(), value);
        self
    }

    pub fn resource_id(&self) -> &str {
        self.fields
            .get(RESOURCE_ID_FIELD)
            .and_then(serde_json::Value::as_str)
            .unwrap_or_default()
    }

    pub fn app_name(&self) -> Option<&serde_json::Value> {
        self.fields.get(APP_NAME_FIELD)
    }

    pub fn app_version(&self) -> Option<&serde_json::Value> {
        self.fields.get(APP_VERSION_FIELD)
    }

    pub fn id(&self) -> Option<&serde_json::Value> {
        self.fields.get(ID_FIELD)
    }

    pub fn fields(&self) -> &serde_json::Map<String, serde_json::Value> {
        &self.fields
    }

    /// `AppName:AppVersion` with every whitespace character removed.
    ///
    /// Numbers and booleans are written as JSON text, null or missing as
    /// empty. `None` when either field is an array or object.
    pub fn name_version_key(&self) -> Option<String> {
        let name = scalar_text(self.app_name())?;
        let version = scalar_text(self.app_version())?;
        Some(
            format!("{}:{}", name, version)
                .split_whitespace()
                .collect(),
        )
    }
}

/// Text of a scalar field as it would appear in a report cell.
pub fn scalar_text(value: Option<&serde_json::Value>) -> Option<String> {
    match value {
        None | Some(serde_json::Value::Null) => Some(String::new()),
        Some(serde_json::Value::String(s)) => Some(s.clone()),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        Some(serde_json::Value::Bool(b)) => Some(b.to_string()),
        Some(_) => None,
    }
}

/// Group membership in the order the catalog listed the groups.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResourceGroups {
    entries: Vec<(GroupId, Vec<ResourceId>)>,
}

impl ResourceGroups {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the members of an existing group in place, otherwise appends.
    pub fn insert(&mut self, group: GroupId, members: Vec<ResourceId>) {
        match self.entries.iter_mut().find(|(name, _)| *name == group) {
            Some((_, existing)) => *existing = members,
            None => self.entries.push((group, members)),
        }
    }

    pub fn get(&self, group: &str) -> Option<&[ResourceId]> {
        self.entries
            .iter()
            .find(|(name, _)| name == group)
            .map(|(_, members)| members.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&GroupId, &[ResourceId])> {
        self.entries
            .iter()
            .map(|(group, members)| (group, members.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<G: Into<GroupId>, R: Into<ResourceId>> FromIterator<(G, Vec<R>)> for ResourceGroups {
    fn from_iter<I: IntoIterator<Item = (G, Vec<R>)>>(iter: I) -> Self {
        let mut groups = ResourceGroups::new();
        for (group, members) in iter {
            groups.insert(group.into(), members.into_iter().map(Into::into).collect());
        }
        groups
    }
}

/// Module lists keyed by resource or group identifier.
///
/// Lookups never create entries. [`ModulesByKey::get_or_insert_default`] is
/// the only way a key appears without an explicit insert.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModulesByKey {
    entries: BTreeMap<String, Vec<ModuleRecord>>,
}

impl ModulesByKey {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&[ModuleRecord]> {
        self.entries.get(key).map(Vec::as_slice)
    }

    /// Number of modules under `key`, 0 when the key is absent.
    pub fn count(&self, key: &str) -> usize {
        self.entries.get(key).map_or(0, Vec::len)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn get_or_insert_default(&mut self, key: &str) -> &mut Vec<ModuleRecord> {
        self.entries.entry(key.to_string()).or_default()
    }

    pub fn insert(&mut self, key: String, modules: Vec<ModuleRecord>) -> Option<Vec<ModuleRecord>> {
        self.entries.insert(key, modules)
    }

    pub fn push(&mut self, key: &str, module: ModuleRecord) {
        self.get_or_insert_default(key).push(module);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<ModuleRecord>)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The two catalog datasets a run needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dataset {
    ResourceGroups,
    SoftwareModules,
}

impl Dataset {
    /// Name of the cache entry, also the stem of its cache file.
    pub fn cache_key(&self) -> &'static str {
        match self {
            Dataset::ResourceGroups => "rp_groups",
            Dataset::SoftwareModules => "sw_fast",
        }
    }
}

/// A GET against the catalog API, cached under `key`.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogRequest {
    pub key: String,
    pub url: String,
    pub params: Vec<(String, String)>,
}

impl CatalogRequest {
    pub fn json(key: &str, url: &str) -> Self {
        Self {
            key: key.to_string(),
            url: url.to_string(),
            params: vec![("format".to_string(), "json".to_string())],
        }
    }
}

/// Raw payloads for one run, straight from the catalog or its cache.
#[derive(Debug, Clone)]
pub struct RawCatalog {
    pub groups: serde_json::Value,
    pub software: serde_json::Value,
}

/// Where a backfilled module list was copied from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackfillSource {
    Group(GroupId),
    Peer(ResourceId),
}

impl BackfillSource {
    pub fn key(&self) -> &str {
        match self {
            BackfillSource::Group(key) | BackfillSource::Peer(key) => key,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Backfill {
    pub resource: ResourceId,
    pub source: BackfillSource,
}

/// Per resource, the normalized name:version keys that occur more than once.
pub type DuplicateReport = BTreeMap<ResourceId, BTreeMap<String, Vec<ModuleRecord>>>;

#[derive(Debug, Clone)]
pub struct ReconcileResult {
    pub modules: ModulesByKey,
    pub backfills: Vec<Backfill>,
    pub duplicates: Option<DuplicateReport>,
}
