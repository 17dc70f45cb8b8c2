use crate::domain::model::{DuplicateReport, ModuleRecord};
use std::collections::HashMap;

/// Finds modules reported more than once for the same resource under the same
/// name and version.
///
/// Keys are `AppName:AppVersion` with whitespace removed. Records whose key is
/// shorter than two characters carry no usable name or version and are
/// skipped, as are records whose name or version is not a scalar. Each reported key lists every record sharing it, the first one
/// included.
pub fn find_duplicates(records: &[ModuleRecord]) -> DuplicateReport {
    let mut first_seen: HashMap<&str, HashMap<String, &ModuleRecord>> = HashMap::new();
    let mut duplicates = DuplicateReport::new();

    for record in records {
        let Some(key) = record.name_version_key() else {
            tracing::warn!("malformed name+ver for {:?}", record);
            continue;
        };
        if key.chars().count() < 2 {
            tracing::warn!("empty name+ver for {:?}", record);
            continue;
        }

        let resource = record.resource_id();
        let seen = first_seen.entry(resource).or_default();
        match seen.get(&key) {
            Some(first) => {
                tracing::warn!("duplicate entry: '{}' in '{}'", key, resource);
                duplicates
                    .entry(resource.to_string())
                    .or_default()
                    .entry(key)
                    .or_insert_with(|| vec![(*first).clone()])
                    .push(record.clone());
            }
            None => {
                seen.insert(key, record);
            }
        }
    }

    duplicates
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reports_only_repeated_keys_with_first_record() {
        let rec1 = ModuleRecord::new("A", "x", "1");
        let rec2 = ModuleRecord::new("A", "x", "1");
        let rec3 = ModuleRecord::new("A", "y", "2");

        let report = find_duplicates(&[rec1.clone(), rec2.clone(), rec3]);

        assert_eq!(report.len(), 1);
        let a = report.get("A").unwrap();
        assert_eq!(a.len(), 1);
        assert_eq!(a.get("x:1").unwrap(), &vec![rec1, rec2]);
        assert!(a.get("y:2").is_none());
    }

    #[test]
    fn test_empty_name_and_version_is_skipped() {
        let blank = ModuleRecord::new("A", "", "");
        let report = find_duplicates(&[blank.clone(), blank]);
        assert!(report.is_empty());
    }

    #[test]
    fn test_whitespace_variants_collide() {
        let tagged =
            ModuleRecord::new("A", "open mpi", " 4.1.5 ").with_field("ID", serde_json::json!("second"));
        let records = vec![ModuleRecord::new("A", "openmpi", "4.1.5"), tagged];

        let report = find_duplicates(&records);

        let entries = report.get("A").unwrap().get("openmpi:4.1.5").unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].id(), Some(&serde_json::json!("second")));
    }

    #[test]
    fn test_numeric_versions_collide_with_their_text_form() {
        let numeric: ModuleRecord = serde_json::from_value(
            serde_json::json!({"ID": 1, "ResourceID": "A", "AppName": "x", "AppVersion": 3.1}),
        )
        .unwrap();
        let records = vec![ModuleRecord::new("A", "x", "3.1"), numeric];

        let report = find_duplicates(&records);

        assert_eq!(report["A"]["x:3.1"].len(), 2);
    }

    #[test]
    fn test_structured_name_is_skipped() {
        let odd = ModuleRecord::new("A", "x", "1").with_field("AppName", serde_json::json!({"n": "x"}));
        let report = find_duplicates(&[odd.clone(), odd]);
        assert!(report.is_empty());
    }

    #[test]
    fn test_same_key_on_different_resources_is_not_a_duplicate() {
        let records = vec![
            ModuleRecord::new("A", "gcc", "12"),
            ModuleRecord::new("B", "gcc", "12"),
        ];
        assert!(find_duplicates(&records).is_empty());
    }

    #[test]
    fn test_every_repeat_is_collected() {
        let records = vec![
            ModuleRecord::new("A", "gcc", "12"),
            ModuleRecord::new("A", "gcc", "12"),
            ModuleRecord::new("A", "gcc", "12"),
        ];
        let report = find_duplicates(&records);
        assert_eq!(report["A"]["gcc:12"].len(), 3);
    }
}
