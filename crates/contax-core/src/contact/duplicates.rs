//! Cross-document duplicate reporting.

use std::collections::HashMap;

use tracing::debug;

use crate::models::config::DuplicateConfig;
use crate::models::record::{CleanRecord, DuplicateRecord, Field};

/// Flag every record whose key value is shared with another record.
///
/// Groups are returned in order of first appearance and members in input
/// order. Inputs are left untouched; each flagged record is a new value.
/// An empty key is a key like any other unless `skip_empty` is set.
pub fn find_duplicates(records: &[CleanRecord], key: Field, skip_empty: bool) -> Vec<DuplicateRecord> {
    let mut groups: Vec<(&str, Vec<&CleanRecord>)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for record in records {
        let value = record.get(key);
        if skip_empty && value.trim().is_empty() {
            continue;
        }
        let slot = *index.entry(value).or_insert_with(|| {
            groups.push((value, Vec::new()));
            groups.len() - 1
        });
        groups[slot].1.push(record);
    }

    let duplicates: Vec<DuplicateRecord> = groups
        .into_iter()
        .filter(|(_, members)| members.len() > 1)
        .flat_map(|(value, members)| {
            let count = members.len();
            members.into_iter().map(move |record| DuplicateRecord {
                record: record.clone(),
                duplicate_key: value.to_string(),
                duplicate_count: count,
            })
        })
        .collect();

    debug!("{} of {} records share a {}", duplicates.len(), records.len(), key);
    duplicates
}

/// [`find_duplicates`] with settings from configuration.
pub fn report_duplicates(records: &[CleanRecord], config: &DuplicateConfig) -> Vec<DuplicateRecord> {
    find_duplicates(records, config.key_field, config.skip_empty_keys)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn record(first_name: &str, mobile: &str) -> CleanRecord {
        CleanRecord {
            first_name: first_name.into(),
            mobile: mobile.into(),
            ..CleanRecord::default()
        }
    }

    #[test]
    fn test_three_shared_two_unique() {
        let records = vec![
            record("Ann", "0411111111"),
            record("Bob", "0422222222"),
            record("Cat", "0411111111"),
            record("Dan", "0433333333"),
            record("Eve", "0411111111"),
        ];

        let duplicates = find_duplicates(&records, Field::Mobile, false);
        assert_eq!(duplicates.len(), 3);
        assert!(duplicates.iter().all(|d| d.duplicate_count == 3));
        assert!(duplicates.iter().all(|d| d.duplicate_key == "0411111111"));

        let names: Vec<&str> = duplicates.iter().map(|d| d.record.first_name.as_str()).collect();
        assert_eq!(names, vec!["Ann", "Cat", "Eve"]);
    }

    #[test]
    fn test_groups_in_first_appearance_order() {
        let records = vec![
            record("Ann", "0422222222"),
            record("Bob", "0411111111"),
            record("Cat", "0411111111"),
            record("Dan", "0422222222"),
        ];

        let keys: Vec<String> = find_duplicates(&records, Field::Mobile, false)
            .into_iter()
            .map(|d| d.duplicate_key)
            .collect();
        assert_eq!(keys, vec!["0422222222", "0422222222", "0411111111", "0411111111"]);
    }

    #[test]
    fn test_empty_keys() {
        let records = vec![record("Ann", ""), record("Bob", ""), record("Cat", "0411111111")];

        let grouped = find_duplicates(&records, Field::Mobile, false);
        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped[0].duplicate_key, "");

        assert!(find_duplicates(&records, Field::Mobile, true).is_empty());
    }

    #[test]
    fn test_other_key_field() {
        let mut a = record("Ann", "0411111111");
        a.email = "shared@example.com".into();
        let mut b = record("Bob", "0422222222");
        b.email = "shared@example.com".into();

        let config = DuplicateConfig {
            key_field: Field::Email,
            ..DuplicateConfig::default()
        };
        let duplicates = report_duplicates(&[a.clone(), b], &config);
        assert_eq!(duplicates.len(), 2);
        assert_eq!(duplicates[0].record, a);
        assert_eq!(duplicates[0].duplicate_count, 2);
    }

    #[test]
    fn test_no_duplicates() {
        let records = vec![record("Ann", "0411111111"), record("Bob", "0422222222")];
        assert!(find_duplicates(&records, Field::Mobile, false).is_empty());
    }
}
