//! Grouping of captures by individual and recapture counting.

use std::collections::BTreeMap;

use crate::record::Record;

/// Identifies an individual. Rows without an ID cannot be linked to any
/// other capture and are kept as their own singleton group.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum IndividualKey {
    Id(String),
    Unidentified(usize),
}

/// Maps each individual to the indices of its records, ordered by capture
/// date (undated captures last, source order breaking ties).
pub fn group_by_individual(records: &[Record]) -> BTreeMap<IndividualKey, Vec<usize>> {
    let mut groups: BTreeMap<IndividualKey, Vec<usize>> = BTreeMap::new();

    for (idx, record) in records.iter().enumerate() {
        let key = match &record.id {
            Some(id) => IndividualKey::Id(id.trim().to_string()),
            None => IndividualKey::Unidentified(idx),
        };
        groups.entry(key).or_default().push(idx);
    }

    for members in groups.values_mut() {
        members.sort_by_key(|&idx| {
            let date = records[idx].date.value;
            (date.is_none(), date, idx)
        });
    }

    groups
}

/// Writes the group size onto every record of each individual.
pub fn assign_recapture_counts(
    records: &mut [Record],
    groups: &BTreeMap<IndividualKey, Vec<usize>>,
) {
    for members in groups.values() {
        let count = members.len() as u32;
        for &idx in members {
            records[idx].features.recapture_count = count;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::tests::capture;

    #[test]
    fn test_every_capture_carries_group_size() {
        let mut records = vec![
            capture("1", Some("A"), Some("2015-05-01"), None),
            capture("2", Some("B"), Some("2015-05-01"), None),
            capture("3", Some("A"), Some("2016-05-01"), None),
            capture("4", Some("A"), None, None),
            capture("5", Some("A"), Some("2014-05-01"), None),
        ];
        let groups = group_by_individual(&records);
        assign_recapture_counts(&mut records, &groups);

        let counts: Vec<u32> = records.iter().map(|r| r.features.recapture_count).collect();
        assert_eq!(counts, [4, 1, 4, 4, 4]);
    }

    #[test]
    fn test_group_members_are_date_ordered() {
        let records = vec![
            capture("1", Some("A"), None, None),
            capture("2", Some("A"), Some("2017-05-01"), None),
            capture("3", Some("A"), Some("2015-05-01"), None),
        ];
        let groups = group_by_individual(&records);

        assert_eq!(groups[&IndividualKey::Id("A".to_string())], [2, 1, 0]);
    }

    #[test]
    fn test_unidentified_rows_are_singletons() {
        let records = vec![
            capture("1", None, Some("2015-05-01"), None),
            capture("2", None, Some("2015-05-01"), None),
        ];
        let groups = group_by_individual(&records);

        assert_eq!(groups.len(), 2);
        assert!(groups.values().all(|members| members.len() == 1));
    }
}
