//! Longitudinal feature derivation.
//!
//! Works on the cleaned table as a whole: captures are grouped by individual,
//! counted, re-aged from a baseline reading and bucketed.

pub mod annuli;
pub mod buckets;
pub mod classify;
pub mod recapture;

use tracing::info;

use crate::record::Record;

/// Fills [`Features`](crate::record::Features) on every record.
#[tracing::instrument(skip_all, fields(records = records.len()))]
pub fn derive_features(mut records: Vec<Record>) -> Vec<Record> {
    classify::classify(&mut records);

    let groups = recapture::group_by_individual(&records);
    recapture::assign_recapture_counts(&mut records, &groups);
    annuli::recalculate_annuli(&mut records, &groups);
    buckets::assign_age_groups(&mut records);

    let recaptured = groups.values().filter(|members| members.len() > 1).count();
    info!(individuals = groups.len(), recaptured, "Features derived");
    records
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::clean::clean_record;
    use crate::record::RawRecord;

    /// A cleaned capture with only the fields the deriver looks at.
    pub(crate) fn capture(
        oid: &str,
        id: Option<&str>,
        date: Option<&str>,
        annuli: Option<f64>,
    ) -> Record {
        clean_record(RawRecord {
            oid: oid.to_string(),
            id: id.map(str::to_string),
            date: date.map(str::to_string),
            annuli: annuli.map(|a| a.to_string()),
            ..Default::default()
        })
    }

    #[test]
    fn test_derive_features_end_to_end() {
        let mut records = vec![
            capture("1", Some("X"), Some("2015-06-01"), Some(3.0)),
            capture("2", Some("X"), Some("2017-06-01"), None),
            capture("3", Some("X"), Some("2019-06-01"), None),
            capture("4", Some("Y"), Some("2019-06-01"), Some(22.0)),
        ];
        records[3].gravid.value = true;

        let records = derive_features(records);

        let ages: Vec<i64> = records.iter().map(|r| r.features.annuli).collect();
        assert_eq!(ages, [3, 5, 7, 22]);
        let counts: Vec<u32> = records.iter().map(|r| r.features.recapture_count).collect();
        assert_eq!(counts, [3, 3, 3, 1]);
        assert_eq!(records[0].features.annuli_group.as_deref(), Some("0 - 4"));
        assert_eq!(records[3].features.annuli_group.as_deref(), Some("20 - 24"));
        assert_eq!(records[3].features.sex_class.map(|c| c.as_str()), Some("f_gra"));
    }

    #[test]
    fn test_huge_reading_does_not_abort_derivation() {
        let records = vec![
            capture("1", Some("X"), Some("2019-06-01"), Some(1e20)),
            capture("2", Some("Y"), Some("2019-06-01"), Some(4.0)),
        ];

        let records = derive_features(records);

        assert_eq!(records[0].features.annuli, i64::MAX);
        assert!(records[0].features.annuli_group.is_some());
        assert_eq!(records[1].features.annuli, 4);
        assert!(records[1].features.annuli_group.is_some());
    }
}
