//! Per-site summary statistics.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::normalize::synonyms::{NW_POND_TURTLE, WESTERN_PAINTED_TURTLE};
use crate::record::Record;

/// Summary row for one site (RELGUID).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SiteSummary {
    pub relguid: String,
    pub date_first: Option<NaiveDate>,
    pub date_last: Option<NaiveDate>,
    pub date_ucount: usize,
    pub count_rows: usize,
    pub common_name_ucount: usize,
    pub nw_pond_turtle_count: usize,
    pub western_painted_turtle_count: usize,
}

impl SiteSummary {
    fn from_records<'a>(relguid: &str, records: impl Iterator<Item = &'a Record>) -> Self {
        let mut dates = BTreeSet::new();
        let mut species = BTreeSet::new();
        let mut summary = SiteSummary {
            relguid: relguid.to_string(),
            ..Default::default()
        };

        for record in records {
            summary.count_rows += 1;
            if let Some(date) = record.date.value {
                dates.insert(date);
            }
            if let Some(name) = record.common_name.value.as_deref() {
                species.insert(name);
                match name {
                    NW_POND_TURTLE => summary.nw_pond_turtle_count += 1,
                    WESTERN_PAINTED_TURTLE => summary.western_painted_turtle_count += 1,
                    _ => {}
                }
            }
        }

        summary.date_first = dates.first().copied();
        summary.date_last = dates.last().copied();
        summary.date_ucount = dates.len();
        summary.common_name_ucount = species.len();
        summary
    }
}

/// Summarizes records by site, in ascending site order. Records without a
/// site id are left out.
#[tracing::instrument(skip_all, fields(records = records.len()))]
pub fn summarize_sites(records: &[Record]) -> Vec<SiteSummary> {
    let mut by_site: BTreeMap<&str, Vec<&Record>> = BTreeMap::new();
    let mut unsited = 0usize;

    for record in records {
        match record.relguid.as_deref().map(str::trim) {
            Some(site) if !site.is_empty() => by_site.entry(site).or_default().push(record),
            _ => unsited += 1,
        }
    }
    if unsited > 0 {
        debug!(unsited, "Records without a site skipped");
    }

    let summaries: Vec<SiteSummary> = by_site
        .into_iter()
        .map(|(site, members)| SiteSummary::from_records(site, members.into_iter()))
        .collect();

    info!(sites = summaries.len(), "Sites summarized");
    summaries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clean::clean_record;
    use crate::record::RawRecord;

    fn sighting(oid: &str, site: Option<&str>, date: &str, name: &str) -> Record {
        clean_record(RawRecord {
            oid: oid.to_string(),
            relguid: site.map(str::to_string),
            date: Some(date.to_string()),
            common_name: Some(name.to_string()),
            ..Default::default()
        })
    }

    #[test]
    fn test_species_counts() {
        let mut records = Vec::new();
        for i in 0..6 {
            records.push(sighting(&i.to_string(), Some("S1"), "2019-05-01", "NW Pond Turtle"));
        }
        for i in 6..10 {
            records.push(sighting(
                &i.to_string(),
                Some("S1"),
                "2019-05-02",
                "western painted turtle",
            ));
        }

        let sites = summarize_sites(&records);

        assert_eq!(sites.len(), 1);
        let site = &sites[0];
        assert_eq!(site.nw_pond_turtle_count, 6);
        assert_eq!(site.western_painted_turtle_count, 4);
        assert_eq!(site.count_rows, 10);
        assert_eq!(site.common_name_ucount, 2);
        assert_eq!(site.date_ucount, 2);
    }

    #[test]
    fn test_dates_and_other_species() {
        let records = vec![
            sighting("1", Some("S2"), "2018-08-01", "Red-eared slider"),
            sighting("2", Some("S2"), "2016-05-01", "Spotted Turtle"),
            sighting("3", Some("S2"), "not a date", "None"),
            sighting("4", Some("S1"), "2017-05-01", "NW Pond Turtle"),
        ];

        let sites = summarize_sites(&records);

        assert_eq!(sites[0].relguid, "S1");
        let s2 = &sites[1];
        assert_eq!(s2.date_first, NaiveDate::from_ymd_opt(2016, 5, 1));
        assert_eq!(s2.date_last, NaiveDate::from_ymd_opt(2018, 8, 1));
        assert_eq!(s2.date_ucount, 2);
        assert_eq!(s2.count_rows, 3);
        assert_eq!(s2.common_name_ucount, 2);
        assert_eq!(s2.nw_pond_turtle_count, 0);
        assert_eq!(s2.western_painted_turtle_count, 0);
    }

    #[test]
    fn test_unsited_records_skipped() {
        let records = vec![sighting("1", None, "2018-08-01", "NW Pond Turtle")];
        assert!(summarize_sites(&records).is_empty());
    }
}
