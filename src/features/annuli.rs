//! Age recalculation across recaptures.
//!
//! Ring counts are only trusted at the reading where they are smallest; every
//! other capture's age is that baseline plus the years elapsed since.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};

use super::recapture::IndividualKey;
use crate::record::Record;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Baseline {
    pub age: f64,
    pub date: Option<NaiveDate>,
}

impl Baseline {
    /// Age at `observed`, or `None` when either date is unknown.
    pub fn age_at(&self, observed: Option<NaiveDate>) -> Option<f64> {
        let elapsed = observed?.year() - self.date?.year();
        Some(elapsed as f64 + self.age)
    }
}

/// Smallest positive reading among `members`; ties go to the earliest dated
/// reading, undated readings lose every tie.
pub fn find_baseline(records: &[Record], members: &[usize]) -> Option<Baseline> {
    members
        .iter()
        .filter_map(|&idx| {
            let record = &records[idx];
            let age = record.annuli_reading.value.filter(|a| *a > 0.0)?;
            Some(Baseline {
                age,
                date: record.date.value,
            })
        })
        .min_by(|a, b| a.age.total_cmp(&b.age).then_with(|| by_date(a.date, b.date)))
}

fn by_date(a: Option<NaiveDate>, b: Option<NaiveDate>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Fills `annuli`, `annuli_min` and `date_min` for every record. Records
/// without a usable baseline get an age of 0.
pub fn recalculate_annuli(records: &mut [Record], groups: &BTreeMap<IndividualKey, Vec<usize>>) {
    for members in groups.values() {
        let baseline = find_baseline(records, members);

        for &idx in members {
            let record = &mut records[idx];
            record.features.annuli_min = baseline.map(|b| b.age);
            record.features.date_min = baseline.and_then(|b| b.date);
            record.features.annuli = baseline
                .and_then(|b| b.age_at(record.date.value))
                .map(|age| age.round() as i64)
                .unwrap_or(0);
        }
    }
}
