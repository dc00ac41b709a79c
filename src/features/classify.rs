//! Per-record categorical features: sex class, season, age-to-weight.

use crate::normalize::recode_season;
use crate::record::{Record, SexClass};

/// Gravid captures are always `f_gra`, whatever sex was recorded.
pub fn sex_class(record: &Record) -> SexClass {
    if record.gravid.value {
        SexClass::FemaleGravid
    } else {
        SexClass::Sex(record.sex.value)
    }
}

/// Recorded ring count per gram; undefined without a reading or weight.
pub fn age_to_weight(record: &Record) -> Option<f64> {
    let weight = record.measurements.weight.value;
    if weight == 0.0 {
        return None;
    }
    record.annuli_reading.value.map(|annuli| annuli / weight)
}

pub fn classify(records: &mut [Record]) {
    for record in records.iter_mut() {
        record.features.sex_class = Some(sex_class(record));
        record.features.season = record.date.value.map(recode_season);
        record.features.age_to_weight = age_to_weight(record);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::tests::capture;
    use crate::normalize::{Season, Sex};

    #[test]
    fn test_gravid_overrides_sex() {
        let mut record = capture("1", Some("A"), None, None);
        record.sex.value = Sex::Male;
        record.gravid.value = true;

        assert_eq!(sex_class(&record), SexClass::FemaleGravid);
        assert_eq!(sex_class(&record).as_str(), "f_gra");
    }

    #[test]
    fn test_non_gravid_keeps_sex() {
        let mut record = capture("1", Some("A"), None, None);
        record.sex.value = Sex::Female;

        assert_eq!(sex_class(&record), SexClass::Sex(Sex::Female));
        assert_eq!(sex_class(&record).as_str(), "f");
    }

    #[test]
    fn test_classify_fills_season_and_ratio() {
        let mut records = vec![
            capture("1", Some("A"), Some("2019-08-10"), Some(5.0)),
            capture("2", Some("A"), None, Some(5.0)),
        ];
        records[0].measurements.weight.value = 250.0;

        classify(&mut records);

        assert_eq!(records[0].features.season, Some(Season::Fall));
        assert_eq!(records[0].features.age_to_weight, Some(0.02));
        assert_eq!(records[1].features.season, None);
        assert_eq!(records[1].features.age_to_weight, None);
    }
}
