//! Record cleaner: date repair, count repair, comment sanitizing and
//! field-by-field recoding.

use chrono::{Datelike, Months, NaiveDate, NaiveDateTime};
use tracing::{debug, info, warn};

use crate::normalize::{
    recode_comments, recode_common_name, recode_decimal, recode_gravid, recode_scientific,
    recode_sex,
};
use crate::record::{Cleaned, Features, Measurements, RawRecord, Record};

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%y", "%m/%d/%Y", "%Y/%m/%d", "%d-%b-%Y"];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%m/%d/%Y %H:%M:%S",
];

/// Cleans every raw row. Never fails: malformed cells degrade to their
/// field's missing value.
#[tracing::instrument(skip_all, fields(rows = raw.len()))]
pub fn clean_records(raw: Vec<RawRecord>) -> Vec<Record> {
    let records: Vec<Record> = raw.into_iter().map(clean_record).collect();

    let undated = records.iter().filter(|r| r.date.value.is_none()).count();
    info!(records = records.len(), undated, "Records cleaned");
    records
}

pub fn clean_record(raw: RawRecord) -> Record {
    let date = raw.date.as_deref().and_then(parse_date).map(repair_new_year);
    if date.is_none() && raw.date.is_some() {
        debug!(oid = %raw.oid, date = ?raw.date, "Unparseable date treated as missing");
    }

    let (number_of, tag) = repair_count(raw.number_of.as_deref());
    if number_of.is_none() && raw.number_of.is_some() && tag.is_none() {
        warn!(oid = %raw.oid, value = ?raw.number_of, "Non-numeric individual count dropped");
    }

    let mut comments = raw.comments.clone().unwrap_or_default();
    if let Some(tag) = tag {
        comments.push_str(tag);
    }

    Record {
        oid: raw.oid,
        id: raw.id,
        relguid: raw.relguid,
        global_id: raw.global_id,
        date: Cleaned::new(date, raw.date),
        common_name: Cleaned::new(recode_common_name(raw.common_name.as_deref()), raw.common_name),
        scientific: Cleaned::new(recode_scientific(raw.scientific.as_deref()), raw.scientific),
        sex: Cleaned::new(recode_sex(raw.sex.as_deref()), raw.sex),
        gravid: Cleaned::new(recode_gravid(raw.gravid.as_deref()), raw.gravid),
        number_of: Cleaned::new(number_of, raw.number_of),
        comments: Cleaned::new(recode_comments(&comments), raw.comments),
        measurements: Measurements {
            weight: measurement(raw.weight),
            carapace_length: measurement(raw.carapace_length),
            carapace_width: measurement(raw.carapace_width),
            plastron_length: measurement(raw.plastron_length),
            plastron_width: measurement(raw.plastron_width),
        },
        annuli_reading: Cleaned::new(
            raw.annuli.as_deref().map(|v| recode_decimal(Some(v))),
            raw.annuli,
        ),
        features: Features::default(),
        extra: raw.extra,
    }
}

fn measurement(raw: Option<String>) -> Cleaned<f64> {
    Cleaned::new(recode_decimal(raw.as_deref()), raw)
}

/// Parses the date formats the survey export has been seen to use. Any
/// time-of-day part is discarded.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
                .map(|dt| dt.date())
        })
}

/// January 1st is the source system's default for an unknown date; those
/// entries are moved to July 1st.
pub fn repair_new_year(date: NaiveDate) -> NaiveDate {
    if date.month() == 1 && date.day() == 1 {
        date.checked_add_months(Months::new(6)).unwrap_or(date)
    } else {
        date
    }
}

/// Converts the textual individual count. Returns the count and the tag to
/// append to the comments, if any.
pub fn repair_count(value: Option<&str>) -> (Option<f64>, Option<&'static str>) {
    let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return (Some(0.0), None);
    };

    match value.to_lowercase().as_str() {
        "multiple" => (Some(3.0), Some(" Multiple Animals seen")),
        "huge population" => (Some(50.0), Some(" Huge population seen")),
        "na" => (Some(0.0), Some(" na")),
        _ => (parse_count(value), None),
    }
}

fn parse_count(value: &str) -> Option<f64> {
    value.parse::<f64>().ok().filter(|n| n.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::Sex;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn raw(oid: &str) -> RawRecord {
        RawRecord {
            oid: oid.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_new_year_shifted_to_july() {
        assert_eq!(repair_new_year(ymd(2018, 1, 1)), ymd(2018, 7, 1));
        assert_eq!(repair_new_year(ymd(2018, 6, 15)), ymd(2018, 6, 15));
        assert_eq!(repair_new_year(ymd(2018, 1, 2)), ymd(2018, 1, 2));
    }

    #[test]
    fn test_parse_date_formats() {
        assert_eq!(parse_date("2019-05-04"), Some(ymd(2019, 5, 4)));
        assert_eq!(parse_date("5/4/2019"), Some(ymd(2019, 5, 4)));
        assert_eq!(parse_date("2019-05-04 13:45:00"), Some(ymd(2019, 5, 4)));
        assert_eq!(parse_date(" 04-May-2019 "), Some(ymd(2019, 5, 4)));
        assert_eq!(parse_date("spring 2019"), None);
        assert_eq!(parse_date("2019-02-30"), None);
    }

    #[test]
    fn test_unparseable_date_becomes_missing() {
        let record = clean_record(RawRecord {
            date: Some("sometime".to_string()),
            ..raw("1")
        });
        assert_eq!(record.date.value, None);
        assert_eq!(record.date.raw.as_deref(), Some("sometime"));
    }

    #[test]
    fn test_repair_count_tokens() {
        assert_eq!(repair_count(Some("multiple")), (Some(3.0), Some(" Multiple Animals seen")));
        assert_eq!(
            repair_count(Some("huge population")),
            (Some(50.0), Some(" Huge population seen"))
        );
        assert_eq!(repair_count(Some("na")), (Some(0.0), Some(" na")));
        assert_eq!(repair_count(Some(" ")), (Some(0.0), None));
        assert_eq!(repair_count(None), (Some(0.0), None));
        assert_eq!(repair_count(Some("4")), (Some(4.0), None));
        assert_eq!(repair_count(Some("2.0")), (Some(2.0), None));
        assert_eq!(repair_count(Some("2.5")), (Some(2.5), None));
        assert_eq!(repair_count(Some("a few")), (None, None));
        assert_eq!(repair_count(Some("inf")), (None, None));
    }

    #[test]
    fn test_count_tag_survives_comment_sanitizing() {
        let record = clean_record(RawRecord {
            number_of: Some("multiple".to_string()),
            comments: Some("Basking; log #3".to_string()),
            ..raw("1")
        });

        assert_eq!(record.number_of.value, Some(3.0));
        assert_eq!(record.number_of.raw.as_deref(), Some("multiple"));
        assert_eq!(record.comments.value, "Basking log  Multiple Animals seen");
        assert_eq!(record.comments.raw.as_deref(), Some("Basking; log #3"));
    }

    #[test]
    fn test_fields_keep_raw_shadow() {
        let record = clean_record(RawRecord {
            sex: Some("MALE".to_string()),
            gravid: Some("Y".to_string()),
            common_name: Some("western painted turtle".to_string()),
            weight: Some("350 g".to_string()),
            carapace_length: Some("n/a".to_string()),
            ..raw("7")
        });

        assert_eq!(record.sex, Cleaned::new(Sex::Male, Some("MALE".to_string())));
        assert_eq!(record.gravid, Cleaned::new(true, Some("Y".to_string())));
        assert_eq!(
            record.common_name.value.as_deref(),
            Some("Western Painted Turtle")
        );
        assert_eq!(record.measurements.weight.value, 350.0);
        assert_eq!(record.measurements.weight.raw.as_deref(), Some("350 g"));
        assert_eq!(record.measurements.carapace_length.value, 0.0);
        assert_eq!(record.measurements.plastron_width.raw, None);
    }

    #[test]
    fn test_clean_records_keeps_every_row() {
        let rows = vec![raw("1"), raw("2"), raw("3")];
        let records = clean_records(rows);
        let oids: Vec<_> = records.iter().map(|r| r.oid.as_str()).collect();
        assert_eq!(oids, ["1", "2", "3"]);
    }
}
