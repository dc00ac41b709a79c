//! Export of the cleaned-record and site-summary tables.
//!
//! Both files are truncated and rewritten on every run. Row and column order
//! are fully determined by the data, so rerunning on the same source gives
//! byte-identical files.

use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::path::Path;

use chrono::NaiveDate;
use csv::WriterBuilder;
use tracing::{debug, info};

use crate::error::{Result, SurveyError};
use crate::record::{self, Cleaned, Record, RAW_SUFFIX};
use crate::sites::SiteSummary;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Writes the cleaned table indexed by OID, remaining columns sorted by name.
pub fn write_records(path: &Path, records: &[Record]) -> Result<()> {
    let rows: Vec<BTreeMap<String, String>> = records.iter().map(record_columns).collect();
    let columns: BTreeSet<&str> = rows
        .iter()
        .flat_map(|row| row.keys().map(String::as_str))
        .collect();

    let mut writer = create_writer(path)?;
    let header = std::iter::once(record::OID).chain(columns.iter().copied());
    writer
        .write_record(header)
        .map_err(|e| SurveyError::csv(path, e))?;

    for (record, row) in records.iter().zip(&rows) {
        let cells = std::iter::once(record.oid.as_str()).chain(
            columns
                .iter()
                .map(|column| row.get(*column).map(String::as_str).unwrap_or("")),
        );
        writer
            .write_record(cells)
            .map_err(|e| SurveyError::csv(path, e))?;
    }

    writer.flush().map_err(|e| SurveyError::io(path, e))?;
    info!(path = %path.display(), rows = records.len(), columns = columns.len() + 1, "Cleaned records written");
    Ok(())
}

/// Writes one row per site with the fixed summary columns.
pub fn write_sites(path: &Path, sites: &[SiteSummary]) -> Result<()> {
    let mut writer = create_writer(path)?;
    writer
        .write_record([
            record::RELGUID,
            "Date_first",
            "Date_last",
            "Date_ucount",
            "Count_Rows",
            "Common_Nam_ucount",
            "NW_Pond_Turtle_Count",
            "Western_Painted_Turtl_Count",
        ])
        .map_err(|e| SurveyError::csv(path, e))?;

    for site in sites {
        writer
            .write_record([
                site.relguid.clone(),
                date(site.date_first),
                date(site.date_last),
                site.date_ucount.to_string(),
                site.count_rows.to_string(),
                site.common_name_ucount.to_string(),
                site.nw_pond_turtle_count.to_string(),
                site.western_painted_turtle_count.to_string(),
            ])
            .map_err(|e| SurveyError::csv(path, e))?;
    }

    writer.flush().map_err(|e| SurveyError::io(path, e))?;
    info!(path = %path.display(), sites = sites.len(), "Site summary written");
    Ok(())
}

fn create_writer(path: &Path) -> Result<csv::Writer<File>> {
    debug!(path = %path.display(), "Creating output file");
    let file = File::create(path).map_err(|e| SurveyError::io(path, e))?;
    Ok(WriterBuilder::new().has_headers(false).from_writer(file))
}

fn date(value: Option<NaiveDate>) -> String {
    value
        .map(|d| d.format(DATE_FORMAT).to_string())
        .unwrap_or_default()
}

fn opt<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn flag(value: bool) -> String {
    if value { "True" } else { "False" }.to_string()
}

/// Every exported column of `record` except the OID index.
fn record_columns(record: &Record) -> BTreeMap<String, String> {
    let mut row: BTreeMap<String, String> = record.extra.clone();

    let mut put = |name: &str, value: String| {
        row.insert(name.to_string(), value);
    };
    let raw = |name: &str| format!("{name}{RAW_SUFFIX}");
    fn shadow(c: &Cleaned<impl Sized>) -> String {
        c.raw.clone().unwrap_or_default()
    }

    put(record::ID, opt(record.id.as_deref()));
    put(record::RELGUID, opt(record.relguid.as_deref()));
    put(record::GLOBAL_ID, opt(record.global_id.as_deref()));

    put(record::DATE, date(record.date.value));
    put(&raw(record::DATE), shadow(&record.date));
    put(record::COMMON_NAME, opt(record.common_name.value.as_deref()));
    put(&raw(record::COMMON_NAME), shadow(&record.common_name));
    put(record::SCIENTIFIC, opt(record.scientific.value.as_deref()));
    put(&raw(record::SCIENTIFIC), shadow(&record.scientific));
    put(record::SEX, record.sex.value.as_str().to_string());
    put(&raw(record::SEX), shadow(&record.sex));
    put(record::GRAVID, flag(record.gravid.value));
    put(&raw(record::GRAVID), shadow(&record.gravid));
    put(record::NUMBER_OF, opt(record.number_of.value));
    put(&raw(record::NUMBER_OF), shadow(&record.number_of));
    put(record::COMMENTS, record.comments.value.clone());
    put(&raw(record::COMMENTS), shadow(&record.comments));

    let m = &record.measurements;
    for (name, field) in [
        (record::WEIGHT, &m.weight),
        (record::CARAPACE_LENGTH, &m.carapace_length),
        (record::CARAPACE_WIDTH, &m.carapace_width),
        (record::PLASTRON_LENGTH, &m.plastron_length),
        (record::PLASTRON_WIDTH, &m.plastron_width),
    ] {
        put(name, field.value.to_string());
        put(&raw(name), shadow(field));
    }

    let f = &record.features;
    put(record::ANNULI, f.annuli.to_string());
    put("Annuli_orig", opt(record.annuli_reading.value));
    put(&raw(record::ANNULI), shadow(&record.annuli_reading));
    put("Annuli_Group", opt(f.annuli_group.as_deref()));
    put("annuli_min", opt(f.annuli_min));
    put("date_min", date(f.date_min));
    put("recapture_count", f.recapture_count.to_string());
    let sex_class = opt(f.sex_class.map(|c| c.as_str()));
    put("gender_plus", sex_class.clone());
    put("gender_seasons", sex_class);
    put("season", opt(f.season.map(|s| s.as_str())));
    put("Age_To_Weight", opt(f.age_to_weight));

    row
}
