//! Loader for the survey spreadsheet's delimited-text export.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ByteRecord, StringRecord};
use tracing::{debug, info};

use crate::error::{Result, SurveyError};
use crate::record::{self, RawRecord, REQUIRED_COLUMNS};

/// Reads every row of the source file at `path`.
///
/// # Errors
///
/// Fails if the file cannot be opened, is not valid delimited text, or lacks
/// any of [`REQUIRED_COLUMNS`].
#[tracing::instrument(skip_all, fields(path = %path.display()))]
pub fn load_table(path: &Path) -> Result<Vec<RawRecord>> {
    let file = File::open(path).map_err(|e| SurveyError::io(path, e))?;
    let rows = parse_table(file, path)?;
    info!(rows = rows.len(), "Source table loaded");
    Ok(rows)
}

/// Parses a header-first delimited table from any reader. `origin` is only
/// used in error messages.
///
/// Headers must be valid UTF-8. Cells are decoded lossily, so a stray
/// legacy-encoded byte in one cell does not reject the whole table.
pub fn parse_table<R: Read>(reader: R, origin: &Path) -> Result<Vec<RawRecord>> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(reader);

    let headers = rdr
        .headers()
        .map_err(|e| SurveyError::csv(origin, e))?
        .clone();
    let index = ColumnIndex::new(&headers)?;

    let mut rows = Vec::new();
    for result in rdr.byte_records() {
        let row = result.map_err(|e| SurveyError::csv(origin, e))?;
        rows.push(index.raw_record(&headers, &row));
    }

    debug!(columns = headers.len(), "Parsed source headers");
    Ok(rows)
}

fn decode(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

fn cell(row: &ByteRecord, idx: Option<usize>) -> Option<String> {
    let value = decode(row.get(idx?)?);
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

struct ColumnIndex {
    positions: HashMap<&'static str, usize>,
    known: Vec<usize>,
}

impl ColumnIndex {
    fn new(headers: &StringRecord) -> Result<Self> {
        let lookup: HashMap<&str, usize> = headers
            .iter()
            .enumerate()
            .map(|(i, name)| (name.trim(), i))
            .collect();

        let missing: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .filter(|name| !lookup.contains_key(*name))
            .map(|name| name.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(SurveyError::MissingColumns { columns: missing });
        }

        let positions: HashMap<&'static str, usize> = REQUIRED_COLUMNS
            .iter()
            .chain(std::iter::once(&record::ANNULI))
            .filter_map(|name| lookup.get(name).map(|&i| (*name, i)))
            .collect();
        let known = positions.values().copied().collect();

        Ok(Self { positions, known })
    }

    fn get(&self, row: &ByteRecord, name: &str) -> Option<String> {
        cell(row, self.positions.get(name).copied())
    }

    fn raw_record(&self, headers: &StringRecord, row: &ByteRecord) -> RawRecord {
        let extra = headers
            .iter()
            .enumerate()
            .filter(|(i, name)| !self.known.contains(i) && !name.trim().is_empty())
            .map(|(i, name)| (name.trim().to_string(), row.get(i).map(decode).unwrap_or_default()))
            .collect();

        RawRecord {
            oid: self.get(row, record::OID).unwrap_or_default(),
            id: self.get(row, record::ID),
            relguid: self.get(row, record::RELGUID),
            global_id: self.get(row, record::GLOBAL_ID),
            date: self.get(row, record::DATE),
            common_name: self.get(row, record::COMMON_NAME),
            scientific: self.get(row, record::SCIENTIFIC),
            sex: self.get(row, record::SEX),
            gravid: self.get(row, record::GRAVID),
            number_of: self.get(row, record::NUMBER_OF),
            comments: self.get(row, record::COMMENTS),
            weight: self.get(row, record::WEIGHT),
            carapace_length: self.get(row, record::CARAPACE_LENGTH),
            carapace_width: self.get(row, record::CARAPACE_WIDTH),
            plastron_length: self.get(row, record::PLASTRON_LENGTH),
            plastron_width: self.get(row, record::PLASTRON_WIDTH),
            annuli: self.get(row, record::ANNULI),
            extra,
        }
    }
}
