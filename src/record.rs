//! Capture records before and after cleaning.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::normalize::{Season, Sex};

pub const OID: &str = "OID";
pub const ID: &str = "ID";
pub const RELGUID: &str = "RELGUID";
pub const GLOBAL_ID: &str = "GlobalID";
pub const DATE: &str = "Date";
pub const COMMON_NAME: &str = "Common_Nam";
pub const SCIENTIFIC: &str = "Scientific";
pub const SEX: &str = "Gender_Abb";
pub const GRAVID: &str = "Gravid";
pub const NUMBER_OF: &str = "Number_of";
pub const COMMENTS: &str = "Comments";
pub const WEIGHT: &str = "Weight__g_";
pub const CARAPACE_LENGTH: &str = "Carapace_L";
pub const CARAPACE_WIDTH: &str = "Carapace_S";
pub const PLASTRON_LENGTH: &str = "Plastron_L";
pub const PLASTRON_WIDTH: &str = "Plastron_S";
pub const ANNULI: &str = "Annuli";

/// Columns the source must carry. `Annuli` is optional.
pub const REQUIRED_COLUMNS: &[&str] = &[
    OID,
    ID,
    RELGUID,
    GLOBAL_ID,
    DATE,
    COMMON_NAME,
    SCIENTIFIC,
    SEX,
    GRAVID,
    NUMBER_OF,
    COMMENTS,
    WEIGHT,
    CARAPACE_LENGTH,
    CARAPACE_WIDTH,
    PLASTRON_LENGTH,
    PLASTRON_WIDTH,
];

/// Suffix marking the pre-cleaning copy of a column.
pub const RAW_SUFFIX: &str = "^";

/// One row exactly as it came out of the source. Blank cells are `None`.
#[derive(Debug, Clone, Default)]
pub struct RawRecord {
    pub oid: String,
    pub id: Option<String>,
    pub relguid: Option<String>,
    pub global_id: Option<String>,
    pub date: Option<String>,
    pub common_name: Option<String>,
    pub scientific: Option<String>,
    pub sex: Option<String>,
    pub gravid: Option<String>,
    pub number_of: Option<String>,
    pub comments: Option<String>,
    pub weight: Option<String>,
    pub carapace_length: Option<String>,
    pub carapace_width: Option<String>,
    pub plastron_length: Option<String>,
    pub plastron_width: Option<String>,
    pub annuli: Option<String>,
    /// Columns the pipeline does not interpret, carried through untouched.
    pub extra: BTreeMap<String, String>,
}

/// A cleaned value together with the raw cell it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Cleaned<T> {
    pub value: T,
    pub raw: Option<String>,
}

impl<T> Cleaned<T> {
    pub fn new(value: T, raw: Option<String>) -> Self {
        Self { value, raw }
    }
}

/// Body measurements after numeric recoding.
#[derive(Debug, Clone, PartialEq)]
pub struct Measurements {
    pub weight: Cleaned<f64>,
    pub carapace_length: Cleaned<f64>,
    pub carapace_width: Cleaned<f64>,
    pub plastron_length: Cleaned<f64>,
    pub plastron_width: Cleaned<f64>,
}

/// Combined sex and reproductive status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SexClass {
    Sex(Sex),
    FemaleGravid,
}

impl SexClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            SexClass::Sex(sex) => sex.as_str(),
            SexClass::FemaleGravid => "f_gra",
        }
    }
}

/// Values derived across all captures of an individual.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Features {
    pub recapture_count: u32,
    /// Age recalculated from the individual's baseline reading.
    pub annuli: i64,
    pub annuli_min: Option<f64>,
    pub date_min: Option<NaiveDate>,
    pub annuli_group: Option<String>,
    pub sex_class: Option<SexClass>,
    pub season: Option<Season>,
    pub age_to_weight: Option<f64>,
}

/// One capture observation after cleaning.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub oid: String,
    pub id: Option<String>,
    pub relguid: Option<String>,
    pub global_id: Option<String>,
    pub date: Cleaned<Option<NaiveDate>>,
    pub common_name: Cleaned<Option<String>>,
    pub scientific: Cleaned<Option<String>>,
    pub sex: Cleaned<Sex>,
    pub gravid: Cleaned<bool>,
    pub number_of: Cleaned<Option<f64>>,
    pub comments: Cleaned<String>,
    pub measurements: Measurements,
    /// Age-ring reading as recorded at this capture.
    pub annuli_reading: Cleaned<Option<f64>>,
    pub features: Features,
    pub extra: BTreeMap<String, String>,
}
