//! Pure recoding functions, one per survey field.
//!
//! A missing cell is passed in as `None`. Every function is total: the worst
//! an input can do is map onto the field's "no information" outcome.

use std::sync::LazyLock;

use chrono::{Datelike, NaiveDate};
use regex::Regex;

use super::synonyms::{COMMON_NAME, Canonical, GRAVID, SCIENTIFIC, SEX, Sex, SynonymTable};

static NON_LETTERS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-zA-Z]").expect("Invalid non-letter regex"));

static NON_COMMENT_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-zA-Z ]").expect("Invalid comment regex"));

static DECIMAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[-+]?\d*\.\d+|\d+").expect("Invalid decimal regex"));

/// Lowercases `value` and drops everything that is not an ASCII letter.
pub fn low_string(value: &str) -> String {
    NON_LETTERS.replace_all(&value.to_lowercase(), "").into_owned()
}

/// Maps free text onto `m`, `f` or `unknown`.
pub fn recode_sex(value: Option<&str>) -> Sex {
    value
        .and_then(|v| SEX.lookup(&low_string(v)))
        .unwrap_or(Sex::Unknown)
}

/// `yes` / `y` in any case or spacing is gravid, everything else is not.
pub fn recode_gravid(value: Option<&str>) -> bool {
    value
        .and_then(|v| GRAVID.lookup(&low_string(v)))
        .unwrap_or(false)
}

pub fn recode_common_name(value: Option<&str>) -> Option<String> {
    recode_name(&COMMON_NAME, value)
}

pub fn recode_scientific(value: Option<&str>) -> Option<String> {
    recode_name(&SCIENTIFIC, value)
}

/// Unmapped names pass through untouched, original spelling included.
fn recode_name(table: &SynonymTable<Canonical>, value: Option<&str>) -> Option<String> {
    let value = value?;
    match table.lookup(&low_string(value)) {
        Some(Canonical::Name(name)) => Some(name.to_string()),
        Some(Canonical::Missing) => None,
        None => Some(value.to_string()),
    }
}

/// Pulls the first number embedded in `value`, or 0 when there is none.
pub fn recode_decimal(value: Option<&str>) -> f64 {
    let Some(value) = value.filter(|v| !v.is_empty()) else {
        return 0.0;
    };

    DECIMAL
        .find(value)
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .unwrap_or(0.0)
}

/// Strips everything except letters and spaces.
pub fn recode_comments(comments: &str) -> String {
    NON_COMMENT_CHARS.replace_all(comments, "").into_owned()
}

/// Survey half of the year an observation falls in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Season {
    Spring,
    Fall,
}

impl Season {
    pub fn as_str(&self) -> &'static str {
        match self {
            Season::Spring => "spr",
            Season::Fall => "fal",
        }
    }
}

pub fn recode_season(date: NaiveDate) -> Season {
    if date.month() <= 6 {
        Season::Spring
    } else {
        Season::Fall
    }
}
