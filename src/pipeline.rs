//! Stage orchestration: load, clean, derive, aggregate, export.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::clean::clean_records;
use crate::error::{Result, SurveyError};
use crate::features::derive_features;
use crate::output::{write_records, write_sites};
use crate::parser::load_table;
use crate::record::{RawRecord, Record};
use crate::sites::{SiteSummary, summarize_sites};

/// Where the pipeline reads from and writes to.
#[derive(Debug, Clone)]
pub struct PipelinePaths {
    pub source: PathBuf,
    pub cleaned: PathBuf,
    pub sites: PathBuf,
}

impl PipelinePaths {
    /// Derives both output paths from a target directory and file stems.
    pub fn new(
        source: impl Into<PathBuf>,
        target_dir: &Path,
        cleaned_stem: &str,
        sites_stem: &str,
    ) -> Self {
        Self {
            source: source.into(),
            cleaned: target_dir.join(format!("{cleaned_stem}.csv")),
            sites: target_dir.join(format!("{sites_stem}.csv")),
        }
    }
}

/// In-memory result of a run, handed to the export step.
#[derive(Debug)]
pub struct Processed {
    pub records: Vec<Record>,
    pub sites: Vec<SiteSummary>,
}

/// Runs every in-memory stage over an already loaded table.
pub fn process(raw: Vec<RawRecord>) -> Processed {
    let records = clean_records(raw);
    let records = derive_features(records);
    let sites = summarize_sites(&records);
    Processed { records, sites }
}

/// Loads the source, processes it and writes both tables.
///
/// Nothing is written if loading fails.
#[tracing::instrument(skip_all, fields(source = %paths.source.display()))]
pub fn run(paths: &PipelinePaths) -> Result<Processed> {
    let raw = load_table(&paths.source)?;
    let processed = process(raw);

    if let Some(dir) = paths.cleaned.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).map_err(|e| SurveyError::io(dir, e))?;
    }
    if let Some(dir) = paths.sites.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).map_err(|e| SurveyError::io(dir, e))?;
    }

    write_records(&paths.cleaned, &processed.records)?;
    write_sites(&paths.sites, &processed.sites)?;

    info!(
        records = processed.records.len(),
        sites = processed.sites.len(),
        "Pipeline finished"
    );
    Ok(processed)
}
