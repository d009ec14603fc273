//! Dataset ingestion from delimited text.
//!
//! The first row names the fields; every following row becomes a [`Record`].
//! Cells are trimmed, quoted fields are honoured and blank lines are skipped.
//! A row whose field count differs from the header fails the whole load:
//! a partially decoded dataset is never returned.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::dataset::{Dataset, Schema};
use crate::error::{DashboardError, Result};
use crate::record::Record;

/// Anything that can produce the session's dataset.
///
/// Loading is fire-once per session; a retry is simply another `load` call.
pub trait RecordSource: Send + Sync {
    fn load(&self) -> Result<Dataset>;

    /// Human readable origin, used in logs.
    fn describe(&self) -> String;
}

/// Reads a CSV file from disk on every `load`.
#[derive(Debug, Clone)]
pub struct CsvFileSource {
    path: PathBuf,
}

impl CsvFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        CsvFileSource { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RecordSource for CsvFileSource {
    fn load(&self) -> Result<Dataset> {
        read_csv(&self.path)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Serves an already-built dataset.
#[derive(Debug, Clone)]
pub struct InMemorySource {
    dataset: Dataset,
}

impl InMemorySource {
    pub fn new(dataset: Dataset) -> Self {
        InMemorySource { dataset }
    }
}

impl RecordSource for InMemorySource {
    fn load(&self) -> Result<Dataset> {
        Ok(self.dataset.clone())
    }

    fn describe(&self) -> String {
        format!("in-memory dataset '{}'", self.dataset.name())
    }
}

/// Read and decode a CSV file.
///
/// The dataset is named after the file stem.
pub fn read_csv(path: &Path) -> Result<Dataset> {
    let file = File::open(path).map_err(|e| DashboardError::io(path, e))?;
    let name = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "dataset".to_string());

    let dataset = parse_csv(name, file)?;
    log::debug!(
        "parsed {} records ({} columns) from {}",
        dataset.len(),
        dataset.schema().len(),
        path.display()
    );
    Ok(dataset)
}

/// Decode CSV text from any reader.
pub fn parse_csv<R: Read>(name: impl Into<String>, reader: R) -> Result<Dataset> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(false)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    let schema = Schema::new(headers);

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        let record = Record::from_pairs(
            schema
                .get_column_names()
                .into_iter()
                .zip(row.iter()),
        );
        records.push(record);
    }

    if !schema.is_empty() {
        let missing = schema.missing_mandatory();
        if !missing.is_empty() {
            log::warn!("dataset is missing expected columns: {}", missing.join(", "));
        }
    }

    Ok(Dataset::new(name.into(), schema, records))
}
