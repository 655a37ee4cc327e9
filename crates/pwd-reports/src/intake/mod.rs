//! Adapter between raw record exports and the normalized report inputs.

mod fields;
mod raw;

use crate::reports::{AnnualTotals, BarangayRegistry, ReportInputs};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::io::Read;
use std::path::Path;

pub use fields::parse_datetime;
pub use raw::{
    normalize_application, normalize_benefit, normalize_complaint, normalize_member,
    RawApplication, RawBenefit, RawComplaint, RawMember,
};

#[derive(Debug, thiserror::Error)]
pub enum IntakeError {
    #[error("failed to read dataset: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("invalid JSON dataset: {0}")]
    Json(#[from] serde_json::Error),
}

/// Everything one report run needs, as exported by the data source.
///
/// Every collection is optional; an absent source simply contributes no records.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawDataset {
    #[serde(default, alias = "masterlist")]
    pub members: Vec<RawMember>,
    #[serde(default)]
    pub applications: Vec<RawApplication>,
    #[serde(default, alias = "ayuda")]
    pub benefits: Vec<RawBenefit>,
    #[serde(default)]
    pub complaints: Vec<RawComplaint>,
    #[serde(default)]
    pub barangays: Vec<String>,
    #[serde(default, alias = "prior_year")]
    pub prior_year: Option<AnnualTotals>,
}

impl RawDataset {
    pub fn from_json_path<P: AsRef<Path>>(path: P) -> Result<Self, IntakeError> {
        let file = std::fs::File::open(path)?;
        Self::from_json_reader(file)
    }

    pub fn from_json_reader<R: Read>(reader: R) -> Result<Self, IntakeError> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Normalizes every row. `fallback_registry` applies when the dataset lists no
    /// barangays of its own.
    pub fn into_inputs(self, fallback_registry: &BarangayRegistry) -> ReportInputs {
        let registry = if self.barangays.is_empty() {
            fallback_registry.clone()
        } else {
            BarangayRegistry::new(&self.barangays)
        };

        let inputs = ReportInputs {
            members: self.members.into_iter().map(normalize_member).collect(),
            applications: self
                .applications
                .into_iter()
                .map(normalize_application)
                .collect(),
            benefits: self.benefits.into_iter().map(normalize_benefit).collect(),
            complaints: self.complaints.into_iter().map(normalize_complaint).collect(),
            registry,
            prior_year: self.prior_year,
        };

        tracing::debug!(
            members = inputs.members.len(),
            applications = inputs.applications.len(),
            benefits = inputs.benefits.len(),
            complaints = inputs.complaints.len(),
            barangays = inputs.registry.len(),
            "normalized dataset"
        );

        inputs
    }
}

/// Per-source CSV exports; any of them may be omitted.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvSources<'a> {
    pub members: Option<&'a Path>,
    pub applications: Option<&'a Path>,
    pub benefits: Option<&'a Path>,
    pub complaints: Option<&'a Path>,
}

impl CsvSources<'_> {
    pub fn load(&self) -> Result<RawDataset, IntakeError> {
        Ok(RawDataset {
            members: read_optional_csv(self.members)?,
            applications: read_optional_csv(self.applications)?,
            benefits: read_optional_csv(self.benefits)?,
            complaints: read_optional_csv(self.complaints)?,
            ..RawDataset::default()
        })
    }
}

fn read_optional_csv<T: DeserializeOwned>(path: Option<&Path>) -> Result<Vec<T>, IntakeError> {
    match path {
        Some(path) => read_csv(std::fs::File::open(path)?),
        None => Ok(Vec::new()),
    }
}

/// Reads one CSV export with a header row into raw rows.
pub fn read_csv<T: DeserializeOwned, R: Read>(reader: R) -> Result<Vec<T>, IntakeError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);
    let mut rows = Vec::new();

    for record in csv_reader.deserialize::<T>() {
        rows.push(record?);
    }

    Ok(rows)
}
