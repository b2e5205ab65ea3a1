//! Dataset access: the merged health + environment training table and the serving-side lookup.

mod environment;
mod generator;
mod loader;

pub use environment::{EnvironmentReadings, EnvironmentRow, EnvironmentTable, LONDON_BOROUGHS};
pub use generator::{GeneratedSummary, HealthRow, SyntheticDataset};
pub use loader::{CsvDatasetLoader, LABEL_COLUMN};

use crate::features::LabeledTable;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DataError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed CSV in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("{path} has no `{column}` column")]
    MissingColumn { path: PathBuf, column: &'static str },

    #[error("{path} line {line}: label `{value}` is not 0 or 1")]
    InvalidLabel {
        path: PathBuf,
        line: u64,
        value: String,
    },

    #[error("{path} contains no data rows")]
    Empty { path: PathBuf },

    #[error("environmental table has no rows")]
    NoEnvironmentRows,
}

/// Anything that can hand the trainer one merged, labelled table.
pub trait DatasetSource {
    fn load(&self) -> Result<LabeledTable, DataError>;
}

impl DatasetSource for LabeledTable {
    fn load(&self) -> Result<LabeledTable, DataError> {
        Ok(self.clone())
    }
}
