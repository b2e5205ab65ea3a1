//! Feature engineering: raw subject records → fixed-order, standardized numeric vectors.

mod encoder;
mod pipeline;
mod record;
mod schema;

pub use encoder::{CategoricalEncoder, CategoricalEncoders, StandardScaler};
pub use pipeline::FeaturePipeline;
pub use record::{LabeledTable, RawRecord};
pub use schema::{
    feature_names, CategoricalColumn, FeatureColumn, NumericColumn, FEATURE_DIM, FEATURE_ORDER,
    MISSING_CATEGORY, UNSEEN_CATEGORY_CODE,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FeatureError {
    #[error("missing required field `{field}`")]
    MissingField { field: &'static str },

    #[error("feature pipeline has not been fitted")]
    NotFitted,

    #[error("cannot fit or transform an empty table")]
    EmptyTable,

    #[error("table has {records} records but {labels} labels")]
    LabelMismatch { records: usize, labels: usize },
}

/// One model input in [`FEATURE_ORDER`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    values: [f64; FEATURE_DIM],
}

impl FeatureVector {
    pub fn new(values: [f64; FEATURE_DIM]) -> Self {
        Self { values }
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    pub fn get(&self, column: FeatureColumn) -> f64 {
        self.values[column.position()]
    }

    pub fn len(&self) -> usize {
        FEATURE_DIM
    }

    pub fn is_empty(&self) -> bool {
        false
    }
}
