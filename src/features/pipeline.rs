//! Feature pipeline: raw records → label encoding + median imputation → fixed-order matrix → standard scaling.

use super::encoder::{CategoricalEncoder, CategoricalEncoders, StandardScaler};
use super::record::{LabeledTable, RawRecord};
use super::schema::{
    CategoricalColumn, FeatureColumn, NumericColumn, FEATURE_DIM, FEATURE_ORDER,
    MISSING_CATEGORY, UNSEEN_CATEGORY_CODE,
};
use super::{FeatureError, FeatureVector};
use ndarray::Array2;
use serde::{Deserialize, Serialize};

/// How an absent field is treated while building a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MissingPolicy {
    /// Single-record inference: every field is required.
    Reject,
    /// Tables: training medians for numerics, `"nan"` for categoricals.
    Impute,
}

/// Encoders and imputation values learned from the training split.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Encoding {
    encoders: CategoricalEncoders,
    medians: [f64; NumericColumn::COUNT],
}

impl Encoding {
    fn fit(table: &LabeledTable) -> Self {
        let encoders = CategoricalEncoders::from_fn(|column| {
            CategoricalEncoder::fit(
                table
                    .records
                    .iter()
                    .map(|r| r.categorical(column).unwrap_or(MISSING_CATEGORY)),
            )
        });
        let medians = NumericColumn::ALL.map(|column| {
            let mut present: Vec<f64> = table
                .records
                .iter()
                .filter_map(|r| r.numeric(column))
                .filter(|v| !v.is_nan())
                .collect();
            median(&mut present)
        });
        Self { encoders, medians }
    }

    fn encode_row(
        &self,
        record: &RawRecord,
        policy: MissingPolicy,
    ) -> Result<[f64; FEATURE_DIM], FeatureError> {
        let mut row = [0.0; FEATURE_DIM];
        for (slot, column) in row.iter_mut().zip(FEATURE_ORDER) {
            *slot = match column {
                FeatureColumn::Numeric(col) => match (record.numeric(col), policy) {
                    (Some(v), _) => v,
                    (None, MissingPolicy::Impute) => self.medians[col.index()],
                    (None, MissingPolicy::Reject) => {
                        return Err(FeatureError::MissingField { field: col.name() })
                    }
                },
                FeatureColumn::Encoded(col) => {
                    let value = match (record.categorical(col), policy) {
                        (Some(v), _) => v,
                        (None, MissingPolicy::Impute) => MISSING_CATEGORY,
                        (None, MissingPolicy::Reject) => {
                            return Err(FeatureError::MissingField { field: col.name() })
                        }
                    };
                    self.encoders[col]
                        .encode(value)
                        .unwrap_or(UNSEEN_CATEGORY_CODE) as f64
                }
            };
        }
        Ok(row)
    }

    fn encode_table(&self, table: &LabeledTable) -> Result<Array2<f64>, FeatureError> {
        let mut x = Array2::<f64>::zeros((table.len(), FEATURE_DIM));
        for (mut out, record) in x.rows_mut().into_iter().zip(&table.records) {
            let row = self.encode_row(record, MissingPolicy::Impute)?;
            for (dst, src) in out.iter_mut().zip(row) {
                *dst = src;
            }
        }
        Ok(x)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct FittedState {
    encoding: Encoding,
    scaler: StandardScaler,
}

/// Fit-once, transform-many conversion from [`RawRecord`] to the classifier's input space.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeaturePipeline {
    fitted: Option<FittedState>,
}

impl FeaturePipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_fitted(&self) -> bool {
        self.fitted.is_some()
    }

    /// Learn encoders, medians and scaler from `table`; return the standardized matrix and labels.
    /// Calling it again replaces all previously fitted state.
    pub fn fit_transform(
        &mut self,
        table: &LabeledTable,
    ) -> Result<(Array2<f64>, Vec<u8>), FeatureError> {
        check_table(table)?;
        let encoding = Encoding::fit(table);
        let mut x = encoding.encode_table(table)?;
        let scaler = StandardScaler::fit(&x);
        scaler.transform(&mut x);

        tracing::debug!(
            rows = table.len(),
            boroughs = encoding.encoders[CategoricalColumn::Borough].len(),
            "feature pipeline fitted"
        );
        self.fitted = Some(FittedState { encoding, scaler });
        Ok((x, table.labels.clone()))
    }

    /// Encode and scale one record. Every field is required; unseen categories encode as 0.
    pub fn transform(&self, record: &RawRecord) -> Result<FeatureVector, FeatureError> {
        let state = self.state()?;
        let mut values = state.encoding.encode_row(record, MissingPolicy::Reject)?;
        state.scaler.transform_row(&mut values);
        Ok(FeatureVector::new(values))
    }

    /// Encoded but unscaled vector for one record (same rules as [`Self::transform`]).
    pub fn encode(&self, record: &RawRecord) -> Result<FeatureVector, FeatureError> {
        let state = self.state()?;
        state
            .encoding
            .encode_row(record, MissingPolicy::Reject)
            .map(FeatureVector::new)
    }

    /// Replay fitted state over a labelled table, imputing missing values with training medians.
    pub fn transform_table(
        &self,
        table: &LabeledTable,
    ) -> Result<(Array2<f64>, Vec<u8>), FeatureError> {
        let state = self.state()?;
        check_table(table)?;
        let mut x = state.encoding.encode_table(table)?;
        state.scaler.transform(&mut x);
        Ok((x, table.labels.clone()))
    }

    pub fn encoder(&self, column: CategoricalColumn) -> Option<&CategoricalEncoder> {
        self.fitted.as_ref().map(|s| &s.encoding.encoders[column])
    }

    pub fn median(&self, column: NumericColumn) -> Option<f64> {
        self.fitted
            .as_ref()
            .map(|s| s.encoding.medians[column.index()])
    }

    fn state(&self) -> Result<&FittedState, FeatureError> {
        self.fitted.as_ref().ok_or(FeatureError::NotFitted)
    }
}

fn check_table(table: &LabeledTable) -> Result<(), FeatureError> {
    if table.is_empty() {
        return Err(FeatureError::EmptyTable);
    }
    if table.labels.len() != table.records.len() {
        return Err(FeatureError::LabelMismatch {
            records: table.records.len(),
            labels: table.labels.len(),
        });
    }
    Ok(())
}

/// Median of `values` (mean of the middle pair for even lengths); 0.0 when empty.
fn median(values: &mut [f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.sort_by(f64::total_cmp);
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        (values[mid - 1] + values[mid]) / 2.0
    } else {
        values[mid]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn median_odd_even_empty() {
        assert_eq!(median(&mut [3.0, 1.0, 2.0]), 2.0);
        assert_eq!(median(&mut [4.0, 1.0, 3.0, 2.0]), 2.5);
        assert_eq!(median(&mut []), 0.0);
    }

    #[test]
    fn missing_numeric_imputed_with_training_median() {
        let mut table = LabeledTable::default();
        for (age, label) in [(Some(30), 0), (None, 1), (Some(50), 1)] {
            table.push(
                RawRecord {
                    age,
                    ..Default::default()
                },
                label,
            );
        }
        let mut pipeline = FeaturePipeline::new();
        pipeline.fit_transform(&table).unwrap();
        assert_eq!(pipeline.median(NumericColumn::Age), Some(40.0));
        // absent categoricals are encoded through the "nan" class
        assert_eq!(
            pipeline.encoder(CategoricalColumn::Gender).unwrap().classes(),
            &["nan".to_string()]
        );
    }
}
