//! Label encoders for categorical columns and the per-feature standard scaler.

use super::schema::CategoricalColumn;
use ndarray::{Array2, Axis};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::ops::Index;

/// Maps the distinct values seen at fit time to `0..n` in ascending byte order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoricalEncoder {
    classes: Vec<String>,
}

impl CategoricalEncoder {
    pub fn fit<'a>(values: impl IntoIterator<Item = &'a str>) -> Self {
        let classes: BTreeSet<&str> = values.into_iter().collect();
        Self {
            classes: classes.into_iter().map(str::to_string).collect(),
        }
    }

    /// Code for `value`, or `None` if it was not seen during fit.
    pub fn encode(&self, value: &str) -> Option<usize> {
        self.classes
            .binary_search_by(|c| c.as_str().cmp(value))
            .ok()
    }

    pub fn decode(&self, code: usize) -> Option<&str> {
        self.classes.get(code).map(String::as_str)
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

/// One encoder per categorical column, indexed by [`CategoricalColumn`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoricalEncoders([CategoricalEncoder; CategoricalColumn::COUNT]);

impl CategoricalEncoders {
    pub fn from_fn(f: impl FnMut(CategoricalColumn) -> CategoricalEncoder) -> Self {
        Self(CategoricalColumn::ALL.map(f))
    }

    pub fn iter(&self) -> impl Iterator<Item = (CategoricalColumn, &CategoricalEncoder)> {
        CategoricalColumn::ALL.into_iter().zip(self.0.iter())
    }
}

impl Index<CategoricalColumn> for CategoricalEncoders {
    type Output = CategoricalEncoder;

    fn index(&self, column: CategoricalColumn) -> &CategoricalEncoder {
        &self.0[column.index()]
    }
}

/// Per-column (mean, scale) standardization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    mean: Vec<f64>,
    scale: Vec<f64>,
}

impl StandardScaler {
    /// Population statistics (ddof = 0). A zero deviation becomes a scale of 1.
    pub fn fit(x: &Array2<f64>) -> Self {
        let mean = x
            .mean_axis(Axis(0))
            .map(|m| m.to_vec())
            .unwrap_or_else(|| vec![0.0; x.ncols()]);
        let scale = x
            .std_axis(Axis(0), 0.0)
            .iter()
            .map(|&s| if s == 0.0 || !s.is_finite() { 1.0 } else { s })
            .collect();
        Self { mean, scale }
    }

    pub fn transform_row(&self, row: &mut [f64]) {
        for ((v, m), s) in row.iter_mut().zip(&self.mean).zip(&self.scale) {
            *v = (*v - m) / s;
        }
    }

    pub fn transform(&self, x: &mut Array2<f64>) {
        for mut row in x.rows_mut() {
            for ((v, m), s) in row.iter_mut().zip(&self.mean).zip(&self.scale) {
                *v = (*v - m) / s;
            }
        }
    }

    pub fn mean(&self) -> &[f64] {
        &self.mean
    }

    pub fn scale(&self) -> &[f64] {
        &self.scale
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn encoder_sorted_codes() {
        let enc = CategoricalEncoder::fit(["Male", "Female", "Male"]);
        assert_eq!(enc.classes(), &["Female".to_string(), "Male".to_string()]);
        assert_eq!(enc.encode("Female"), Some(0));
        assert_eq!(enc.encode("Male"), Some(1));
        assert_eq!(enc.encode("Other"), None);
        assert_eq!(enc.decode(1), Some("Male"));
    }

    #[test]
    fn scaler_standardizes_columns() {
        let x = array![[1.0, 5.0], [3.0, 5.0]];
        let scaler = StandardScaler::fit(&x);
        assert_eq!(scaler.mean(), &[2.0, 5.0]);
        assert_eq!(scaler.scale(), &[1.0, 1.0]);

        let mut row = [3.0, 7.0];
        scaler.transform_row(&mut row);
        assert_eq!(row, [1.0, 2.0]);

        let mut y = x.clone();
        scaler.transform(&mut y);
        assert_eq!(y, array![[-1.0, 0.0], [1.0, 0.0]]);
    }
}
