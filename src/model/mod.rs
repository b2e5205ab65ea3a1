//! Classifiers, evaluation helpers and the [`RiskModel`] service that ties them to a feature pipeline.

mod artifact;
pub mod evaluation;
mod forest;
mod logistic;
mod risk_model;
mod tree;

pub use artifact::{ArtifactEnvelope, ARTIFACT_FORMAT_VERSION};
pub use evaluation::{ClassificationReport, Split};
pub use forest::RandomForest;
pub use logistic::LogisticRegression;
pub use risk_model::{select_best, ModelState, Prediction, RiskModel, TrainedModel, TrainingReport};
pub use tree::{DecisionTree, TreeConfig, TreeNode};

use crate::config::ModelConfig;
use crate::data::DataError;
use crate::features::FeatureError;
use crate::storage::ArtifactError;
use ndarray::ArrayView2;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("model has not been trained or restored")]
    NotReady,

    #[error(transparent)]
    Feature(#[from] FeatureError),

    #[error(transparent)]
    Data(#[from] DataError),

    #[error(transparent)]
    Artifact(#[from] ArtifactError),

    #[error("insufficient training data: {0}")]
    InsufficientData(String),
}

/// Which classifier family a model uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelVariant {
    RandomForest,
    LogisticRegression,
}

impl ModelVariant {
    pub fn as_str(self) -> &'static str {
        match self {
            ModelVariant::RandomForest => "random_forest",
            ModelVariant::LogisticRegression => "logistic_regression",
        }
    }
}

impl fmt::Display for ModelVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "random_forest" => Ok(ModelVariant::RandomForest),
            "logistic_regression" => Ok(ModelVariant::LogisticRegression),
            other => Err(format!(
                "unsupported model type `{other}` (expected random_forest or logistic_regression)"
            )),
        }
    }
}

/// Fitted classifier state for either variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "variant", rename_all = "snake_case")]
pub enum Classifier {
    RandomForest(RandomForest),
    LogisticRegression(LogisticRegression),
}

impl Classifier {
    pub fn new(variant: ModelVariant, config: &ModelConfig) -> Self {
        match variant {
            ModelVariant::RandomForest => {
                Classifier::RandomForest(RandomForest::new(config.forest.clone(), config.seed))
            }
            ModelVariant::LogisticRegression => {
                Classifier::LogisticRegression(LogisticRegression::new(config.logistic.clone()))
            }
        }
    }

    pub fn variant(&self) -> ModelVariant {
        match self {
            Classifier::RandomForest(_) => ModelVariant::RandomForest,
            Classifier::LogisticRegression(_) => ModelVariant::LogisticRegression,
        }
    }

    pub fn fit(&mut self, x: ArrayView2<f64>, y: &[u8]) {
        match self {
            Classifier::RandomForest(m) => m.fit(x, y),
            Classifier::LogisticRegression(m) => m.fit(x, y),
        }
    }

    /// Probability of the positive (at-risk) class.
    pub fn predict_proba(&self, row: &[f64]) -> f64 {
        match self {
            Classifier::RandomForest(m) => m.predict_proba(row),
            Classifier::LogisticRegression(m) => m.predict_proba(row),
        }
    }

    /// 1 when the positive class is strictly more probable.
    pub fn predict(&self, row: &[f64]) -> u8 {
        let p = self.predict_proba(row);
        u8::from(p > 1.0 - p)
    }

    pub fn predict_matrix(&self, x: ArrayView2<f64>) -> Vec<u8> {
        x.rows()
            .into_iter()
            .map(|row| match row.as_slice() {
                Some(r) => self.predict(r),
                None => self.predict(&row.to_vec()),
            })
            .collect()
    }
}

/// `n / (2 · n_c)` per class, indexed by label; a class absent from `y` gets weight 0.
pub(crate) fn balanced_class_weights(y: &[u8]) -> [f64; 2] {
    let positive = y.iter().filter(|&&l| l > 0).count();
    let counts = [y.len() - positive, positive];
    counts.map(|c| {
        if c == 0 {
            0.0
        } else {
            y.len() as f64 / (2.0 * c as f64)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn balanced_weights() {
        assert_eq!(balanced_class_weights(&[0, 0, 0, 1]), [4.0 / 6.0, 2.0]);
        assert_eq!(balanced_class_weights(&[1, 1]), [0.0, 1.0]);
    }

    #[test]
    fn variant_parse_roundtrip() {
        for v in [ModelVariant::RandomForest, ModelVariant::LogisticRegression] {
            assert_eq!(v.as_str().parse::<ModelVariant>(), Ok(v));
        }
        assert!("svm".parse::<ModelVariant>().is_err());
    }
}
