//! Risk model service: owns one classifier and the feature pipeline its training matrix came from.
//!
//! Lifecycle: `Uninitialized → Trained` via [`RiskModel::train`] or `Uninitialized → Restored`
//! via [`RiskModel::restore`]. Prediction takes `&self`; training and restoring take `&mut self`,
//! so a model shared read-only (e.g. in an `Arc`) cannot be retrained underneath its readers.

use super::artifact;
use super::evaluation::{accuracy, mean_std, stratified_k_fold, stratified_split, ClassificationReport, Split};
use super::{Classifier, ModelError, ModelVariant};
use crate::config::ModelConfig;
use crate::data::DatasetSource;
use crate::features::{FeaturePipeline, LabeledTable, RawRecord};
use crate::risk::RiskTier;
use crate::storage::{ArtifactError, ArtifactStore};
use ndarray::Axis;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelState {
    Uninitialized,
    Trained,
    Restored,
}

/// Classifier, pipeline and variant tag: persisted and restored only together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainedModel {
    pub variant: ModelVariant,
    pub classifier: Classifier,
    pub pipeline: FeaturePipeline,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    #[serde(rename = "risk_prediction")]
    pub class: u8,
    /// Positive-class probability
    #[serde(rename = "risk_probability")]
    pub probability: f64,
    #[serde(rename = "risk_level")]
    pub tier: RiskTier,
}

/// Training diagnostics; informational only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingReport {
    pub variant: ModelVariant,
    pub train_rows: usize,
    pub test_rows: usize,
    pub test_accuracy: f64,
    pub report: ClassificationReport,
    pub cv_scores: Vec<f64>,
    pub cv_mean: f64,
    pub cv_std: f64,
}

pub struct RiskModel {
    config: ModelConfig,
    variant: ModelVariant,
    state: ModelState,
    trained: Option<TrainedModel>,
}

impl RiskModel {
    /// Uninitialized model of the configured variant.
    pub fn new(config: ModelConfig) -> Self {
        let variant = config.variant;
        Self::with_variant(config, variant)
    }

    pub fn with_variant(config: ModelConfig, variant: ModelVariant) -> Self {
        Self {
            config,
            variant,
            state: ModelState::Uninitialized,
            trained: None,
        }
    }

    pub fn state(&self) -> ModelState {
        self.state
    }

    pub fn is_ready(&self) -> bool {
        self.trained.is_some()
    }

    pub fn variant(&self) -> ModelVariant {
        self.variant
    }

    pub fn trained(&self) -> Option<&TrainedModel> {
        self.trained.as_ref()
    }

    pub fn pipeline(&self) -> Option<&FeaturePipeline> {
        self.trained.as_ref().map(|t| &t.pipeline)
    }

    /// Load the merged table from `source` and train on it.
    pub fn train(&mut self, source: &dyn DatasetSource) -> Result<TrainingReport, ModelError> {
        let table = source.load()?;
        self.train_on(&table)
    }

    /// Stratified split, pipeline fit on the training side only, classifier fit, diagnostics.
    pub fn train_on(&mut self, table: &LabeledTable) -> Result<TrainingReport, ModelError> {
        let (negative, positive) = table.class_counts();
        if negative == 0 || positive == 0 {
            return Err(ModelError::InsufficientData(format!(
                "need both classes, got {negative} negative and {positive} positive rows"
            )));
        }
        let split = self.split(table);
        if split.train.is_empty() || split.test.is_empty() {
            return Err(ModelError::InsufficientData(format!(
                "{} rows cannot be split {:.0}/{:.0}",
                table.len(),
                (1.0 - self.config.test_ratio) * 100.0,
                self.config.test_ratio * 100.0
            )));
        }

        let mut pipeline = FeaturePipeline::new();
        let (x_train, y_train) = pipeline.fit_transform(&table.subset(&split.train))?;
        let mut classifier = Classifier::new(self.variant, &self.config);
        classifier.fit(x_train.view(), &y_train);

        let (x_test, y_test) = pipeline.transform_table(&table.subset(&split.test))?;
        let y_pred = classifier.predict_matrix(x_test.view());
        let report = ClassificationReport::new(&y_test, &y_pred);

        let cv_scores = self.cross_validate(&pipeline, table)?;
        let (cv_mean, cv_std) = mean_std(&cv_scores);

        info!(
            variant = %self.variant,
            train_rows = split.train.len(),
            test_rows = split.test.len(),
            test_accuracy = report.accuracy,
            cv_mean,
            cv_std,
            "model trained"
        );

        let training = TrainingReport {
            variant: self.variant,
            train_rows: split.train.len(),
            test_rows: split.test.len(),
            test_accuracy: report.accuracy,
            report,
            cv_scores,
            cv_mean,
            cv_std,
        };
        self.trained = Some(TrainedModel {
            variant: self.variant,
            classifier,
            pipeline,
        });
        self.state = ModelState::Trained;
        Ok(training)
    }

    /// The train/test membership `train_on` uses for `table`.
    pub fn split(&self, table: &LabeledTable) -> Split {
        stratified_split(&table.labels, self.config.test_ratio, self.config.seed)
    }

    /// Accuracy per stratified fold over the whole table, replayed through the fitted pipeline.
    /// Empty when either class has fewer than `cv_folds` rows.
    fn cross_validate(
        &self,
        pipeline: &FeaturePipeline,
        table: &LabeledTable,
    ) -> Result<Vec<f64>, ModelError> {
        let k = self.config.cv_folds;
        let (negative, positive) = table.class_counts();
        // Every fold needs at least one row of each class on its test side.
        if k < 2 || negative.min(positive) < k {
            warn!(folds = k, negative, positive, "cross-validation skipped");
            return Ok(Vec::new());
        }
        let (x, y) = pipeline.transform_table(table)?;
        let scores = stratified_k_fold(&y, k)
            .iter()
            .map(|fold| {
                let x_train = x.select(Axis(0), &fold.train);
                let y_train: Vec<u8> = fold.train.iter().map(|&i| y[i]).collect();
                let x_test = x.select(Axis(0), &fold.test);
                let y_test: Vec<u8> = fold.test.iter().map(|&i| y[i]).collect();

                let mut classifier = Classifier::new(self.variant, &self.config);
                classifier.fit(x_train.view(), &y_train);
                accuracy(&y_test, &classifier.predict_matrix(x_test.view()))
            })
            .collect();
        Ok(scores)
    }

    pub fn predict(&self, record: &RawRecord) -> Result<Prediction, ModelError> {
        let model = self.trained.as_ref().ok_or(ModelError::NotReady)?;
        let features = model.pipeline.transform(record)?;
        let probability = model.classifier.predict_proba(features.as_slice());
        Ok(Prediction {
            class: u8::from(probability > 1.0 - probability),
            probability,
            tier: RiskTier::from_probability(probability),
        })
    }

    /// Write classifier, pipeline and variant to `store` as one artifact.
    pub fn persist(&self, store: &dyn ArtifactStore, name: &str) -> Result<(), ModelError> {
        let model = self.trained.as_ref().ok_or(ModelError::NotReady)?;
        let bytes = artifact::seal(model)?;
        store.write(name, &bytes)?;
        info!(name, variant = %model.variant, bytes = bytes.len(), "model artifact saved");
        Ok(())
    }

    /// Replace the current state with the artifact `name`. On error the model is left untouched
    /// and the caller decides whether to retrain.
    pub fn restore(&mut self, store: &dyn ArtifactStore, name: &str) -> Result<(), ArtifactError> {
        let bytes = store
            .read(name)?
            .ok_or_else(|| ArtifactError::NotFound(name.to_string()))?;
        let (envelope, model) = artifact::open(name, &bytes)?;
        info!(
            name,
            variant = %model.variant,
            created_at = %envelope.created_at,
            "model artifact loaded"
        );
        self.variant = model.variant;
        self.trained = Some(model);
        self.state = ModelState::Restored;
        Ok(())
    }
}

/// Train every candidate on the same table; keep the one with strictly higher held-out accuracy.
pub fn select_best(
    config: &ModelConfig,
    candidates: &[ModelVariant],
    source: &dyn DatasetSource,
) -> Result<(RiskModel, Vec<TrainingReport>), ModelError> {
    let table = source.load()?;
    let mut best: Option<(RiskModel, f64)> = None;
    let mut reports = Vec::with_capacity(candidates.len());

    for &variant in candidates {
        let mut model = RiskModel::with_variant(config.clone(), variant);
        match model.train_on(&table) {
            Ok(report) => {
                let score = report.test_accuracy;
                reports.push(report);
                if best.as_ref().map_or(true, |(_, b)| score > *b) {
                    best = Some((model, score));
                }
            }
            Err(e) => warn!(%variant, error = %e, "candidate training failed"),
        }
    }

    let (model, score) = best.ok_or_else(|| {
        ModelError::InsufficientData("no candidate model could be trained".to_string())
    })?;
    info!(variant = %model.variant(), test_accuracy = score, "best model selected");
    Ok((model, reports))
}
