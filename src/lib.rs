//! CVD risk estimator: cardiovascular-disease risk from health survey answers and
//! borough-level environmental readings.
//!
//! Modular structure:
//! - [`data`]: CSV loading, borough join, environmental lookup
//! - [`features`]: Categorical encoding, imputation and standardization pipeline
//! - [`model`]: Random forest / logistic regression, evaluation, the [`RiskModel`] service
//! - [`risk`]: Probability tiers and per-tier guidance
//! - [`storage`]: File and encrypted SQLite artifact stores
//! - [`advisor`]: Optional LLM advice with templated fallback
//! - [`service`]: Request assembly and assessment responses
//! - [`logging`]: Structured logging

pub mod advisor;
pub mod config;
pub mod data;
pub mod features;
pub mod logging;
pub mod model;
pub mod risk;
pub mod service;
pub mod storage;

pub use advisor::AdvisorClient;
pub use config::AppConfig;
pub use data::{CsvDatasetLoader, DatasetSource, EnvironmentTable};
pub use features::{FeaturePipeline, FeatureVector, RawRecord};
pub use logging::StructuredLogger;
pub use model::{ModelVariant, RiskModel};
pub use risk::RiskTier;
pub use service::{AssessmentRequest, Assessor};
pub use storage::{ArtifactStore, FileArtifactStore, SecureArtifactStore};
