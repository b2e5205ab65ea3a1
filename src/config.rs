//! Application configuration. Every section has defaults; a partial JSON file only overrides what it names.

use crate::model::ModelVariant;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Input CSV locations
    pub data: DataConfig,
    /// Classifier choice and hyper-parameters
    pub model: ModelConfig,
    /// Where the trained artifact lives
    pub artifact: ArtifactConfig,
    /// Optional LLM advice generator
    pub advisor: AdvisorConfig,
    /// Logging
    pub log: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub health_csv: PathBuf,
    pub environment_csv: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Variant trained by a plain `train`
    pub variant: ModelVariant,
    /// Variants compared by `train --select-best`, in order (ties keep the earlier one)
    pub candidates: Vec<ModelVariant>,
    /// Seed for the stratified split and the forest
    pub seed: u64,
    /// Held-out fraction (0.0–1.0)
    pub test_ratio: f64,
    /// Folds for cross-validated accuracy
    pub cv_folds: usize,
    pub forest: ForestConfig,
    pub logistic: LogisticConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForestConfig {
    pub n_trees: usize,
    pub max_depth: usize,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    /// Features tried per split; `None` means floor(sqrt(n_features))
    pub max_features: Option<usize>,
    pub bootstrap: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogisticConfig {
    /// Inverse L2 regularization strength
    pub c: f64,
    pub max_iter: usize,
    pub learning_rate: f64,
    pub tolerance: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactBackend {
    /// Plain JSON file in `dir`
    File,
    /// AES-GCM encrypted blob in a SQLite database in `dir`
    Encrypted,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtifactConfig {
    pub backend: ArtifactBackend,
    pub dir: PathBuf,
    /// Artifact name inside the store
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AdvisorConfig {
    pub enabled: bool,
    /// Base URL of an Ollama-compatible server
    pub endpoint: String,
    pub model: String,
    pub timeout_secs: u64,
    pub temperature: f32,
    pub top_p: f32,
    /// Upper bound on generated tokens
    pub max_tokens: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
    pub json: bool,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            health_csv: PathBuf::from("user_data/expanded_health_data.csv"),
            environment_csv: PathBuf::from("environmental_data/expanded_environmental_data.csv"),
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            variant: ModelVariant::RandomForest,
            candidates: vec![ModelVariant::RandomForest, ModelVariant::LogisticRegression],
            seed: 42,
            test_ratio: 0.2,
            cv_folds: 5,
            forest: ForestConfig::default(),
            logistic: LogisticConfig::default(),
        }
    }
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            n_trees: 200,
            max_depth: 15,
            min_samples_split: 3,
            min_samples_leaf: 2,
            max_features: None,
            bootstrap: true,
        }
    }
}

impl Default for LogisticConfig {
    fn default() -> Self {
        Self {
            c: 1.0,
            max_iter: 1000,
            learning_rate: 0.1,
            tolerance: 1e-6,
        }
    }
}

impl Default for ArtifactConfig {
    fn default() -> Self {
        Self {
            backend: ArtifactBackend::File,
            dir: PathBuf::from(".cvd"),
            name: "cvd_risk_model".to_string(),
        }
    }
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: "http://localhost:11434".to_string(),
            model: "llama3.2:3b".to_string(),
            timeout_secs: 15,
            temperature: 0.7,
            top_p: 0.9,
            max_tokens: 150,
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl AppConfig {
    /// Load from JSON file if present; otherwise return default
    pub fn load(path: &std::path::Path) -> Self {
        if path.exists() {
            if let Ok(data) = std::fs::read_to_string(path) {
                if let Ok(c) = serde_json::from_str::<AppConfig>(&data) {
                    return c;
                }
            }
        }
        Self::default()
    }
}
