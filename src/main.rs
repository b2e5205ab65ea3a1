//! `cvd-risk` entrypoint: generate synthetic data, train and persist a model, assess one request,
//! or list boroughs.

use clap::{Parser, Subcommand};
use cvd_risk::{
    advisor::AdvisorClient,
    config::AppConfig,
    data::{CsvDatasetLoader, EnvironmentTable, SyntheticDataset, LONDON_BOROUGHS},
    logging::StructuredLogger,
    model::{select_best, ModelVariant, RiskModel},
    service::{AssessmentRequest, AssessmentResponse, Assessor},
    storage::{open_store, ArtifactStore},
};
use std::io::Read;
use std::path::PathBuf;
use tracing::{info, warn};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Parser)]
#[command(name = "cvd-risk")]
#[command(about = "Cardiovascular risk estimation from health and environmental data", long_about = None)]
struct Cli {
    /// JSON config file (falls back to CVD_CONFIG_PATH, then config.json)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write seeded synthetic health and environmental CSVs to the configured paths
    Generate {
        /// Survey rows to generate
        #[arg(long, default_value_t = 1000)]
        records: usize,

        #[arg(long, default_value_t = 42)]
        seed: u64,
    },

    /// Train on the configured CSVs and persist the model artifact
    Train {
        /// Classifier to train (random_forest, logistic_regression)
        #[arg(long)]
        variant: Option<ModelVariant>,

        /// Train every configured candidate and keep the most accurate
        #[arg(long)]
        select_best: bool,
    },

    /// Assess one JSON request and print the response as a JSON line
    Assess {
        /// Request file, or `-` for stdin
        #[arg(short, long, default_value = "-")]
        input: String,
    },

    /// List the London boroughs the survey covers
    Boroughs,
}

fn artifact_secret() -> Vec<u8> {
    std::env::var("CVD_ARTIFACT_SECRET")
        .map(String::into_bytes)
        .unwrap_or_else(|_| b"cvd-artifact-secret-placeholder".to_vec()) // In production: from a secret manager
}

fn read_request(input: &str) -> Result<AssessmentRequest, BoxError> {
    let mut raw = String::new();
    if input == "-" {
        std::io::stdin().read_to_string(&mut raw)?;
    } else {
        raw = std::fs::read_to_string(input)?;
    }
    Ok(serde_json::from_str(&raw)?)
}

fn train(
    config: &AppConfig,
    store: &dyn ArtifactStore,
    variant: Option<ModelVariant>,
    select: bool,
) -> Result<(), BoxError> {
    let loader = CsvDatasetLoader::from_config(&config.data);
    let mut stdout = std::io::stdout().lock();

    let model = if select {
        let (model, reports) = select_best(&config.model, &config.model.candidates, &loader)?;
        for report in &reports {
            StructuredLogger::emit_json(report, &mut stdout)?;
        }
        model
    } else {
        let variant = variant.unwrap_or(config.model.variant);
        let mut model = RiskModel::with_variant(config.model.clone(), variant);
        let report = model.train(&loader)?;
        StructuredLogger::emit_json(&report, &mut stdout)?;
        model
    };
    model.persist(store, &config.artifact.name)?;
    Ok(())
}

fn assess(config: &AppConfig, store: &dyn ArtifactStore, input: &str) -> Result<bool, BoxError> {
    let environment = EnvironmentTable::load(&config.data.environment_csv)?;

    let mut model = RiskModel::new(config.model.clone());
    if let Err(e) = model.restore(store, &config.artifact.name) {
        warn!(error = %e, "no usable model artifact, retraining");
        model.train(&CsvDatasetLoader::from_config(&config.data))?;
        model.persist(store, &config.artifact.name)?;
    }

    let advisor = if config.advisor.enabled {
        AdvisorClient::new(&config.advisor)
    } else {
        None
    };

    let response = match read_request(input) {
        Ok(request) => Assessor::new(&model, &environment, advisor.as_ref()).respond(&request),
        Err(e) => AssessmentResponse::failed(format!("invalid request: {e}")),
    };
    StructuredLogger::emit_json(&response, &mut std::io::stdout().lock())?;
    Ok(response.success)
}

fn main() -> Result<(), BoxError> {
    let cli = Cli::parse();
    let config_path = cli
        .config
        .or_else(|| std::env::var("CVD_CONFIG_PATH").ok().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("config.json"));
    let config = AppConfig::load(&config_path);

    StructuredLogger::init(&config.log);
    info!(config = %config_path.display(), "cvd-risk starting");

    match cli.command {
        Commands::Generate { records, seed } => {
            let summary = SyntheticDataset::new(seed).write(
                records,
                &config.data.health_csv,
                &config.data.environment_csv,
            )?;
            StructuredLogger::emit_json(&summary, &mut std::io::stdout().lock())?;
        }
        Commands::Boroughs => {
            for borough in LONDON_BOROUGHS {
                println!("{borough}");
            }
        }
        Commands::Train {
            variant,
            select_best: select,
        } => {
            let store = open_store(&config.artifact, &artifact_secret())?;
            train(&config, store.as_ref(), variant, select)?;
        }
        Commands::Assess { input } => {
            let store = open_store(&config.artifact, &artifact_secret())?;
            if !assess(&config, store.as_ref(), &input)? {
                std::process::exit(1);
            }
        }
    }
    Ok(())
}
