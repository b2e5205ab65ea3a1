//! Seeded synthetic survey and environmental datasets, written in the layout the loader reads.

use super::{DataError, EnvironmentRow, LONDON_BOROUGHS};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::info;

/// Label is 1 when the noisy risk score exceeds this.
const RISK_SCORE_CUTOFF: f64 = 0.3;

/// One generated survey row, columns in the order the health CSV is written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthRow {
    #[serde(rename = "Age")]
    pub age: u32,
    #[serde(rename = "Gender")]
    pub gender: String,
    #[serde(rename = "Smoker")]
    pub smoker: String,
    #[serde(rename = "FamilyHistoryCVD")]
    pub family_history_cvd: String,
    #[serde(rename = "Diabetes")]
    pub diabetes: String,
    #[serde(rename = "HighBloodPressure")]
    pub high_blood_pressure: String,
    #[serde(rename = "BMI")]
    pub bmi: f64,
    #[serde(rename = "TotalCholesterol")]
    pub total_cholesterol: f64,
    #[serde(rename = "SystolicBP")]
    pub systolic_bp: f64,
    #[serde(rename = "DiastolicBP")]
    pub diastolic_bp: f64,
    #[serde(rename = "PhysicalActivityLevel")]
    pub physical_activity_level: String,
    #[serde(rename = "AlcoholConsumption")]
    pub alcohol_consumption: String,
    #[serde(rename = "StressLevel")]
    pub stress_level: String,
    #[serde(rename = "SleepHours")]
    pub sleep_hours: f64,
    #[serde(rename = "Borough")]
    pub borough: String,
    #[serde(rename = "CVD_Risk")]
    pub cvd_risk: u8,
}

/// Row counts of one `write` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedSummary {
    pub health_rows: usize,
    pub environment_rows: usize,
    pub positive: usize,
}

fn normal(rng: &mut ChaCha8Rng, mean: f64, std_dev: f64) -> f64 {
    Normal::new(mean, std_dev).map_or(mean, |d| d.sample(rng))
}

fn weighted<'a>(rng: &mut ChaCha8Rng, options: &[(&'a str, f64)]) -> &'a str {
    options
        .choose_weighted(rng, |o| o.1)
        .map_or(options[0].0, |o| o.0)
}

fn yes_no(rng: &mut ChaCha8Rng, p_yes: f64) -> &'static str {
    weighted(rng, &[("Yes", p_yes), ("No", 1.0 - p_yes)])
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}

/// Generates both CSVs from one seed. The environmental table draws from its own stream
/// so changing the record count does not change the boroughs' readings.
#[derive(Debug, Clone, Copy)]
pub struct SyntheticDataset {
    seed: u64,
}

impl SyntheticDataset {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// `n` survey rows. Conditions become likelier with age, and the label is a thresholded
    /// additive risk score with Gaussian noise.
    pub fn health_rows(&self, n: usize) -> Vec<HealthRow> {
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        (0..n).map(|_| Self::health_row(&mut rng)).collect()
    }

    fn health_row(rng: &mut ChaCha8Rng) -> HealthRow {
        let age: u32 = rng.gen_range(18..85);
        let gender = weighted(rng, &[("Male", 0.5), ("Female", 0.5)]);
        let age_factor: f64 = if age < 45 {
            1.0
        } else if age < 65 {
            1.2
        } else {
            1.5
        };

        let smoker = yes_no(rng, 0.2);
        let family_history = yes_no(rng, 0.3);
        let diabetes = yes_no(rng, (0.15 * age_factor).min(0.4));
        let hypertension = yes_no(rng, (0.2 * age_factor).min(0.5));

        let bmi = normal(rng, 26.0, 4.0).clamp(18.0, 45.0);
        let cholesterol = normal(rng, 200.0, 40.0).clamp(120.0, 350.0);
        let systolic = normal(rng, 130.0, 20.0).clamp(90.0, 200.0);
        let diastolic = normal(rng, 80.0, 15.0).clamp(60.0, 120.0);

        let activity_weights = if age < 50 {
            [0.2, 0.5, 0.3]
        } else {
            [0.4, 0.4, 0.2]
        };
        let activity = weighted(
            rng,
            &[
                ("Low", activity_weights[0]),
                ("Moderate", activity_weights[1]),
                ("High", activity_weights[2]),
            ],
        );
        let alcohol = weighted(
            rng,
            &[("None", 0.2), ("Light", 0.4), ("Moderate", 0.3), ("Heavy", 0.1)],
        );
        let stress = weighted(rng, &[("Low", 0.3), ("Moderate", 0.5), ("High", 0.2)]);
        let sleep = normal(rng, 7.0, 1.5).clamp(4.0, 12.0);
        let borough = LONDON_BOROUGHS.choose(rng).copied().unwrap_or(LONDON_BOROUGHS[0]);

        let flag = |value: &str, expected: &str, weight: f64| {
            if value == expected {
                weight
            } else {
                0.0
            }
        };
        let mut score = 0.02 * f64::from(age - 18);
        score += flag(smoker, "Yes", 0.15);
        score += flag(family_history, "Yes", 0.1);
        score += flag(diabetes, "Yes", 0.12);
        score += flag(hypertension, "Yes", 0.1);
        score += ((bmi - 25.0) * 0.02).max(0.0);
        score += ((cholesterol - 200.0) * 0.001).max(0.0);
        score += ((systolic - 120.0) * 0.002).max(0.0);
        score -= flag(activity, "High", 0.05);
        score += flag(alcohol, "Heavy", 0.05);
        score += flag(stress, "High", 0.03);
        score -= ((sleep - 6.0) * 0.01).max(0.0);
        score += normal(rng, 0.0, 0.1);

        HealthRow {
            age,
            gender: gender.to_string(),
            smoker: smoker.to_string(),
            family_history_cvd: family_history.to_string(),
            diabetes: diabetes.to_string(),
            high_blood_pressure: hypertension.to_string(),
            bmi: round_to(bmi, 1),
            total_cholesterol: round_to(cholesterol, 0),
            systolic_bp: round_to(systolic, 0),
            diastolic_bp: round_to(diastolic, 0),
            physical_activity_level: activity.to_string(),
            alcohol_consumption: alcohol.to_string(),
            stress_level: stress.to_string(),
            sleep_hours: round_to(sleep, 1),
            borough: borough.to_string(),
            cvd_risk: u8::from(score > RISK_SCORE_CUTOFF),
        }
    }

    /// One row per London borough. Pollution shares a per-borough seasonal factor.
    pub fn environment_rows(&self) -> Vec<EnvironmentRow> {
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed.wrapping_add(1));
        LONDON_BOROUGHS
            .iter()
            .map(|&borough| {
                let pm25 = normal(&mut rng, 12.0, 3.0);
                let no2 = normal(&mut rng, 45.0, 10.0);
                let seasonal: f64 = rng.gen_range(0.8..1.2);
                EnvironmentRow {
                    borough: borough.to_string(),
                    avg_pm25: round_to((pm25 * seasonal).max(5.0), 1),
                    avg_no2: round_to((no2 * seasonal).max(20.0), 1),
                    noise_level_db: round_to(normal(&mut rng, 55.0, 8.0), 1),
                    green_space_percent: round_to(rng.gen_range(10.0..40.0), 1),
                    walkability_score: round_to(rng.gen_range(30.0..90.0), 1),
                    urban_heat_increase: round_to(rng.gen_range(1.0..4.0), 1),
                }
            })
            .collect()
    }

    /// Write `records` survey rows to `health_path` and the borough table to `environment_path`,
    /// creating parent directories as needed.
    pub fn write(
        &self,
        records: usize,
        health_path: &Path,
        environment_path: &Path,
    ) -> Result<GeneratedSummary, DataError> {
        let health = self.health_rows(records);
        let environment = self.environment_rows();
        write_csv(health_path, &health)?;
        write_csv(environment_path, &environment)?;

        let summary = GeneratedSummary {
            health_rows: health.len(),
            environment_rows: environment.len(),
            positive: health.iter().filter(|r| r.cvd_risk > 0).count(),
        };
        info!(
            health_rows = summary.health_rows,
            positive = summary.positive,
            environment_rows = summary.environment_rows,
            health = %health_path.display(),
            environment = %environment_path.display(),
            "synthetic datasets written"
        );
        Ok(summary)
    }
}

fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> Result<(), DataError> {
    let io_err = |source| DataError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    let csv_err = |source| DataError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let mut writer = csv::Writer::from_path(path).map_err(csv_err)?;
    for row in rows {
        writer.serialize(row).map_err(csv_err)?;
    }
    writer.flush().map_err(io_err)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_rows() {
        let a = SyntheticDataset::new(42);
        let b = SyntheticDataset::new(42);
        assert_eq!(a.health_rows(50), b.health_rows(50));
        assert_eq!(a.environment_rows(), b.environment_rows());
        assert_ne!(a.health_rows(50), SyntheticDataset::new(7).health_rows(50));
    }

    #[test]
    fn environment_independent_of_record_count() {
        let data = SyntheticDataset::new(3);
        let before = data.environment_rows();
        let _ = data.health_rows(500);
        assert_eq!(before, data.environment_rows());
        assert_eq!(before.len(), LONDON_BOROUGHS.len());
    }

    #[test]
    fn draws_respect_clamps() {
        for row in SyntheticDataset::new(11).health_rows(400) {
            assert!((18..85).contains(&row.age));
            assert!((18.0..=45.0).contains(&row.bmi));
            assert!((120.0..=350.0).contains(&row.total_cholesterol));
            assert!((90.0..=200.0).contains(&row.systolic_bp));
            assert!((60.0..=120.0).contains(&row.diastolic_bp));
            assert!((4.0..=12.0).contains(&row.sleep_hours));
            assert!(LONDON_BOROUGHS.contains(&row.borough.as_str()));
        }
        for row in SyntheticDataset::new(11).environment_rows() {
            assert!(row.avg_pm25 >= 5.0);
            assert!(row.avg_no2 >= 20.0);
            assert!((1.0..=4.0).contains(&row.urban_heat_increase));
        }
    }

    #[test]
    fn both_labels_occur() {
        let rows = SyntheticDataset::new(42).health_rows(300);
        let positive = rows.iter().filter(|r| r.cvd_risk == 1).count();
        assert!(positive > 0 && positive < rows.len(), "{positive}/300 positive");
    }
}
