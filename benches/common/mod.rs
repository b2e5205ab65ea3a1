//! Seeded records for benchmarks.
#![allow(dead_code)]

use cvd_risk::config::ModelConfig;
use cvd_risk::features::{LabeledTable, RawRecord};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

const BOROUGHS: [&str; 5] = ["Camden", "Hackney", "Sutton", "Croydon", "Westminster"];
const LEVELS: [&str; 3] = ["Low", "Moderate", "High"];
const YES_NO: [&str; 2] = ["Yes", "No"];

fn pick(rng: &mut ChaCha8Rng, options: &[&str]) -> Option<String> {
    Some(options[rng.gen_range(0..options.len())].to_string())
}

pub fn table(n: usize, seed: u64) -> LabeledTable {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut table = LabeledTable::default();
    for _ in 0..n {
        let age: u32 = rng.gen_range(30..80);
        let systolic: f64 = rng.gen_range(100.0..170.0);
        let record = RawRecord {
            age: Some(age),
            gender: pick(&mut rng, &["Male", "Female"]),
            smoker: pick(&mut rng, &YES_NO),
            family_history_cvd: pick(&mut rng, &YES_NO),
            diabetes: pick(&mut rng, &YES_NO),
            high_blood_pressure: pick(&mut rng, &YES_NO),
            physical_activity_level: pick(&mut rng, &LEVELS),
            alcohol_consumption: pick(&mut rng, &LEVELS),
            stress_level: pick(&mut rng, &LEVELS),
            borough: pick(&mut rng, &BOROUGHS),
            bmi: Some(rng.gen_range(18.0..38.0)),
            total_cholesterol: Some(rng.gen_range(3.5..7.5)),
            systolic_bp: Some(systolic),
            diastolic_bp: Some(rng.gen_range(60.0..100.0)),
            sleep_hours: Some(rng.gen_range(5.0..9.0)),
            avg_pm25: Some(rng.gen_range(7.0..17.0)),
            avg_no2: Some(rng.gen_range(20.0..56.0)),
            noise_level_db: Some(rng.gen_range(50.0..70.0)),
            green_space_percent: Some(rng.gen_range(10.0..50.0)),
            walkability_score: Some(rng.gen_range(50.0..90.0)),
            urban_heat_increase: Some(rng.gen_range(0.5..3.0)),
        };
        let score = (age as f64 - 55.0) / 10.0 + (systolic - 135.0) / 15.0 + rng.gen_range(-1.0..1.0);
        table.push(record, u8::from(score > 0.0));
    }
    table
}

/// Default hyper-parameters without cross-validation.
pub fn config() -> ModelConfig {
    ModelConfig {
        cv_folds: 0,
        ..ModelConfig::default()
    }
}
