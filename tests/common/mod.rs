//! Seeded synthetic data shared by the integration tests.
#![allow(dead_code)]

use cvd_risk::config::ModelConfig;
use cvd_risk::data::{EnvironmentRow, EnvironmentTable};
use cvd_risk::features::{LabeledTable, RawRecord};
use cvd_risk::service::AssessmentRequest;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::fmt::Write as _;
use std::path::Path;

pub const BOROUGHS: [(&str, f64, f64); 6] = [
    ("Camden", 14.2, 48.5),
    ("Westminster", 16.8, 55.1),
    ("Hackney", 13.5, 44.0),
    ("Sutton", 8.9, 24.3),
    ("Richmond upon Thames", 7.6, 21.8),
    ("Croydon", 10.4, 33.2),
];

pub fn environment_rows() -> Vec<EnvironmentRow> {
    BOROUGHS
        .iter()
        .enumerate()
        .map(|(i, &(borough, pm25, no2))| EnvironmentRow {
            borough: borough.to_string(),
            avg_pm25: pm25,
            avg_no2: no2,
            noise_level_db: 55.0 + i as f64 * 2.0,
            green_space_percent: 45.0 - i as f64 * 4.0,
            walkability_score: 60.0 + i as f64 * 3.0,
            urban_heat_increase: 1.0 + i as f64 * 0.2,
        })
        .collect()
}

pub fn environment() -> EnvironmentTable {
    EnvironmentTable::new(environment_rows()).unwrap()
}

fn pick<'a>(rng: &mut ChaCha8Rng, options: &[&'a str]) -> &'a str {
    options.choose(rng).copied().unwrap()
}

/// `n` complete records whose label follows age, smoking, blood pressure and diabetes plus noise.
pub fn synthetic_table(n: usize, seed: u64) -> LabeledTable {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let env = environment();
    let mut table = LabeledTable::default();
    for _ in 0..n {
        let (borough, _, _) = BOROUGHS[rng.gen_range(0..BOROUGHS.len())];
        let age: u32 = rng.gen_range(30..80);
        let smoker = pick(&mut rng, &["Yes", "No"]);
        let diabetes = pick(&mut rng, &["Yes", "No"]);
        let systolic: f64 = rng.gen_range(100.0..170.0);
        let mut record = RawRecord {
            age: Some(age),
            gender: Some(pick(&mut rng, &["Male", "Female"]).to_string()),
            smoker: Some(smoker.to_string()),
            family_history_cvd: Some(pick(&mut rng, &["Yes", "No"]).to_string()),
            diabetes: Some(diabetes.to_string()),
            high_blood_pressure: Some(if systolic > 140.0 { "Yes" } else { "No" }.to_string()),
            physical_activity_level: Some(pick(&mut rng, &["Low", "Moderate", "High"]).to_string()),
            alcohol_consumption: Some(
                pick(&mut rng, &["None", "Low", "Moderate", "High"]).to_string(),
            ),
            stress_level: Some(pick(&mut rng, &["Low", "Moderate", "High"]).to_string()),
            borough: Some(borough.to_string()),
            bmi: Some(rng.gen_range(18.0..38.0)),
            total_cholesterol: Some(rng.gen_range(3.5..7.5)),
            systolic_bp: Some(systolic),
            diastolic_bp: Some(rng.gen_range(60.0..100.0)),
            sleep_hours: Some(rng.gen_range(5.0..9.0)),
            ..RawRecord::default()
        };
        env.lookup(borough).apply_to(&mut record);

        let score = (age as f64 - 55.0) / 10.0
            + if smoker == "Yes" { 1.0 } else { 0.0 }
            + if diabetes == "Yes" { 0.8 } else { 0.0 }
            + (systolic - 135.0) / 15.0
            + rng.gen_range(-1.0..1.0);
        table.push(record, u8::from(score > 0.4));
    }
    table
}

/// Small forest and a short logistic run so tests stay quick.
pub fn small_config() -> ModelConfig {
    let mut config = ModelConfig::default();
    config.forest.n_trees = 15;
    config.forest.max_depth = 8;
    config.logistic.max_iter = 300;
    config.cv_folds = 3;
    config
}

pub fn request(borough: &str) -> AssessmentRequest {
    AssessmentRequest {
        age: Some(62),
        gender: Some("Male".to_string()),
        smoker: Some("Yes".to_string()),
        family_history: Some("Yes".to_string()),
        diabetes: Some("No".to_string()),
        high_bp: Some("Yes".to_string()),
        activity: Some("Low".to_string()),
        bmi: Some(31.0),
        cholesterol: Some(6.4),
        systolic_bp: Some(152.0),
        diastolic_bp: Some(94.0),
        alcohol: Some("Moderate".to_string()),
        stress: Some("High".to_string()),
        sleep_hours: Some(6.0),
        borough: Some(borough.to_string()),
    }
}

fn opt<T: ToString>(v: &Option<T>) -> String {
    v.as_ref().map(|v| v.to_string()).unwrap_or_default()
}

/// Health CSV with the dataset's column names; environmental columns are left to the join.
pub fn write_health_csv(path: &Path, table: &LabeledTable) {
    let mut out = String::from(
        "Age,Gender,Smoker,FamilyHistoryCVD,Diabetes,HighBloodPressure,PhysicalActivityLevel,\
         AlcoholConsumption,StressLevel,Borough,BMI,TotalCholesterol,SystolicBP,DiastolicBP,\
         SleepHours,CVD_Risk\n",
    );
    for (r, label) in table.records.iter().zip(&table.labels) {
        writeln!(
            out,
            "{},{},{},{},{},{},{},{},{},{},{},{},{},{},{},{}",
            opt(&r.age),
            opt(&r.gender),
            opt(&r.smoker),
            opt(&r.family_history_cvd),
            opt(&r.diabetes),
            opt(&r.high_blood_pressure),
            opt(&r.physical_activity_level),
            opt(&r.alcohol_consumption),
            opt(&r.stress_level),
            opt(&r.borough),
            opt(&r.bmi),
            opt(&r.total_cholesterol),
            opt(&r.systolic_bp),
            opt(&r.diastolic_bp),
            opt(&r.sleep_hours),
            label
        )
        .unwrap();
    }
    std::fs::write(path, out).unwrap();
}

pub fn write_environment_csv(path: &Path) {
    let mut writer = csv::Writer::from_path(path).unwrap();
    for row in environment_rows() {
        writer.serialize(row).unwrap();
    }
    writer.flush().unwrap();
}
