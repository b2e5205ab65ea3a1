//! Raw subject records and labelled tables, keyed by the dataset's own column names.

use super::schema::{CategoricalColumn, NumericColumn};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

/// One subject as read from the merged dataset or assembled from a request.
/// Absent fields are `None`; the pipeline decides whether that is an error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    #[serde(rename = "Age", default, deserialize_with = "whole_years")]
    pub age: Option<u32>,
    #[serde(rename = "Gender")]
    pub gender: Option<String>,
    #[serde(rename = "Smoker")]
    pub smoker: Option<String>,
    #[serde(rename = "FamilyHistoryCVD")]
    pub family_history_cvd: Option<String>,
    #[serde(rename = "Diabetes")]
    pub diabetes: Option<String>,
    #[serde(rename = "HighBloodPressure")]
    pub high_blood_pressure: Option<String>,
    #[serde(rename = "PhysicalActivityLevel")]
    pub physical_activity_level: Option<String>,
    #[serde(rename = "AlcoholConsumption")]
    pub alcohol_consumption: Option<String>,
    #[serde(rename = "StressLevel")]
    pub stress_level: Option<String>,
    #[serde(rename = "Borough")]
    pub borough: Option<String>,
    #[serde(rename = "BMI")]
    pub bmi: Option<f64>,
    #[serde(rename = "TotalCholesterol")]
    pub total_cholesterol: Option<f64>,
    #[serde(rename = "SystolicBP")]
    pub systolic_bp: Option<f64>,
    #[serde(rename = "DiastolicBP")]
    pub diastolic_bp: Option<f64>,
    #[serde(rename = "SleepHours")]
    pub sleep_hours: Option<f64>,
    #[serde(rename = "Avg_PM25")]
    pub avg_pm25: Option<f64>,
    #[serde(rename = "Avg_NO2")]
    pub avg_no2: Option<f64>,
    #[serde(rename = "NoiseLevel_dB")]
    pub noise_level_db: Option<f64>,
    #[serde(rename = "GreenSpacePercent")]
    pub green_space_percent: Option<f64>,
    #[serde(rename = "WalkabilityScore")]
    pub walkability_score: Option<f64>,
    #[serde(rename = "UrbanHeatIncrease")]
    pub urban_heat_increase: Option<f64>,
}

/// Accepts `54` and `54.0`; a column with gaps comes back from pandas as floats.
fn whole_years<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u32>, D::Error> {
    Option::<f64>::deserialize(deserializer)?
        .map(|years| {
            if years.fract() == 0.0 && (0.0..=f64::from(u32::MAX)).contains(&years) {
                Ok(years as u32)
            } else {
                Err(D::Error::custom(format!(
                    "age `{years}` is not a whole number of years"
                )))
            }
        })
        .transpose()
}

impl RawRecord {
    pub fn categorical(&self, column: CategoricalColumn) -> Option<&str> {
        let value = match column {
            CategoricalColumn::Gender => &self.gender,
            CategoricalColumn::Smoker => &self.smoker,
            CategoricalColumn::FamilyHistoryCvd => &self.family_history_cvd,
            CategoricalColumn::Diabetes => &self.diabetes,
            CategoricalColumn::HighBloodPressure => &self.high_blood_pressure,
            CategoricalColumn::PhysicalActivityLevel => &self.physical_activity_level,
            CategoricalColumn::AlcoholConsumption => &self.alcohol_consumption,
            CategoricalColumn::StressLevel => &self.stress_level,
            CategoricalColumn::Borough => &self.borough,
        };
        value.as_deref()
    }

    pub fn numeric(&self, column: NumericColumn) -> Option<f64> {
        match column {
            NumericColumn::Age => self.age.map(f64::from),
            NumericColumn::Bmi => self.bmi,
            NumericColumn::TotalCholesterol => self.total_cholesterol,
            NumericColumn::SystolicBp => self.systolic_bp,
            NumericColumn::DiastolicBp => self.diastolic_bp,
            NumericColumn::SleepHours => self.sleep_hours,
            NumericColumn::AvgPm25 => self.avg_pm25,
            NumericColumn::AvgNo2 => self.avg_no2,
            NumericColumn::NoiseLevelDb => self.noise_level_db,
            NumericColumn::GreenSpacePercent => self.green_space_percent,
            NumericColumn::WalkabilityScore => self.walkability_score,
            NumericColumn::UrbanHeatIncrease => self.urban_heat_increase,
        }
    }
}

/// Records paired with their binary `CVD_Risk` labels.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LabeledTable {
    pub records: Vec<RawRecord>,
    pub labels: Vec<u8>,
}

impl LabeledTable {
    pub fn new(records: Vec<RawRecord>, labels: Vec<u8>) -> Self {
        Self { records, labels }
    }

    pub fn push(&mut self, record: RawRecord, label: u8) {
        self.records.push(record);
        self.labels.push(label);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Rows at `indices`, in the given order.
    pub fn subset(&self, indices: &[usize]) -> Self {
        Self {
            records: indices.iter().map(|&i| self.records[i].clone()).collect(),
            labels: indices.iter().map(|&i| self.labels[i]).collect(),
        }
    }

    /// Count of rows per label (negative, positive).
    pub fn class_counts(&self) -> (usize, usize) {
        let positive = self.labels.iter().filter(|&&l| l > 0).count();
        (self.labels.len() - positive, positive)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn age_accepts_integral_floats() {
        let r: RawRecord = serde_json::from_str(r#"{"Age": 54.0}"#).unwrap();
        assert_eq!(r.age, Some(54));
        let r: RawRecord = serde_json::from_str(r#"{"Age": 61}"#).unwrap();
        assert_eq!(r.age, Some(61));
        let r: RawRecord = serde_json::from_str(r#"{"Age": null}"#).unwrap();
        assert_eq!(r.age, None);
        let r: RawRecord = serde_json::from_str("{}").unwrap();
        assert_eq!(r.age, None);
    }

    #[test]
    fn fractional_or_negative_age_rejected() {
        assert!(serde_json::from_str::<RawRecord>(r#"{"Age": 54.5}"#).is_err());
        assert!(serde_json::from_str::<RawRecord>(r#"{"Age": -3}"#).is_err());
    }
}
