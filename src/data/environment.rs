//! Per-borough environmental readings and the lookup used when assembling a request.

use super::DataError;
use crate::features::RawRecord;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// The 33 London boroughs the survey covers (City of London included).
pub const LONDON_BOROUGHS: [&str; 33] = [
    "Camden",
    "Westminster",
    "Greenwich",
    "Hackney",
    "Tower Hamlets",
    "Southwark",
    "Lambeth",
    "Islington",
    "Kensington and Chelsea",
    "Hammersmith and Fulham",
    "Wandsworth",
    "Richmond upon Thames",
    "Kingston upon Thames",
    "Merton",
    "Sutton",
    "Croydon",
    "Bromley",
    "Lewisham",
    "Bexley",
    "Havering",
    "Barking and Dagenham",
    "Redbridge",
    "Newham",
    "Waltham Forest",
    "Haringey",
    "Enfield",
    "Barnet",
    "Harrow",
    "Hillingdon",
    "Ealing",
    "Hounslow",
    "Brent",
    "City of London",
];

/// Six environmental readings for one borough.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentReadings {
    #[serde(rename = "Avg_PM25")]
    pub avg_pm25: f64,
    #[serde(rename = "Avg_NO2")]
    pub avg_no2: f64,
    #[serde(rename = "NoiseLevel_dB")]
    pub noise_level_db: f64,
    #[serde(rename = "GreenSpacePercent")]
    pub green_space_percent: f64,
    #[serde(rename = "WalkabilityScore")]
    pub walkability_score: f64,
    #[serde(rename = "UrbanHeatIncrease")]
    pub urban_heat_increase: f64,
}

impl EnvironmentReadings {
    /// Fill the environmental fields of `record`.
    pub fn apply_to(&self, record: &mut RawRecord) {
        record.avg_pm25 = Some(self.avg_pm25);
        record.avg_no2 = Some(self.avg_no2);
        record.noise_level_db = Some(self.noise_level_db);
        record.green_space_percent = Some(self.green_space_percent);
        record.walkability_score = Some(self.walkability_score);
        record.urban_heat_increase = Some(self.urban_heat_increase);
    }
}

/// One row of the environmental CSV.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentRow {
    #[serde(rename = "Borough")]
    pub borough: String,
    #[serde(rename = "Avg_PM25")]
    pub avg_pm25: f64,
    #[serde(rename = "Avg_NO2")]
    pub avg_no2: f64,
    #[serde(rename = "NoiseLevel_dB")]
    pub noise_level_db: f64,
    #[serde(rename = "GreenSpacePercent")]
    pub green_space_percent: f64,
    #[serde(rename = "WalkabilityScore")]
    pub walkability_score: f64,
    #[serde(rename = "UrbanHeatIncrease")]
    pub urban_heat_increase: f64,
}

impl EnvironmentRow {
    pub fn readings(&self) -> EnvironmentReadings {
        EnvironmentReadings {
            avg_pm25: self.avg_pm25,
            avg_no2: self.avg_no2,
            noise_level_db: self.noise_level_db,
            green_space_percent: self.green_space_percent,
            walkability_score: self.walkability_score,
            urban_heat_increase: self.urban_heat_increase,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnvironmentTable {
    rows: Vec<(String, EnvironmentReadings)>,
    means: EnvironmentReadings,
}

impl EnvironmentTable {
    pub fn new(rows: Vec<EnvironmentRow>) -> Result<Self, DataError> {
        if rows.is_empty() {
            return Err(DataError::NoEnvironmentRows);
        }
        let rows: Vec<(String, EnvironmentReadings)> = rows
            .into_iter()
            .map(|r| {
                let readings = r.readings();
                (r.borough, readings)
            })
            .collect();
        let n = rows.len() as f64;
        let mean = |f: fn(&EnvironmentReadings) -> f64| {
            rows.iter().map(|(_, r)| f(r)).sum::<f64>() / n
        };
        let means = EnvironmentReadings {
            avg_pm25: mean(|r| r.avg_pm25),
            avg_no2: mean(|r| r.avg_no2),
            noise_level_db: mean(|r| r.noise_level_db),
            green_space_percent: mean(|r| r.green_space_percent),
            walkability_score: mean(|r| r.walkability_score),
            urban_heat_increase: mean(|r| r.urban_heat_increase),
        };
        Ok(Self { rows, means })
    }

    /// Read `Borough` plus the six reading columns from a headed CSV file.
    pub fn load(path: &Path) -> Result<Self, DataError> {
        let mut reader = super::loader::csv_reader(path)?;
        let rows = reader
            .deserialize::<EnvironmentRow>()
            .collect::<Result<Vec<_>, _>>()
            .map_err(|source| DataError::Csv {
                path: path.to_path_buf(),
                source,
            })?;
        Self::new(rows)
    }

    /// First row for `borough` (exact match).
    pub fn get(&self, borough: &str) -> Option<&EnvironmentReadings> {
        self.rows
            .iter()
            .find(|(name, _)| name == borough)
            .map(|(_, readings)| readings)
    }

    /// Readings for `borough`, or the table-wide mean of each reading when it is unknown.
    pub fn lookup(&self, borough: &str) -> EnvironmentReadings {
        self.get(borough).copied().unwrap_or(self.means)
    }

    pub fn means(&self) -> &EnvironmentReadings {
        &self.means
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
