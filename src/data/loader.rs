use super::{DataError, DatasetSource, EnvironmentTable};
use crate::config::DataConfig;
use crate::features::{LabeledTable, RawRecord};
use csv::{Reader, ReaderBuilder, StringRecord, Trim};
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

pub const LABEL_COLUMN: &str = "CVD_Risk";

pub(super) fn csv_reader(path: &Path) -> Result<Reader<File>, DataError> {
    let file = File::open(path).map_err(|source| DataError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(ReaderBuilder::new().trim(Trim::All).from_reader(file))
}

/// Health survey CSV left-joined with the environmental CSV on `Borough`.
#[derive(Debug, Clone)]
pub struct CsvDatasetLoader {
    health_path: PathBuf,
    environment_path: PathBuf,
}

impl CsvDatasetLoader {
    pub fn new(health_path: impl Into<PathBuf>, environment_path: impl Into<PathBuf>) -> Self {
        Self {
            health_path: health_path.into(),
            environment_path: environment_path.into(),
        }
    }

    pub fn from_config(config: &DataConfig) -> Self {
        Self::new(&config.health_csv, &config.environment_csv)
    }

    fn read_health(&self) -> Result<LabeledTable, DataError> {
        let path = self.health_path.as_path();
        let csv_err = |source| DataError::Csv {
            path: path.to_path_buf(),
            source,
        };
        let mut reader = csv_reader(path)?;
        let headers = reader.headers().map_err(csv_err)?.clone();
        let label_idx = headers
            .iter()
            .position(|h| h == LABEL_COLUMN)
            .ok_or_else(|| DataError::MissingColumn {
                path: path.to_path_buf(),
                column: LABEL_COLUMN,
            })?;

        let mut table = LabeledTable::default();
        for row in reader.records() {
            let row = row.map_err(csv_err)?;
            let record: RawRecord = row.deserialize(Some(&headers)).map_err(csv_err)?;
            let label = parse_label(path, &row, label_idx)?;
            table.push(record, label);
        }
        if table.is_empty() {
            return Err(DataError::Empty {
                path: path.to_path_buf(),
            });
        }
        Ok(table)
    }
}

fn parse_label(path: &Path, row: &StringRecord, idx: usize) -> Result<u8, DataError> {
    let value = row.get(idx).unwrap_or_default();
    match value.parse::<f64>() {
        Ok(v) if v == 0.0 => Ok(0),
        Ok(v) if v == 1.0 => Ok(1),
        _ => Err(DataError::InvalidLabel {
            path: path.to_path_buf(),
            line: row.position().map_or(0, |p| p.line()),
            value: value.to_string(),
        }),
    }
}

impl DatasetSource for CsvDatasetLoader {
    fn load(&self) -> Result<LabeledTable, DataError> {
        let mut table = self.read_health()?;
        let environment = EnvironmentTable::load(&self.environment_path)?;

        let mut unmatched = 0usize;
        for record in &mut table.records {
            match record.borough.as_deref().and_then(|b| environment.get(b)) {
                Some(readings) => readings.apply_to(record),
                None => {
                    unmatched += 1;
                    debug!(borough = ?record.borough, "no environmental row for borough");
                }
            }
        }
        if unmatched > 0 {
            warn!(unmatched, "health rows without environmental data");
        }

        let (negative, positive) = table.class_counts();
        info!(
            rows = table.len(),
            negative,
            positive,
            boroughs = environment.len(),
            health = %self.health_path.display(),
            "dataset loaded"
        );
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const ENV: &str = "Borough,Avg_PM25,Avg_NO2,NoiseLevel_dB,GreenSpacePercent,WalkabilityScore,UrbanHeatIncrease\n\
        Camden,14.2,48.0,65.0,25.0,80.0,2.1\n\
        Sutton,8.1,24.0,55.0,40.0,60.0,1.0\n";

    const HEALTH: &str = "Age,Gender,Smoker,FamilyHistoryCVD,Diabetes,HighBloodPressure,PhysicalActivityLevel,BMI,TotalCholesterol,SystolicBP,DiastolicBP,AlcoholConsumption,StressLevel,SleepHours,Borough,CVD_Risk\n\
        54,Male,Yes,No,No,Yes,Low,29.5,6.1,145,92,Moderate,High,6.0,Camden,1\n\
        31,Female,No,No,No,No,High,22.0,4.5,118,76,Low,Low,7.5,Sutton,0\n\
        47,Female,No,Yes,No,No,Moderate,,5.2,130,84,None,Moderate,7.0,Atlantis,0\n";

    fn write(dir: &Path, name: &str, body: &str) -> PathBuf {
        let path = dir.join(name);
        let mut f = File::create(&path).unwrap();
        f.write_all(body.as_bytes()).unwrap();
        path
    }

    #[test]
    fn left_join_on_borough() {
        let dir = tempfile::tempdir().unwrap();
        let loader = CsvDatasetLoader::new(
            write(dir.path(), "health.csv", HEALTH),
            write(dir.path(), "env.csv", ENV),
        );
        let table = loader.load().unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.labels, vec![1, 0, 0]);
        assert_eq!(table.records[0].avg_pm25, Some(14.2));
        assert_eq!(table.records[1].avg_no2, Some(24.0));
        assert_eq!(table.records[2].avg_pm25, None);
        assert_eq!(table.records[2].bmi, None);
        assert_eq!(table.records[0].age, Some(54));
    }

    #[test]
    fn missing_label_column() {
        let dir = tempfile::tempdir().unwrap();
        let loader = CsvDatasetLoader::new(
            write(dir.path(), "health.csv", "Age,Borough\n40,Camden\n"),
            write(dir.path(), "env.csv", ENV),
        );
        assert!(matches!(
            loader.load(),
            Err(DataError::MissingColumn { column: LABEL_COLUMN, .. })
        ));
    }

    #[test]
    fn bad_label_reports_line() {
        let dir = tempfile::tempdir().unwrap();
        let loader = CsvDatasetLoader::new(
            write(dir.path(), "health.csv", "Age,Borough,CVD_Risk\n40,Camden,1\n41,Camden,yes\n"),
            write(dir.path(), "env.csv", ENV),
        );
        match loader.load() {
            Err(DataError::InvalidLabel { line, value, .. }) => {
                assert_eq!(line, 3);
                assert_eq!(value, "yes");
            }
            other => panic!("expected InvalidLabel, got {other:?}"),
        }
    }

    #[test]
    fn float_ages_load_as_whole_years() {
        let dir = tempfile::tempdir().unwrap();
        let health = "Age,Borough,CVD_Risk\n54.0,Camden,1\n,Sutton,0\n31,Sutton,0\n";
        let loader = CsvDatasetLoader::new(
            write(dir.path(), "health.csv", health),
            write(dir.path(), "env.csv", ENV),
        );
        let table = loader.load().unwrap();
        let ages: Vec<Option<u32>> = table.records.iter().map(|r| r.age).collect();
        assert_eq!(ages, vec![Some(54), None, Some(31)]);

        let loader = CsvDatasetLoader::new(
            write(dir.path(), "bad.csv", "Age,Borough,CVD_Risk\n54.5,Camden,1\n"),
            write(dir.path(), "env.csv", ENV),
        );
        assert!(matches!(loader.load(), Err(DataError::Csv { .. })));
    }

    #[test]
    fn missing_file_is_io_error() {
        let loader = CsvDatasetLoader::new("/nonexistent/health.csv", "/nonexistent/env.csv");
        assert!(matches!(loader.load(), Err(DataError::Io { .. })));
    }
}
