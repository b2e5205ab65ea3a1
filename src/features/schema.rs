//! Column identifiers and the fixed feature order the classifier is trained against.

use serde::{Deserialize, Serialize};

/// Number of components in every encoded feature vector.
pub const FEATURE_DIM: usize = 21;

/// String used for an absent categorical value before encoding.
pub const MISSING_CATEGORY: &str = "nan";

/// Code substituted for a category that was not seen when the encoder was fit.
pub const UNSEEN_CATEGORY_CODE: usize = 0;

/// The nine label-encoded input columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CategoricalColumn {
    Gender,
    Smoker,
    FamilyHistoryCvd,
    Diabetes,
    HighBloodPressure,
    PhysicalActivityLevel,
    AlcoholConsumption,
    StressLevel,
    Borough,
}

impl CategoricalColumn {
    pub const COUNT: usize = 9;

    pub const ALL: [CategoricalColumn; Self::COUNT] = [
        CategoricalColumn::Gender,
        CategoricalColumn::Smoker,
        CategoricalColumn::FamilyHistoryCvd,
        CategoricalColumn::Diabetes,
        CategoricalColumn::HighBloodPressure,
        CategoricalColumn::PhysicalActivityLevel,
        CategoricalColumn::AlcoholConsumption,
        CategoricalColumn::StressLevel,
        CategoricalColumn::Borough,
    ];

    /// Position in [`Self::ALL`]; used to index per-column state.
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Raw field name as it appears in the dataset header and in JSON records.
    pub const fn name(self) -> &'static str {
        match self {
            CategoricalColumn::Gender => "Gender",
            CategoricalColumn::Smoker => "Smoker",
            CategoricalColumn::FamilyHistoryCvd => "FamilyHistoryCVD",
            CategoricalColumn::Diabetes => "Diabetes",
            CategoricalColumn::HighBloodPressure => "HighBloodPressure",
            CategoricalColumn::PhysicalActivityLevel => "PhysicalActivityLevel",
            CategoricalColumn::AlcoholConsumption => "AlcoholConsumption",
            CategoricalColumn::StressLevel => "StressLevel",
            CategoricalColumn::Borough => "Borough",
        }
    }

    /// Name of the derived feature column.
    pub const fn encoded_name(self) -> &'static str {
        match self {
            CategoricalColumn::Gender => "Gender_encoded",
            CategoricalColumn::Smoker => "Smoker_encoded",
            CategoricalColumn::FamilyHistoryCvd => "FamilyHistoryCVD_encoded",
            CategoricalColumn::Diabetes => "Diabetes_encoded",
            CategoricalColumn::HighBloodPressure => "HighBloodPressure_encoded",
            CategoricalColumn::PhysicalActivityLevel => "PhysicalActivityLevel_encoded",
            CategoricalColumn::AlcoholConsumption => "AlcoholConsumption_encoded",
            CategoricalColumn::StressLevel => "StressLevel_encoded",
            CategoricalColumn::Borough => "Borough_encoded",
        }
    }
}

/// Numeric input columns: age, five biometrics, six environmental readings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NumericColumn {
    Age,
    Bmi,
    TotalCholesterol,
    SystolicBp,
    DiastolicBp,
    SleepHours,
    AvgPm25,
    AvgNo2,
    NoiseLevelDb,
    GreenSpacePercent,
    WalkabilityScore,
    UrbanHeatIncrease,
}

impl NumericColumn {
    pub const COUNT: usize = 12;

    pub const ALL: [NumericColumn; Self::COUNT] = [
        NumericColumn::Age,
        NumericColumn::Bmi,
        NumericColumn::TotalCholesterol,
        NumericColumn::SystolicBp,
        NumericColumn::DiastolicBp,
        NumericColumn::SleepHours,
        NumericColumn::AvgPm25,
        NumericColumn::AvgNo2,
        NumericColumn::NoiseLevelDb,
        NumericColumn::GreenSpacePercent,
        NumericColumn::WalkabilityScore,
        NumericColumn::UrbanHeatIncrease,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn name(self) -> &'static str {
        match self {
            NumericColumn::Age => "Age",
            NumericColumn::Bmi => "BMI",
            NumericColumn::TotalCholesterol => "TotalCholesterol",
            NumericColumn::SystolicBp => "SystolicBP",
            NumericColumn::DiastolicBp => "DiastolicBP",
            NumericColumn::SleepHours => "SleepHours",
            NumericColumn::AvgPm25 => "Avg_PM25",
            NumericColumn::AvgNo2 => "Avg_NO2",
            NumericColumn::NoiseLevelDb => "NoiseLevel_dB",
            NumericColumn::GreenSpacePercent => "GreenSpacePercent",
            NumericColumn::WalkabilityScore => "WalkabilityScore",
            NumericColumn::UrbanHeatIncrease => "UrbanHeatIncrease",
        }
    }
}

/// One slot of the encoded feature vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeatureColumn {
    Numeric(NumericColumn),
    Encoded(CategoricalColumn),
}

impl FeatureColumn {
    pub const fn name(self) -> &'static str {
        match self {
            FeatureColumn::Numeric(c) => c.name(),
            FeatureColumn::Encoded(c) => c.encoded_name(),
        }
    }

    /// Position of this column in [`FEATURE_ORDER`].
    pub fn position(self) -> usize {
        FEATURE_ORDER
            .iter()
            .position(|c| *c == self)
            .unwrap_or_else(|| unreachable!("every column appears in FEATURE_ORDER"))
    }
}

/// Training-time column order. Changing it invalidates every persisted model.
pub const FEATURE_ORDER: [FeatureColumn; FEATURE_DIM] = [
    FeatureColumn::Numeric(NumericColumn::Age),
    FeatureColumn::Encoded(CategoricalColumn::Gender),
    FeatureColumn::Encoded(CategoricalColumn::Smoker),
    FeatureColumn::Encoded(CategoricalColumn::FamilyHistoryCvd),
    FeatureColumn::Encoded(CategoricalColumn::Diabetes),
    FeatureColumn::Encoded(CategoricalColumn::HighBloodPressure),
    FeatureColumn::Encoded(CategoricalColumn::PhysicalActivityLevel),
    FeatureColumn::Encoded(CategoricalColumn::AlcoholConsumption),
    FeatureColumn::Encoded(CategoricalColumn::StressLevel),
    FeatureColumn::Encoded(CategoricalColumn::Borough),
    FeatureColumn::Numeric(NumericColumn::Bmi),
    FeatureColumn::Numeric(NumericColumn::TotalCholesterol),
    FeatureColumn::Numeric(NumericColumn::SystolicBp),
    FeatureColumn::Numeric(NumericColumn::DiastolicBp),
    FeatureColumn::Numeric(NumericColumn::SleepHours),
    FeatureColumn::Numeric(NumericColumn::AvgPm25),
    FeatureColumn::Numeric(NumericColumn::AvgNo2),
    FeatureColumn::Numeric(NumericColumn::NoiseLevelDb),
    FeatureColumn::Numeric(NumericColumn::GreenSpacePercent),
    FeatureColumn::Numeric(NumericColumn::WalkabilityScore),
    FeatureColumn::Numeric(NumericColumn::UrbanHeatIncrease),
];

/// Feature names in training order.
pub fn feature_names() -> Vec<&'static str> {
    FEATURE_ORDER.iter().map(|c| c.name()).collect()
}
