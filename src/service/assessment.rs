use crate::advisor::{AdviceContext, AdvisorClient};
use crate::data::EnvironmentTable;
use crate::features::RawRecord;
use crate::model::{ModelError, Prediction, RiskModel};
use crate::risk::{fallback_advice, recommendations};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

/// Form fields as submitted by a front end. Absent fields surface as a missing-field error
/// naming the dataset column once the record reaches the pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssessmentRequest {
    pub age: Option<u32>,
    pub gender: Option<String>,
    pub smoker: Option<String>,
    pub family_history: Option<String>,
    pub diabetes: Option<String>,
    pub high_bp: Option<String>,
    pub activity: Option<String>,
    pub bmi: Option<f64>,
    pub cholesterol: Option<f64>,
    pub systolic_bp: Option<f64>,
    pub diastolic_bp: Option<f64>,
    pub alcohol: Option<String>,
    pub stress: Option<String>,
    pub sleep_hours: Option<f64>,
    pub borough: Option<String>,
}

/// Map form fields onto dataset columns and attach the borough's environmental readings
/// (table means for an unknown borough).
pub fn assemble_record(request: &AssessmentRequest, environment: &EnvironmentTable) -> RawRecord {
    let mut record = RawRecord {
        age: request.age,
        gender: request.gender.clone(),
        smoker: request.smoker.clone(),
        family_history_cvd: request.family_history.clone(),
        diabetes: request.diabetes.clone(),
        high_blood_pressure: request.high_bp.clone(),
        physical_activity_level: request.activity.clone(),
        alcohol_consumption: request.alcohol.clone(),
        stress_level: request.stress.clone(),
        borough: request.borough.clone(),
        bmi: request.bmi,
        total_cholesterol: request.cholesterol,
        systolic_bp: request.systolic_bp,
        diastolic_bp: request.diastolic_bp,
        sleep_hours: request.sleep_hours,
        ..RawRecord::default()
    };
    if let Some(borough) = request.borough.as_deref() {
        if environment.get(borough).is_none() {
            warn!(borough, "unknown borough, using mean environmental readings");
        }
        environment.lookup(borough).apply_to(&mut record);
    }
    record
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentSummary {
    pub pm25: f64,
    pub no2: f64,
    pub borough: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    pub id: Uuid,
    pub assessed_at: DateTime<Utc>,
    #[serde(flatten)]
    pub prediction: Prediction,
    pub environmental_data: EnvironmentSummary,
    pub recommendations: Vec<String>,
    pub llm_advice: String,
    /// True when `llm_advice` was generated by the LLM
    pub llm_available: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Assessment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AssessmentResponse {
    pub fn ok(assessment: Assessment) -> Self {
        Self {
            success: true,
            result: Some(assessment),
            error: None,
        }
    }

    pub fn failed(error: impl ToString) -> Self {
        Self {
            success: false,
            result: None,
            error: Some(error.to_string()),
        }
    }
}

/// Borrows a fitted model read-only; any number of assessors may share one.
pub struct Assessor<'a> {
    model: &'a RiskModel,
    environment: &'a EnvironmentTable,
    advisor: Option<&'a AdvisorClient>,
}

impl<'a> Assessor<'a> {
    pub fn new(
        model: &'a RiskModel,
        environment: &'a EnvironmentTable,
        advisor: Option<&'a AdvisorClient>,
    ) -> Self {
        Self {
            model,
            environment,
            advisor,
        }
    }

    pub fn assess(&self, request: &AssessmentRequest) -> Result<Assessment, ModelError> {
        let record = assemble_record(request, self.environment);
        let prediction = self.model.predict(&record)?;

        let borough = request.borough.clone().unwrap_or_default();
        let environmental_data = EnvironmentSummary {
            pm25: record.avg_pm25.unwrap_or_default(),
            no2: record.avg_no2.unwrap_or_default(),
            borough,
        };

        let (llm_advice, llm_available) = match self.advisor {
            Some(advisor) => {
                let advice = advisor.advise(&AdviceContext {
                    age: request.age,
                    borough: &environmental_data.borough,
                    pm25: environmental_data.pm25,
                    no2: environmental_data.no2,
                    tier: prediction.tier,
                });
                (advice.text, advice.generated)
            }
            None => (
                fallback_advice(prediction.tier, &environmental_data.borough),
                false,
            ),
        };

        let assessment = Assessment {
            id: Uuid::new_v4(),
            assessed_at: Utc::now(),
            prediction,
            recommendations: recommendations(prediction.tier)
                .iter()
                .map(|s| s.to_string())
                .collect(),
            environmental_data,
            llm_advice,
            llm_available,
        };
        info!(
            id = %assessment.id,
            probability = prediction.probability,
            tier = %prediction.tier,
            "assessment complete"
        );
        Ok(assessment)
    }

    /// `assess` wrapped as a response; errors become `success: false` with the message.
    pub fn respond(&self, request: &AssessmentRequest) -> AssessmentResponse {
        match self.assess(request) {
            Ok(assessment) => AssessmentResponse::ok(assessment),
            Err(e) => {
                warn!(error = %e, "assessment failed");
                AssessmentResponse::failed(e)
            }
        }
    }
}
