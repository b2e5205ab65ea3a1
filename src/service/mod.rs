//! Serving layer: turns a front-end assessment request into a prediction with guidance attached.

mod assessment;

pub use assessment::{
    assemble_record, Assessment, AssessmentRequest, AssessmentResponse, Assessor,
    EnvironmentSummary,
};
