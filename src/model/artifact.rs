//! Sealed artifact format: the trained model serialized as one payload plus a checksum envelope.

use super::{ModelVariant, TrainedModel};
use crate::storage::ArtifactError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

pub const ARTIFACT_FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactEnvelope {
    pub format_version: u32,
    pub variant: ModelVariant,
    pub created_at: DateTime<Utc>,
    /// Lowercase hex SHA-256 of `payload`
    pub checksum: String,
    /// JSON-serialized [`TrainedModel`]
    pub payload: String,
}

fn checksum(payload: &str) -> String {
    Sha256::digest(payload.as_bytes())
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect()
}

pub(crate) fn seal(model: &TrainedModel) -> Result<Vec<u8>, ArtifactError> {
    let payload = serde_json::to_string(model).map_err(|e| ArtifactError::Encoding(e.to_string()))?;
    let envelope = ArtifactEnvelope {
        format_version: ARTIFACT_FORMAT_VERSION,
        variant: model.variant,
        created_at: Utc::now(),
        checksum: checksum(&payload),
        payload,
    };
    serde_json::to_vec(&envelope).map_err(|e| ArtifactError::Encoding(e.to_string()))
}

pub(crate) fn open(name: &str, bytes: &[u8]) -> Result<(ArtifactEnvelope, TrainedModel), ArtifactError> {
    let corrupt = |reason: String| ArtifactError::Corrupt {
        name: name.to_string(),
        reason,
    };
    let envelope: ArtifactEnvelope =
        serde_json::from_slice(bytes).map_err(|e| corrupt(format!("bad envelope: {e}")))?;
    if envelope.format_version != ARTIFACT_FORMAT_VERSION {
        return Err(corrupt(format!(
            "unsupported format version {}",
            envelope.format_version
        )));
    }
    if checksum(&envelope.payload) != envelope.checksum {
        return Err(corrupt("checksum mismatch".to_string()));
    }
    let model: TrainedModel = serde_json::from_str(&envelope.payload)
        .map_err(|e| corrupt(format!("bad payload: {e}")))?;
    if model.variant != model.classifier.variant() || model.variant != envelope.variant {
        return Err(corrupt("variant tag does not match classifier".to_string()));
    }
    if !model.pipeline.is_fitted() {
        return Err(corrupt("feature pipeline is not fitted".to_string()));
    }
    Ok((envelope, model))
}
