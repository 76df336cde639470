use std::fmt;

use serde::{Deserialize, Serialize};
use smartcore::ensemble::random_forest_classifier::RandomForestClassifier;
use smartcore::linalg::basic::matrix::DenseMatrix;
use uuid::Uuid;

use super::error::ModelError;
use super::labels::LabelMapping;

/// The trained ensemble. Hyperparameters are fixed at training time;
/// the artifact is immutable once created.
pub type Classifier = RandomForestClassifier<f32, u32, DenseMatrix<f32>, Vec<u32>>;

/// Opaque identifier of a persisted artifact.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArtifactId(String);

impl ArtifactId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ArtifactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ArtifactId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ArtifactId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Descriptive record saved next to the artifact blob.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactMetadata {
    pub name: String,
    pub description: String,
    /// Opaque owner tag supplied by the caller; carried for persistence
    /// only.
    pub owner: String,
    /// Held-out accuracy in [0, 1], for reporting only.
    pub accuracy: f32,
    pub example_count: usize,
    pub class_count: usize,
    pub created_at_ms: u64,
}

/// Trained classifier plus the label mapping needed to turn its output
/// index back into a word.
#[derive(Serialize, Deserialize)]
pub struct ModelArtifact {
    pub classifier: Classifier,
    pub label_mapping: LabelMapping,
    pub accuracy: f32,
    pub example_count: usize,
    pub class_count: usize,
}

impl ModelArtifact {
    pub fn to_bytes(&self) -> Result<Vec<u8>, ModelError> {
        Ok(serde_json::to_vec(self)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ModelError> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Classify one feature vector and map the class index back to its
    /// word. A stale index resolves to the "Unknown" sentinel.
    pub fn predict(&self, features: &[f32]) -> Result<String, ModelError> {
        let x = DenseMatrix::from_2d_vec(&vec![features.to_vec()]);
        let predicted = self
            .classifier
            .predict(&x)
            .map_err(|e| ModelError::Classifier(e.to_string()))?;
        let index = predicted
            .first()
            .copied()
            .ok_or_else(|| ModelError::Classifier("empty prediction".to_string()))?;
        Ok(self.label_mapping.decode_or_unknown(index))
    }
}
