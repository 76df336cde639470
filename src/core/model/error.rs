use thiserror::Error;

use crate::core::landmark::LandmarkError;
use crate::core::video::VideoError;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("artifact not found: {0}")]
    NotFound(String),
    #[error("artifact already exists: {0}")]
    AlreadyExists(String),
    #[error("corrupt artifact metadata: {0}")]
    CorruptMetadata(String),
}

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("insufficient training data: {0}")]
    InsufficientData(String),
    #[error("classifier error: {0}")]
    Classifier(String),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("store error: {0}")]
    Store(#[from] StoreError),
    #[error("landmark backend error: {0}")]
    Landmark(#[from] LandmarkError),
    #[error("video error: {0}")]
    Video(#[from] VideoError),
}

#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("model artifact unavailable: {0}")]
    ArtifactUnavailable(#[from] StoreError),
    #[error("corrupt model artifact: {0}")]
    CorruptArtifact(String),
    #[error("frame decode failed: {0}")]
    FrameDecode(String),
    #[error("classifier error: {0}")]
    Classifier(String),
    #[error("landmark backend error: {0}")]
    Landmark(#[from] LandmarkError),
    #[error("video error: {0}")]
    Video(#[from] VideoError),
}
