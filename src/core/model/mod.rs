//! 模型层 - label mapping, dataset, training, artifacts and inference
//!
//! The artifact store is the only persistence seam: training writes one
//! immutable (classifier, label-mapping) blob per run, inference loads
//! it fresh per call.

pub mod artifact;
pub mod dataset;
pub mod error;
pub mod inference;
pub mod labels;
pub mod store;
pub mod training;

pub use artifact::{ArtifactId, ArtifactMetadata, Classifier, ModelArtifact};
pub use dataset::{load_manifest, Dataset, ManifestEntry, TrainingExample};
pub use error::{InferenceError, ModelError, StoreError};
pub use inference::{translate_frame, translate_video, FrameTranslation, VideoTranslation};
pub use labels::{LabelMapping, UNKNOWN_LABEL};
pub use store::{ArtifactRecord, ArtifactStore, FsArtifactStore, MemoryArtifactStore};
pub use training::{build_dataset, train, LabeledVideo, TrainingReport};
