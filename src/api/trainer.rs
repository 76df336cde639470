//! 模型训练器 - two background stages: video processing and model fitting

use std::path::PathBuf;
use std::sync::Arc;

use log::{error, info};

use crate::core::gesture::SegmenterConfig;
use crate::core::landmark::LandmarkBackend;
use crate::core::model::{build_dataset, train, ArtifactStore, Dataset, LabeledVideo};
use crate::core::task::{TaskId, WorkerPool};

/// Training facade. Mirrors the two-stage flow of the original tooling:
/// `process_videos` turns raw videos into a persisted dataset,
/// `train_from_dataset` turns a dataset into a model artifact. Both run
/// fire-and-forget; progress is observed by polling the artifact store.
pub struct ModelTrainer {
    store: Arc<dyn ArtifactStore>,
    backend: Arc<dyn LandmarkBackend>,
    pool: WorkerPool,
    owner: String,
}

impl ModelTrainer {
    pub fn new(
        store: Arc<dyn ArtifactStore>,
        backend: Arc<dyn LandmarkBackend>,
        owner: impl Into<String>,
    ) -> Self {
        info!("🧠 ModelTrainer: created");
        Self {
            store,
            backend,
            pool: WorkerPool::new(),
            owner: owner.into(),
        }
    }

    /// Scan every video and write the aggregated dataset to
    /// `dataset_path` as JSON.
    pub fn process_videos(&self, videos: Vec<LabeledVideo>, dataset_path: PathBuf) -> TaskId {
        let backend = Arc::clone(&self.backend);

        self.pool.submit("process-videos", move |task_id| {
            let dataset = build_dataset(videos, backend.as_ref(), &SegmenterConfig::default());
            match dataset.save(&dataset_path) {
                Ok(()) => info!(
                    "✅ processing ({}) wrote {} example(s) to {:?}",
                    task_id,
                    dataset.len(),
                    dataset_path
                ),
                Err(e) => error!("❌ processing ({}) failed: {}", task_id, e),
            }
        })
    }

    /// Fit and persist a model from a previously written dataset file.
    pub fn train_from_dataset(&self, dataset_path: PathBuf) -> TaskId {
        let store = Arc::clone(&self.store);
        let owner = self.owner.clone();

        self.pool.submit("train-model", move |task_id| {
            let outcome = Dataset::load(&dataset_path)
                .and_then(|dataset| train(&dataset, &owner, store.as_ref()));
            match outcome {
                Ok(report) => info!(
                    "✅ training ({}) produced artifact {} ({:.2}% accuracy)",
                    task_id,
                    report.artifact_id,
                    report.accuracy * 100.0
                ),
                Err(e) => error!("❌ training ({}) failed: {}", task_id, e),
            }
        })
    }

    /// Fit and persist a model from an in-memory dataset.
    pub fn train_examples(&self, dataset: Dataset) -> TaskId {
        let store = Arc::clone(&self.store);
        let owner = self.owner.clone();

        self.pool.submit("train-model", move |task_id| {
            match train(&dataset, &owner, store.as_ref()) {
                Ok(report) => info!(
                    "✅ training ({}) produced artifact {}",
                    task_id, report.artifact_id
                ),
                Err(e) => error!("❌ training ({}) failed: {}", task_id, e),
            }
        })
    }
}

impl Drop for ModelTrainer {
    fn drop(&mut self) {
        info!("🗑️ ModelTrainer: released");
    }
}
