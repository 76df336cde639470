//! 手语翻译器 - whole-video and live single-frame translation

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use log::{error, info};

use crate::core::gesture::SegmenterConfig;
use crate::core::landmark::LandmarkBackend;
use crate::core::model::{
    translate_frame, translate_video, ArtifactId, ArtifactRecord, ArtifactStore, FrameTranslation,
    InferenceError, ModelArtifact, StoreError, VideoTranslation,
};
use crate::core::task::{TaskId, WorkerPool};
use crate::core::video::VideoSource;

/// Collaborator that receives the outcome of a background translation.
/// Callers discover results by polling whatever the sink persists.
pub trait TranslationSink: Send + Sync {
    fn record(&self, task: &TaskId, result: VideoTranslation);
}

/// In-memory sink for tests and embedded callers.
pub struct MemoryTranslationSink {
    results: Mutex<HashMap<String, VideoTranslation>>,
}

impl MemoryTranslationSink {
    pub fn new() -> Self {
        Self {
            results: Mutex::new(HashMap::new()),
        }
    }

    pub fn get(&self, task: &TaskId) -> Option<VideoTranslation> {
        self.results
            .lock()
            .ok()
            .and_then(|results| results.get(task.as_str()).cloned())
    }
}

impl Default for MemoryTranslationSink {
    fn default() -> Self {
        Self::new()
    }
}

impl TranslationSink for MemoryTranslationSink {
    fn record(&self, task: &TaskId, result: VideoTranslation) {
        if let Ok(mut results) = self.results.lock() {
            results.insert(task.as_str().to_string(), result);
        }
    }
}

/// Translation facade: owns the artifact store, the landmark backend
/// and a worker pool for the long-running whole-video path.
pub struct SignTranslator {
    store: Arc<dyn ArtifactStore>,
    backend: Arc<dyn LandmarkBackend>,
    pool: WorkerPool,
}

impl SignTranslator {
    pub fn new(store: Arc<dyn ArtifactStore>, backend: Arc<dyn LandmarkBackend>) -> Self {
        info!("🎬 SignTranslator: created");
        Self {
            store,
            backend,
            pool: WorkerPool::new(),
        }
    }

    /// Fire-and-forget whole-video translation. The result reaches the
    /// sink when the task finishes; failures are logged and leave no
    /// sink record.
    pub fn translate_video(
        &self,
        mut source: Box<dyn VideoSource>,
        artifact_id: ArtifactId,
        sink: Arc<dyn TranslationSink>,
    ) -> TaskId {
        let store = Arc::clone(&self.store);
        let backend = Arc::clone(&self.backend);

        self.pool.submit("translate-video", move |task_id| {
            let outcome = load_artifact(store.as_ref(), &artifact_id).and_then(|artifact| {
                translate_video(
                    source.as_mut(),
                    &artifact,
                    backend.as_ref(),
                    SegmenterConfig::default(),
                )
            });
            match outcome {
                Ok(result) => sink.record(&task_id, result),
                Err(e) => error!("❌ video translation ({}) failed: {}", task_id, e),
            }
        })
    }

    /// Synchronous single-frame translation for the live capture loop.
    pub fn translate_frame(
        &self,
        frame_bytes: &[u8],
        artifact_id: &ArtifactId,
    ) -> Result<FrameTranslation, InferenceError> {
        let artifact = load_artifact(self.store.as_ref(), artifact_id)?;
        translate_frame(frame_bytes, &artifact, self.backend.as_ref())
    }

    /// Persisted artifacts, for model selection and result polling.
    pub fn models(&self) -> Result<Vec<ArtifactRecord>, StoreError> {
        self.store.list()
    }
}

impl Drop for SignTranslator {
    fn drop(&mut self) {
        info!("🗑️ SignTranslator: released");
    }
}

fn load_artifact(
    store: &dyn ArtifactStore,
    id: &ArtifactId,
) -> Result<ModelArtifact, InferenceError> {
    let blob = store.load(id)?;
    ModelArtifact::from_bytes(&blob).map_err(|e| InferenceError::CorruptArtifact(e.to_string()))
}
