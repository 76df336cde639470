use log::{info, warn};
use rayon::prelude::*;
use smartcore::ensemble::random_forest_classifier::{
    RandomForestClassifier, RandomForestClassifierParameters,
};
use smartcore::linalg::basic::matrix::DenseMatrix;
use uuid::Uuid;

use super::artifact::{ArtifactId, ArtifactMetadata, ModelArtifact};
use super::dataset::{Dataset, TrainingExample};
use super::error::ModelError;
use super::labels::LabelMapping;
use super::store::ArtifactStore;
use crate::core::gesture::{aggregate, dominant_length, GestureScanner, SegmenterConfig};
use crate::core::landmark::LandmarkBackend;
use crate::core::video::VideoSource;

/// Trees in the ensemble.
const FOREST_SIZE: u16 = 200;
/// Seed shared by the shuffle and the forest for reproducible runs.
const TRAIN_SEED: u64 = 42;
/// Held-out share of the shuffled examples.
const TEST_FRACTION: f32 = 0.1;

/// One training input: a video and the word performed in it.
pub struct LabeledVideo {
    pub label: String,
    pub source: Box<dyn VideoSource>,
}

/// Summary of a completed training run.
#[derive(Debug, Clone)]
pub struct TrainingReport {
    pub artifact_id: ArtifactId,
    pub accuracy: f32,
    pub example_count: usize,
    pub class_count: usize,
}

/// Run every video through the gesture pipeline and collect one
/// aggregated example per video. Videos that cannot be processed are
/// skipped with a warning; they surface later as missing examples, not
/// as a failed batch.
pub fn build_dataset(
    videos: Vec<LabeledVideo>,
    backend: &dyn LandmarkBackend,
    config: &SegmenterConfig,
) -> Dataset {
    let total = videos.len();
    let examples: Vec<TrainingExample> = videos
        .into_par_iter()
        .filter_map(|video| {
            let label = video.label.clone();
            match process_video(video, backend, config) {
                Ok(example) => Some(example),
                Err(e) => {
                    warn!("⚠️ skipping video for '{}': {}", label, e);
                    None
                }
            }
        })
        .collect();

    info!("📊 dataset built: {}/{} video(s) usable", examples.len(), total);
    Dataset::from_examples(examples)
}

fn process_video(
    video: LabeledVideo,
    backend: &dyn LandmarkBackend,
    config: &SegmenterConfig,
) -> Result<TrainingExample, ModelError> {
    // each video owns its own detector instances for the scan lifetime
    let scanner = GestureScanner::new(backend, config.clone())?;
    let mut source = video.source;
    let outcome = scanner.scan(source.as_mut())?;

    let (start, end) = outcome.window.resolve_for_training(outcome.history.len());
    let features = aggregate(&outcome.history, start, end);
    Ok(TrainingExample {
        features,
        label: video.label,
    })
}

/// Fit the classifier on a dataset and persist the artifact.
///
/// Examples whose vector length differs from the most common length in
/// the whole set are dropped before fitting. Held-out accuracy is
/// estimated on a seeded shuffled 10% split and reported only; it never
/// rejects a model.
pub fn train(
    dataset: &Dataset,
    owner: &str,
    store: &dyn ArtifactStore,
) -> Result<TrainingReport, ModelError> {
    if dataset.is_empty() {
        return Err(ModelError::InsufficientData(
            "no training examples".to_string(),
        ));
    }

    let common_len = dominant_length(dataset.features.iter()).unwrap_or(0);
    info!("📏 most common feature length: {}", common_len);

    let mut features: Vec<Vec<f32>> = Vec::new();
    let mut labels: Vec<String> = Vec::new();
    for (vector, label) in dataset.features.iter().zip(dataset.labels.iter()) {
        if vector.len() == common_len {
            features.push(vector.clone());
            labels.push(label.clone());
        }
    }
    if features.is_empty() {
        return Err(ModelError::InsufficientData(
            "no examples with a consistent feature length".to_string(),
        ));
    }

    let mapping = LabelMapping::fit(&labels);
    let class_count = mapping.class_count();
    if class_count == 0 {
        return Err(ModelError::InsufficientData("no classes".to_string()));
    }
    if class_count < 2 {
        warn!("⚠️ only {} class in the dataset, model will be degraded", class_count);
    }

    let encoded: Vec<u32> = labels
        .iter()
        .map(|label| {
            mapping
                .encode(label)
                .ok_or_else(|| ModelError::Classifier(format!("label '{}' missing from mapping", label)))
        })
        .collect::<Result<_, _>>()?;

    let n = features.len();
    let order = shuffled_indices(n, TRAIN_SEED);
    let test_count = if n >= 2 {
        (((n as f32) * TEST_FRACTION).round() as usize).clamp(1, n - 1)
    } else {
        0
    };
    let (test_idx, train_idx) = order.split_at(test_count);

    let x_train: Vec<Vec<f32>> = train_idx.iter().map(|&i| features[i].clone()).collect();
    let y_train: Vec<u32> = train_idx.iter().map(|&i| encoded[i]).collect();

    let params = RandomForestClassifierParameters::default()
        .with_n_trees(FOREST_SIZE)
        .with_seed(TRAIN_SEED);
    let x = DenseMatrix::from_2d_vec(&x_train);
    let classifier = RandomForestClassifier::fit(&x, &y_train, params)
        .map_err(|e| ModelError::Classifier(e.to_string()))?;

    let accuracy = if test_count > 0 {
        let x_test: Vec<Vec<f32>> = test_idx.iter().map(|&i| features[i].clone()).collect();
        let y_test: Vec<u32> = test_idx.iter().map(|&i| encoded[i]).collect();
        let predicted = classifier
            .predict(&DenseMatrix::from_2d_vec(&x_test))
            .map_err(|e| ModelError::Classifier(e.to_string()))?;
        let correct = predicted
            .iter()
            .zip(y_test.iter())
            .filter(|(p, t)| p == t)
            .count();
        correct as f32 / test_count as f32
    } else {
        warn!("⚠️ no held-out rows, reporting 0 accuracy");
        0.0
    };
    info!(
        "✅ hand + elbow model: {:.2}% of held-out samples classified correctly",
        accuracy * 100.0
    );

    let artifact = ModelArtifact {
        classifier,
        label_mapping: mapping,
        accuracy,
        example_count: n,
        class_count,
    };
    let blob = artifact.to_bytes()?;

    let tag = Uuid::new_v4().simple().to_string();
    let meta = ArtifactMetadata {
        name: format!("Model {}", &tag[..8]),
        description: format!("Trained with {} samples, {} classes", n, class_count),
        owner: owner.to_string(),
        accuracy,
        example_count: n,
        class_count,
        created_at_ms: now_ms(),
    };
    let artifact_id = store.save(&blob, &meta)?;
    info!("🧠 training complete, artifact {}", artifact_id);

    Ok(TrainingReport {
        artifact_id,
        accuracy,
        example_count: n,
        class_count,
    })
}

fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Seeded Fisher-Yates permutation of `0..n` (xorshift64).
fn shuffled_indices(n: usize, seed: u64) -> Vec<usize> {
    let mut state = seed.max(1);
    let mut indices: Vec<usize> = (0..n).collect();
    for i in (1..n).rev() {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        let j = (state % (i as u64 + 1)) as usize;
        indices.swap(i, j);
    }
    indices
}
