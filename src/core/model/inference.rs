use std::fmt;

use log::{debug, info, warn};

use super::artifact::ModelArtifact;
use super::error::InferenceError;
use crate::core::gesture::{aggregate, frame_features, GestureScanner, SegmenterConfig, FEATURE_LEN};
use crate::core::landmark::{
    draw_landmarks, encode_jpeg, HandDetectorConfig, LandmarkBackend, PoseDetectorConfig,
};
use crate::core::video::{Frame, VideoSource};

const OVERLAY_JPEG_QUALITY: u8 = 80;

/// Outcome of whole-video translation. The degenerate variants are
/// ordinary results, not errors: the video was read fine but held no
/// classifiable gesture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VideoTranslation {
    Word(String),
    /// The gesture window collapsed (empty or single-frame segment).
    NoUsableWindow,
    /// The aggregated vector does not match the feature schema.
    FeatureLengthMismatch { actual: usize },
}

impl fmt::Display for VideoTranslation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VideoTranslation::Word(word) => f.write_str(word),
            VideoTranslation::NoUsableWindow => f.write_str("no valid gesture data detected"),
            VideoTranslation::FeatureLengthMismatch { actual } => {
                write!(f, "aggregated vector length {} does not match the schema", actual)
            }
        }
    }
}

/// Whole-video translation: scan, aggregate the gesture window, then
/// classify. The classifier is only invoked for a sane window and a
/// schema-length vector.
pub fn translate_video(
    source: &mut dyn VideoSource,
    artifact: &ModelArtifact,
    backend: &dyn LandmarkBackend,
    config: SegmenterConfig,
) -> Result<VideoTranslation, InferenceError> {
    let scanner = GestureScanner::new(backend, config)?;
    let outcome = scanner.scan(source)?;

    let window = outcome.window;
    if window.start >= outcome.history.len() {
        warn!("⚠️ gesture window starts past the history, nothing to classify");
        return Ok(VideoTranslation::NoUsableWindow);
    }
    if let Some(end) = window.end {
        if window.start >= end {
            return Ok(VideoTranslation::NoUsableWindow);
        }
    }

    let (start, end) = window.resolve_for_inference(outcome.history.len());
    let features = aggregate(&outcome.history, start, end);
    if features.len() != FEATURE_LEN {
        return Ok(VideoTranslation::FeatureLengthMismatch {
            actual: features.len(),
        });
    }

    let word = artifact
        .predict(&features)
        .map_err(|e| InferenceError::Classifier(e.to_string()))?;
    info!("🗣️ video translated as '{}'", word);
    Ok(VideoTranslation::Word(word))
}

/// Single-frame translation result: the predicted word (absent when no
/// hand was visible) plus the landmark overlay for operator feedback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameTranslation {
    pub word: Option<String>,
    pub overlay_jpeg: Vec<u8>,
}

/// Low-latency single-frame translation. No temporal context: detectors
/// run in static-image mode and the frame's own padded feature vector is
/// classified directly, but only when at least one hand is present.
pub fn translate_frame(
    frame_bytes: &[u8],
    artifact: &ModelArtifact,
    backend: &dyn LandmarkBackend,
) -> Result<FrameTranslation, InferenceError> {
    let frame =
        Frame::from_encoded(frame_bytes).map_err(|e| InferenceError::FrameDecode(e.to_string()))?;

    let mut hand_detector = backend.hand_detector(&HandDetectorConfig::for_still_frame())?;
    let mut pose_detector = backend.pose_detector(&PoseDetectorConfig::for_still_frame())?;

    let enhanced = frame.enhance();
    let hands = hand_detector.detect(&enhanced);
    let pose = pose_detector.detect(&enhanced);

    let overlay = draw_landmarks(&frame, &hands, pose.as_ref());
    let overlay_jpeg = encode_jpeg(&overlay, OVERLAY_JPEG_QUALITY);

    if hands.is_empty() {
        debug!("🖐️ no hands in frame, skipping prediction");
        return Ok(FrameTranslation {
            word: None,
            overlay_jpeg,
        });
    }

    let features = frame_features(&hands, pose.as_ref(), frame.width, frame.height);
    if features.len() != FEATURE_LEN {
        warn!("⚠️ frame features have length {}, skipping prediction", features.len());
        return Ok(FrameTranslation {
            word: None,
            overlay_jpeg,
        });
    }

    let word = artifact
        .predict(&features)
        .map_err(|e| InferenceError::Classifier(e.to_string()))?;
    Ok(FrameTranslation {
        word: Some(word),
        overlay_jpeg,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use smartcore::ensemble::random_forest_classifier::{
        RandomForestClassifier, RandomForestClassifierParameters,
    };
    use smartcore::linalg::basic::matrix::DenseMatrix;

    use crate::core::landmark::{HandLandmarks, Landmark, MockBackend, HAND_LANDMARK_COUNT};
    use crate::core::model::labels::LabelMapping;
    use crate::core::video::FrameSequence;

    fn hand_with_spread(spread: f32) -> HandLandmarks {
        HandLandmarks::new(
            (0..HAND_LANDMARK_COUNT)
                .map(|i| Landmark::new(0.2 + i as f32 * spread, 0.5))
                .collect(),
        )
    }

    /// Artifact whose two classes are the feature vectors of two hand
    /// spreads, labelled "salom" (narrow) and "rahmat" (wide).
    fn two_word_artifact(width: u32, height: u32) -> ModelArtifact {
        let narrow = frame_features(&[hand_with_spread(0.002)], None, width, height);
        let wide = frame_features(&[hand_with_spread(0.02)], None, width, height);

        let mut rows = Vec::new();
        let mut targets: Vec<u32> = Vec::new();
        for _ in 0..10 {
            rows.push(narrow.clone());
            targets.push(1); // "salom" sorts after "rahmat"
            rows.push(wide.clone());
            targets.push(0);
        }

        let labels = vec!["rahmat".to_string(), "salom".to_string()];
        let mapping = LabelMapping::fit(&labels);
        let params = RandomForestClassifierParameters::default()
            .with_n_trees(50)
            .with_seed(7);
        let classifier =
            RandomForestClassifier::fit(&DenseMatrix::from_2d_vec(&rows), &targets, params)
                .unwrap();

        ModelArtifact {
            classifier,
            label_mapping: mapping,
            accuracy: 1.0,
            example_count: 20,
            class_count: 2,
        }
    }

    fn frames(count: u64) -> FrameSequence {
        let frames = (0..count)
            .map(|n| crate::core::video::Frame::new(8, 8, vec![0u8; 8 * 8 * 4], n * 33, n).unwrap())
            .collect();
        FrameSequence::new(frames)
    }

    fn encoded_test_frame() -> Vec<u8> {
        let img = image::RgbImage::from_pixel(8, 8, image::Rgb([50, 60, 70]));
        let mut buffer = std::io::Cursor::new(Vec::new());
        img.write_to(&mut buffer, image::ImageOutputFormat::Png)
            .unwrap();
        buffer.into_inner()
    }

    #[test]
    fn test_video_with_steady_narrow_hand_translates() {
        let artifact = two_word_artifact(8, 8);
        let backend = MockBackend::new(|_| vec![hand_with_spread(0.002)], |_| None);

        let result = translate_video(
            &mut frames(10),
            &artifact,
            &backend,
            SegmenterConfig::default(),
        )
        .unwrap();
        assert_eq!(result, VideoTranslation::Word("salom".to_string()));
    }

    #[test]
    fn test_empty_video_yields_no_usable_window() {
        let artifact = two_word_artifact(8, 8);
        let backend = MockBackend::detecting_nothing();

        let result = translate_video(
            &mut FrameSequence::empty(),
            &artifact,
            &backend,
            SegmenterConfig::default(),
        )
        .unwrap();
        assert_eq!(result, VideoTranslation::NoUsableWindow);
    }

    #[test]
    fn test_single_frame_video_is_degenerate() {
        let artifact = two_word_artifact(8, 8);
        let backend = MockBackend::new(|_| vec![hand_with_spread(0.002)], |_| None);

        let result = translate_video(
            &mut frames(1),
            &artifact,
            &backend,
            SegmenterConfig::default(),
        )
        .unwrap();
        assert_eq!(result, VideoTranslation::NoUsableWindow);
    }

    #[test]
    fn test_frame_without_hands_has_no_word() {
        let artifact = two_word_artifact(8, 8);
        let backend = MockBackend::detecting_nothing();

        let result = translate_frame(&encoded_test_frame(), &artifact, &backend).unwrap();
        assert_eq!(result.word, None);
        assert!(!result.overlay_jpeg.is_empty());
    }

    #[test]
    fn test_frame_with_hand_predicts() {
        let artifact = two_word_artifact(8, 8);
        let backend = MockBackend::new(|_| vec![hand_with_spread(0.02)], |_| None);

        let result = translate_frame(&encoded_test_frame(), &artifact, &backend).unwrap();
        assert_eq!(result.word.as_deref(), Some("rahmat"));
        assert!(!result.overlay_jpeg.is_empty());
    }

    #[test]
    fn test_corrupt_frame_buffer_is_reported() {
        let artifact = two_word_artifact(8, 8);
        let backend = MockBackend::detecting_nothing();

        let result = translate_frame(&[1u8, 2, 3], &artifact, &backend);
        assert!(matches!(result, Err(InferenceError::FrameDecode(_))));
    }
}
