use std::sync::Arc;

use thiserror::Error;

use super::types::{HandLandmarks, PoseLandmarks};
use crate::core::video::Frame;

#[derive(Debug, Error)]
pub enum LandmarkError {
    #[error("landmark backend unavailable: {0}")]
    BackendUnavailable(String),
    #[error("invalid detector configuration: {0}")]
    InvalidConfig(String),
}

/// Hand landmark detector configuration.
#[derive(Debug, Clone)]
pub struct HandDetectorConfig {
    pub static_image_mode: bool,
    pub max_hands: usize,
    pub min_detection_confidence: f32,
}

impl Default for HandDetectorConfig {
    fn default() -> Self {
        Self::for_video()
    }
}

impl HandDetectorConfig {
    /// Streaming mode used while scanning whole videos.
    pub fn for_video() -> Self {
        Self {
            static_image_mode: false,
            max_hands: 2,
            min_detection_confidence: 0.3,
        }
    }

    /// Static-image mode for single frames with no temporal context;
    /// lower confidence recovers more hands at the cost of precision.
    pub fn for_still_frame() -> Self {
        Self {
            static_image_mode: true,
            max_hands: 2,
            min_detection_confidence: 0.2,
        }
    }
}

/// Body pose detector configuration (single instance per frame).
#[derive(Debug, Clone)]
pub struct PoseDetectorConfig {
    pub static_image_mode: bool,
    pub min_detection_confidence: f32,
}

impl Default for PoseDetectorConfig {
    fn default() -> Self {
        Self::for_video()
    }
}

impl PoseDetectorConfig {
    pub fn for_video() -> Self {
        Self {
            static_image_mode: false,
            min_detection_confidence: 0.3,
        }
    }

    pub fn for_still_frame() -> Self {
        Self {
            static_image_mode: true,
            min_detection_confidence: 0.2,
        }
    }
}

/// Per-frame hand keypoint detector. Instances may carry temporal state
/// and are not safe to share across concurrent scans; each task owns its
/// own instance for its lifetime.
pub trait HandDetector: Send {
    fn detect(&mut self, frame: &Frame) -> Vec<HandLandmarks>;
}

/// Per-frame body pose detector. Same ownership rules as [`HandDetector`].
pub trait PoseDetector: Send {
    fn detect(&mut self, frame: &Frame) -> Option<PoseLandmarks>;
}

/// Factory for detector instances. One backend is shared across tasks;
/// the detectors it creates are not.
pub trait LandmarkBackend: Send + Sync {
    fn hand_detector(
        &self,
        config: &HandDetectorConfig,
    ) -> Result<Box<dyn HandDetector>, LandmarkError>;

    fn pose_detector(
        &self,
        config: &PoseDetectorConfig,
    ) -> Result<Box<dyn PoseDetector>, LandmarkError>;
}

type HandScript = Arc<dyn Fn(u64) -> Vec<HandLandmarks> + Send + Sync>;
type PoseScript = Arc<dyn Fn(u64) -> Option<PoseLandmarks> + Send + Sync>;

/// Scripted hand detector keyed on the frame number.
pub struct ScriptedHandDetector {
    script: HandScript,
    max_hands: usize,
}

impl HandDetector for ScriptedHandDetector {
    fn detect(&mut self, frame: &Frame) -> Vec<HandLandmarks> {
        let mut hands = (self.script)(frame.frame_number);
        hands.truncate(self.max_hands);
        hands
    }
}

/// Scripted pose detector keyed on the frame number.
pub struct ScriptedPoseDetector {
    script: PoseScript,
}

impl PoseDetector for ScriptedPoseDetector {
    fn detect(&mut self, frame: &Frame) -> Option<PoseLandmarks> {
        (self.script)(frame.frame_number)
    }
}

/// Backend producing scripted detectors, used in tests and as a stand-in
/// where no real landmark model is wired up.
pub struct MockBackend {
    hands: HandScript,
    pose: PoseScript,
}

impl MockBackend {
    pub fn new<H, P>(hands: H, pose: P) -> Self
    where
        H: Fn(u64) -> Vec<HandLandmarks> + Send + Sync + 'static,
        P: Fn(u64) -> Option<PoseLandmarks> + Send + Sync + 'static,
    {
        Self {
            hands: Arc::new(hands),
            pose: Arc::new(pose),
        }
    }

    pub fn detecting_nothing() -> Self {
        Self::new(|_| Vec::new(), |_| None)
    }
}

impl LandmarkBackend for MockBackend {
    fn hand_detector(
        &self,
        config: &HandDetectorConfig,
    ) -> Result<Box<dyn HandDetector>, LandmarkError> {
        if config.max_hands == 0 {
            return Err(LandmarkError::InvalidConfig(
                "max_hands must be at least 1".to_string(),
            ));
        }
        Ok(Box::new(ScriptedHandDetector {
            script: Arc::clone(&self.hands),
            max_hands: config.max_hands,
        }))
    }

    fn pose_detector(
        &self,
        _config: &PoseDetectorConfig,
    ) -> Result<Box<dyn PoseDetector>, LandmarkError> {
        Ok(Box::new(ScriptedPoseDetector {
            script: Arc::clone(&self.pose),
        }))
    }
}
