//! 关键点层 - landmark types, detector seams and overlay rendering
//!
//! The hand/pose detectors wrap an external body-landmark model. They are
//! reached only through the [`LandmarkBackend`] factory so every scan owns
//! its own detector instances with explicit configuration.

pub mod detector;
pub mod overlay;
pub mod types;

pub use detector::{
    HandDetector, HandDetectorConfig, LandmarkBackend, LandmarkError, MockBackend, PoseDetector,
    PoseDetectorConfig,
};
pub use overlay::{draw_landmarks, encode_jpeg, HAND_CONNECTIONS};
pub use types::{
    HandLandmarks, Landmark, PoseLandmarks, HAND_LANDMARK_COUNT, LEFT_ELBOW, POSE_LANDMARK_COUNT,
    RIGHT_ELBOW,
};
