use log::{debug, info};

use super::features::frame_features;
use super::segmenter::{GestureWindow, MotionSegmenter, ScanAction, SegmenterConfig};
use crate::core::landmark::{
    HandDetector, HandDetectorConfig, LandmarkBackend, LandmarkError, PoseDetector,
    PoseDetectorConfig,
};
use crate::core::video::{VideoError, VideoSource};

/// Whether a scan produced real landmark data or fell back to the
/// synthetic zero frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanQuality {
    Full,
    Degraded,
}

#[derive(Debug, Clone)]
pub struct ScanOutcome {
    pub history: Vec<Vec<f32>>,
    pub window: GestureWindow,
    pub motion_detected: bool,
    pub frames_read: u64,
    pub quality: ScanQuality,
}

/// Drives one video through enhance -> detect -> features -> segment.
///
/// Owns its detector instances for the duration of the scan; they are
/// released on every exit path when the scanner is consumed.
pub struct GestureScanner {
    hands: Box<dyn HandDetector>,
    pose: Box<dyn PoseDetector>,
    segmenter: MotionSegmenter,
}

impl GestureScanner {
    pub fn new(
        backend: &dyn LandmarkBackend,
        config: SegmenterConfig,
    ) -> Result<Self, LandmarkError> {
        let hands = backend.hand_detector(&HandDetectorConfig::for_video())?;
        let pose = backend.pose_detector(&PoseDetectorConfig::for_video())?;
        Ok(Self {
            hands,
            pose,
            segmenter: MotionSegmenter::with_config(config),
        })
    }

    /// Consume frames until the source is exhausted or the segmenter
    /// found the gesture end.
    pub fn scan(mut self, source: &mut dyn VideoSource) -> Result<ScanOutcome, VideoError> {
        let mut frames_read: u64 = 0;

        while let Some(frame) = source.next_frame()? {
            frames_read += 1;
            let enhanced = frame.enhance();
            let hands = self.hands.detect(&enhanced);
            let pose = self.pose.detect(&enhanced);
            let features = frame_features(&hands, pose.as_ref(), frame.width, frame.height);

            if self.segmenter.push(features) == ScanAction::Stop {
                debug!("✂️ gesture end at frame {}, stopping early", frames_read);
                break;
            }
        }

        let outcome = self.segmenter.finish();
        let quality = if outcome.synthetic {
            ScanQuality::Degraded
        } else {
            ScanQuality::Full
        };
        info!(
            "🔍 scanned {} frames: window {:?}, motion {}",
            frames_read, outcome.window, outcome.motion_detected
        );

        Ok(ScanOutcome {
            history: outcome.history,
            window: outcome.window,
            motion_detected: outcome.motion_detected,
            frames_read,
            quality,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::gesture::features::FEATURE_LEN;
    use crate::core::landmark::{HandLandmarks, Landmark, MockBackend, HAND_LANDMARK_COUNT};
    use crate::core::video::{Frame, FrameSequence};

    fn frames(count: u64) -> FrameSequence {
        let frames = (0..count)
            .map(|n| Frame::new(8, 8, vec![0u8; 8 * 8 * 4], n * 33, n).unwrap())
            .collect();
        FrameSequence::new(frames)
    }

    // features are hand-local, so motion must change the finger spread,
    // not the hand's absolute position
    fn hand_with_spread(spread: f32) -> HandLandmarks {
        HandLandmarks::new(
            (0..HAND_LANDMARK_COUNT)
                .map(|i| Landmark::new(0.3 + i as f32 * spread, 0.5))
                .collect(),
        )
    }

    #[test]
    fn test_empty_video_degrades_to_zero_frame() {
        let backend = MockBackend::detecting_nothing();
        let scanner = GestureScanner::new(&backend, SegmenterConfig::default()).unwrap();

        let outcome = scanner.scan(&mut FrameSequence::empty()).unwrap();

        assert_eq!(outcome.quality, ScanQuality::Degraded);
        assert_eq!(outcome.frames_read, 0);
        assert_eq!(outcome.history.len(), 1);
        assert_eq!(outcome.history[0].len(), FEATURE_LEN);
        assert_eq!(outcome.window, GestureWindow { start: 0, end: Some(0) });
    }

    #[test]
    fn test_static_video_full_window() {
        let backend = MockBackend::new(|_| vec![hand_with_spread(0.001)], |_| None);
        let scanner = GestureScanner::new(&backend, SegmenterConfig::default()).unwrap();

        let outcome = scanner.scan(&mut frames(10)).unwrap();

        assert_eq!(outcome.quality, ScanQuality::Full);
        assert!(!outcome.motion_detected);
        assert_eq!(outcome.frames_read, 10);
        assert_eq!(outcome.history.len(), 10);
        assert_eq!(outcome.window, GestureWindow { start: 0, end: Some(9) });
    }

    #[test]
    fn test_every_history_entry_has_schema_length() {
        let backend = MockBackend::new(
            |n| if n % 3 == 0 { vec![hand_with_spread(0.001)] } else { Vec::new() },
            |_| None,
        );
        let scanner = GestureScanner::new(&backend, SegmenterConfig::default()).unwrap();

        let outcome = scanner.scan(&mut frames(12)).unwrap();
        assert!(outcome.history.iter().all(|v| v.len() == FEATURE_LEN));
    }

    #[test]
    fn test_early_termination_leaves_source_unread() {
        // fingers flex after warmup, then freeze
        let backend = MockBackend::new(
            |n| {
                let spread = match n {
                    0..=30 => 0.001,
                    31..=35 => {
                        if n % 2 == 1 {
                            0.004
                        } else {
                            0.001
                        }
                    }
                    _ => 0.004,
                };
                vec![hand_with_spread(spread)]
            },
            |_| None,
        );
        let config = SegmenterConfig {
            smoothing_factor: 0.0,
            ..SegmenterConfig::default()
        };
        let scanner = GestureScanner::new(&backend, config).unwrap();

        let mut source = frames(500);
        let outcome = scanner.scan(&mut source).unwrap();

        assert!(outcome.motion_detected);
        assert!(outcome.window.end.is_some());
        assert!(outcome.frames_read < 500);
        assert!(source.remaining() > 0);
    }
}
