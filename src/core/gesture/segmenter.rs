use log::warn;

use super::features::FEATURE_LEN;

/// Motion segmentation thresholds. Tuned empirically for the fixed
/// capture geometry; they are not normalized by frame rate or
/// resolution, so a different capture setup needs re-derived values.
#[derive(Debug, Clone)]
pub struct SegmenterConfig {
    /// Exponential smoothing weight on the previous vector.
    pub smoothing_factor: f32,
    /// Frame-to-frame distance above which motion starts.
    pub onset_threshold: f32,
    /// Distance below which flagged motion is considered finished.
    pub offset_threshold: f32,
    /// Frames collected before onset/offset detection activates.
    pub min_frames: usize,
}

impl Default for SegmenterConfig {
    fn default() -> Self {
        Self {
            smoothing_factor: 0.7,
            onset_threshold: 0.01,
            offset_threshold: 0.002,
            min_frames: 30,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanAction {
    Continue,
    /// The segment end was found; the rest of the video is not scanned.
    Stop,
}

/// Inclusive frame range believed to contain the gesture. `end` is
/// `None` when motion onset was seen but no offset before the stream
/// ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GestureWindow {
    pub start: usize,
    pub end: Option<usize>,
}

impl GestureWindow {
    /// Training keeps the whole history when no explicit end exists.
    pub fn resolve_for_training(&self, history_len: usize) -> (usize, usize) {
        match self.end {
            Some(end) => (self.start, end),
            None => (0, history_len.saturating_sub(1)),
        }
    }

    /// Inference keeps the detected start and runs to the last frame.
    pub fn resolve_for_inference(&self, history_len: usize) -> (usize, usize) {
        (self.start, self.end.unwrap_or(history_len.saturating_sub(1)))
    }
}

/// Result of one full scan.
#[derive(Debug, Clone)]
pub struct SegmentOutcome {
    pub history: Vec<Vec<f32>>,
    pub window: GestureWindow,
    pub motion_detected: bool,
    /// True when no frame was usable and a synthetic zero frame was
    /// substituted.
    pub synthetic: bool,
}

/// Streaming motion segmenter over per-frame feature vectors.
///
/// Latches the expected vector length from the first frame, smooths
/// consecutive vectors, and flags motion onset/offset from the
/// Euclidean distance between the last two accepted vectors. A
/// length mismatch mid-stream is a detector dropout: it is never
/// appended, and once motion is flagged it terminates the segment.
pub struct MotionSegmenter {
    config: SegmenterConfig,
    history: Vec<Vec<f32>>,
    previous: Option<Vec<f32>>,
    expected_len: Option<usize>,
    motion_detected: bool,
    start: Option<usize>,
    end: Option<usize>,
}

impl MotionSegmenter {
    pub fn new() -> Self {
        Self::with_config(SegmenterConfig::default())
    }

    pub fn with_config(config: SegmenterConfig) -> Self {
        Self {
            config,
            history: Vec::new(),
            previous: None,
            expected_len: None,
            motion_detected: false,
            start: None,
            end: None,
        }
    }

    pub fn frames_accepted(&self) -> usize {
        self.history.len()
    }

    pub fn push(&mut self, raw: Vec<f32>) -> ScanAction {
        if self.expected_len.is_none() && !raw.is_empty() {
            self.expected_len = Some(raw.len());
        }
        let expected = match self.expected_len {
            Some(len) => len,
            None => return ScanAction::Continue,
        };

        if raw.len() != expected {
            // detector dropout: with motion in flight this is the end
            if self.motion_detected
                && self.end.is_none()
                && self.history.len() >= self.config.min_frames
            {
                self.end = Some(self.history.len() - 1);
                return ScanAction::Stop;
            }
            return ScanAction::Continue;
        }

        let accepted = match &self.previous {
            Some(prev) => {
                let a = self.config.smoothing_factor;
                prev.iter()
                    .zip(raw.iter())
                    .map(|(p, c)| a * p + (1.0 - a) * c)
                    .collect()
            }
            None => raw,
        };
        self.history.push(accepted.clone());

        let mut action = ScanAction::Continue;
        if self.history.len() >= self.config.min_frames && self.history.len() > 1 {
            let current = self.history.len() - 1;
            let distance = euclidean_distance(&self.history[current - 1], &self.history[current]);

            if distance > self.config.onset_threshold && !self.motion_detected {
                self.motion_detected = true;
                self.start = Some(current);
            } else if self.motion_detected && distance < self.config.offset_threshold {
                self.end = Some(current);
                action = ScanAction::Stop;
            }
        }

        self.previous = Some(accepted);
        action
    }

    pub fn finish(self) -> SegmentOutcome {
        if self.motion_detected {
            return SegmentOutcome {
                window: GestureWindow {
                    // start is always set once motion is flagged
                    start: self.start.unwrap_or(0),
                    end: self.end,
                },
                history: self.history,
                motion_detected: true,
                synthetic: false,
            };
        }

        if self.history.is_empty() {
            warn!("⚠️ no usable landmarks in the whole stream, substituting a zero frame");
            return SegmentOutcome {
                history: vec![vec![0.0; FEATURE_LEN]],
                window: GestureWindow {
                    start: 0,
                    end: Some(0),
                },
                motion_detected: false,
                synthetic: true,
            };
        }

        let last = self.history.len() - 1;
        SegmentOutcome {
            window: GestureWindow {
                start: 0,
                end: Some(last),
            },
            history: self.history,
            motion_detected: false,
            synthetic: false,
        }
    }
}

impl Default for MotionSegmenter {
    fn default() -> Self {
        Self::new()
    }
}

pub fn euclidean_distance(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f32>()
        .sqrt()
}
