//! 手势管线 - per-frame features, motion segmentation, window aggregation
//!
//! Data flow: frames -> feature vectors -> gesture window -> one
//! aggregated vector. The segmenter terminates a scan early once the
//! gesture offset is found.

pub mod aggregator;
pub mod features;
pub mod pipeline;
pub mod segmenter;

pub use aggregator::{aggregate, dominant_length};
pub use features::{frame_features, FEATURE_LEN, MAX_TRACKED_HANDS};
pub use pipeline::{GestureScanner, ScanOutcome, ScanQuality};
pub use segmenter::{GestureWindow, MotionSegmenter, ScanAction, SegmentOutcome, SegmenterConfig};
