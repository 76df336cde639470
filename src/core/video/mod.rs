//! 视频帧层 - frame type, fixed pre-detection enhancement, video source seam

pub mod error;
pub mod frame;
pub mod source;

pub use error::VideoError;
pub use frame::Frame;
pub use source::{FrameSequence, VideoSource};
