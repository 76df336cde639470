use std::collections::VecDeque;

use super::error::VideoError;
use super::frame::Frame;

/// A decodable sequence of frames. Implementations are consumed until
/// exhaustion or until the caller stops reading early.
pub trait VideoSource: Send {
    fn next_frame(&mut self) -> Result<Option<Frame>, VideoError>;
}

/// In-memory video source over already-decoded frames.
pub struct FrameSequence {
    frames: VecDeque<Frame>,
}

impl FrameSequence {
    pub fn new(frames: Vec<Frame>) -> Self {
        Self {
            frames: frames.into(),
        }
    }

    pub fn empty() -> Self {
        Self {
            frames: VecDeque::new(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

impl VideoSource for FrameSequence {
    fn next_frame(&mut self) -> Result<Option<Frame>, VideoError> {
        Ok(self.frames.pop_front())
    }
}
