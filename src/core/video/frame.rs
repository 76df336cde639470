use std::time::Duration;

use super::error::VideoError;

/// Fixed contrast/brightness lift applied before landmark detection.
/// Tuned against 640x480 capture; not adaptive.
const CONTRAST_GAIN: f32 = 1.5;
const BRIGHTNESS_OFFSET: f32 = 15.0;

/// 帧数据结构
#[derive(Debug, Clone)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>, // RGBA 格式
    pub timestamp: Duration,
    pub frame_number: u64,
}

impl Frame {
    pub fn new(
        width: u32,
        height: u32,
        data: Vec<u8>,
        timestamp_ms: u64,
        frame_number: u64,
    ) -> Result<Self, VideoError> {
        if data.len() != (width as usize) * (height as usize) * 4 {
            return Err(VideoError::InvalidFrameData {
                width,
                height,
                len: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
            timestamp: Duration::from_millis(timestamp_ms),
            frame_number,
        })
    }

    /// Decode a single frame from an encoded image buffer (JPEG/PNG/BMP).
    pub fn from_encoded(bytes: &[u8]) -> Result<Self, VideoError> {
        let rgba = image::load_from_memory(bytes)?.to_rgba8();
        let (width, height) = rgba.dimensions();
        Ok(Self {
            width,
            height,
            data: rgba.into_raw(),
            timestamp: Duration::ZERO,
            frame_number: 0,
        })
    }

    pub fn pixel_count(&self) -> usize {
        (self.width * self.height) as usize
    }

    /// Linear scale+offset on the color channels, alpha untouched.
    pub fn enhance(&self) -> Frame {
        let mut data = self.data.clone();
        for px in data.chunks_exact_mut(4) {
            for c in px.iter_mut().take(3) {
                *c = (*c as f32 * CONTRAST_GAIN + BRIGHTNESS_OFFSET).clamp(0.0, 255.0) as u8;
            }
        }
        Frame {
            width: self.width,
            height: self.height,
            data,
            timestamp: self.timestamp,
            frame_number: self.frame_number,
        }
    }
}
