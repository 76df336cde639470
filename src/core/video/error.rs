use thiserror::Error;

#[derive(Debug, Error)]
pub enum VideoError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("frame decode error: {0}")]
    Decode(#[from] image::ImageError),
    #[error("invalid frame data: {width}x{height} with {len} bytes")]
    InvalidFrameData { width: u32, height: u32, len: usize },
}
