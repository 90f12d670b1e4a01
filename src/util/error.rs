//! Error types for houghcircles.

use thiserror::Error;

/// Result alias for houghcircles operations.
pub type HoughResult<T> = std::result::Result<T, HoughError>;

/// Errors that can occur when configuring or running the circle transform.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HoughError {
    /// Width or height is zero or overflows the address space.
    #[error("invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },
    /// Row stride is smaller than the row width.
    #[error("invalid stride {stride} for width {width}")]
    InvalidStride { width: usize, stride: usize },
    /// Backing buffer cannot hold the described image.
    #[error("buffer too small: needed {needed} elements, got {got}")]
    BufferTooSmall { needed: usize, got: usize },
    /// Region of interest does not fit inside the image.
    #[error(
        "roi at ({x}, {y}) of size {width}x{height} exceeds image of size {img_width}x{img_height}"
    )]
    RoiOutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
        img_width: usize,
        img_height: usize,
    },
    /// The radius increment does not evenly divide the radius span.
    #[error("radius increment {radius_inc} does not divide {radius_max} - {radius_min}")]
    RadiusIncrement {
        radius_min: usize,
        radius_max: usize,
        radius_inc: usize,
    },
    /// A configuration value is outside its valid domain.
    #[error("invalid config: {reason}")]
    InvalidConfig { reason: &'static str },
    /// An index was outside the valid range for a container.
    #[error("{context} index {index} out of bounds (len {len})")]
    IndexOutOfBounds {
        index: usize,
        len: usize,
        context: &'static str,
    },
    /// Image decoding failed (only produced with the `image-io` feature).
    #[error("image io: {reason}")]
    ImageIo { reason: String },
}
