//! Houghcircles detects circles of unknown center and radius with a Hough
//! transform over `(x, y, radius)`.
//!
//! Boundary pixels (any nonzero input value) vote through a precomputed
//! lookup table into a dense accumulator; circles are extracted as successive
//! global maxima with neighborhood suppression. Image stacks can be tracked
//! frame to frame with a local window search. Parallelism is provided by the
//! `rayon` feature (enabled by default).

pub mod accumulator;
mod candidate;
pub mod image;
pub mod lowlevel;
pub mod lut;
pub mod search;
mod trace;
pub mod util;
pub mod vote;

#[cfg(feature = "image-io")]
pub use image::io;

pub use accumulator::{Accumulator, ByteVolume};
pub use image::{EdgeValue, ImageView, OwnedImage, Roi};
pub use lut::{LookupTable, LutConfig, LutReference, RadiusGrid};
pub use search::{
    Circle, CircleDetector, CircleTracker, DetectConfig, FrameDetections, LocalSearchConfig,
    SearchKind, StopMode, TrackedCircle,
};
pub use util::{HoughError, HoughResult};
