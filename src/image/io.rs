//! Convenience helpers for loading frames via the `image` crate.
//!
//! Available when the `image-io` feature is enabled. Frames are converted to
//! 8-bit luma; nonzero pixels are treated as boundary pixels, so inputs are
//! expected to be binarized edge maps already.

use crate::image::{ImageView, OwnedImage};
use crate::util::{HoughError, HoughResult};
use std::path::Path;

/// Creates a borrowed view from a grayscale image buffer.
pub fn view_from_gray_image(img: &image::GrayImage) -> HoughResult<ImageView<'_, u8>> {
    let width = img.width() as usize;
    let height = img.height() as usize;
    ImageView::from_slice(img.as_raw(), width, height)
}

/// Creates an owned frame from a dynamic image.
pub fn owned_from_dynamic_image(img: &image::DynamicImage) -> HoughResult<OwnedImage<u8>> {
    let gray = img.to_luma8();
    let width = gray.width() as usize;
    let height = gray.height() as usize;
    OwnedImage::new(gray.into_raw(), width, height)
}

/// Loads an image from disk and converts it to an 8-bit grayscale frame.
pub fn load_gray_image<P: AsRef<Path>>(path: P) -> HoughResult<OwnedImage<u8>> {
    let img = image::open(path).map_err(|err| HoughError::ImageIo {
        reason: err.to_string(),
    })?;
    owned_from_dynamic_image(&img)
}
