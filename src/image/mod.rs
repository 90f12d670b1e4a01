//! Image views, owned frames and regions of interest.
//!
//! `ImageView` is a borrowed 2D view into a 1D buffer with an explicit stride.
//! The stride counts elements between the starts of consecutive rows, so a
//! stride larger than the width represents padded rows. ROI slices are zero-copy
//! views into the same backing slice and retain the original stride.

use crate::util::{HoughError, HoughResult};

#[cfg(feature = "image-io")]
pub mod io;

/// Pixel types that can mark boundary pixels.
///
/// Any nonzero value is a candidate boundary pixel; edge detection and
/// normalization happen upstream of the transform.
pub trait EdgeValue: Copy {
    /// Returns true if the pixel takes part in voting.
    fn is_edge(self) -> bool;
}

impl EdgeValue for u8 {
    #[inline]
    fn is_edge(self) -> bool {
        self != 0
    }
}

impl EdgeValue for u16 {
    #[inline]
    fn is_edge(self) -> bool {
        self != 0
    }
}

impl EdgeValue for f32 {
    #[inline]
    fn is_edge(self) -> bool {
        self != 0.0
    }
}

impl EdgeValue for f64 {
    #[inline]
    fn is_edge(self) -> bool {
        self != 0.0
    }
}

/// Rectangular region of interest in image coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Roi {
    /// Left column of the region.
    pub x: usize,
    /// Top row of the region.
    pub y: usize,
    /// Region width in pixels.
    pub width: usize,
    /// Region height in pixels.
    pub height: usize,
}

impl Roi {
    /// Creates a region from its offset and size.
    pub fn new(x: usize, y: usize, width: usize, height: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Region covering a whole `width x height` image.
    pub fn full(width: usize, height: usize) -> Self {
        Self::new(0, 0, width, height)
    }
}

/// Borrowed 2D image view with an explicit stride.
#[derive(Copy, Clone)]
pub struct ImageView<'a, T> {
    data: &'a [T],
    width: usize,
    height: usize,
    stride: usize,
}

impl<'a, T> ImageView<'a, T> {
    /// Creates a contiguous view with `stride == width`.
    pub fn from_slice(data: &'a [T], width: usize, height: usize) -> HoughResult<Self> {
        Self::new(data, width, height, width)
    }

    /// Creates a view with an explicit stride.
    pub fn new(data: &'a [T], width: usize, height: usize, stride: usize) -> HoughResult<Self> {
        let needed = required_len(width, height, stride)?;
        if data.len() < needed {
            return Err(HoughError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
            stride,
        })
    }

    /// Returns the image width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the image height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the stride in elements between row starts.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Returns the backing slice including any row padding.
    pub fn as_slice(&self) -> &'a [T] {
        self.data
    }

    /// Returns the element at `(x, y)` if it is within bounds.
    pub fn get(&self, x: usize, y: usize) -> Option<&'a T> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = y.checked_mul(self.stride)?.checked_add(x)?;
        self.data.get(idx)
    }

    /// Returns a contiguous slice for row `y` with length `width`.
    pub fn row(&self, y: usize) -> Option<&'a [T]> {
        if y >= self.height {
            return None;
        }
        let start = y.checked_mul(self.stride)?;
        let end = start.checked_add(self.width)?;
        self.data.get(start..end)
    }

    /// Returns a zero-copy view of `roi` into the same backing buffer.
    pub fn roi(&self, roi: Roi) -> HoughResult<ImageView<'a, T>> {
        let Roi {
            x,
            y,
            width,
            height,
        } = roi;
        if width == 0 || height == 0 {
            return Err(HoughError::InvalidDimensions { width, height });
        }

        let out_of_bounds = HoughError::RoiOutOfBounds {
            x,
            y,
            width,
            height,
            img_width: self.width,
            img_height: self.height,
        };
        let end_x = x.checked_add(width).ok_or_else(|| out_of_bounds.clone())?;
        let end_y = y.checked_add(height).ok_or_else(|| out_of_bounds.clone())?;
        if end_x > self.width || end_y > self.height {
            return Err(out_of_bounds);
        }

        let start = y
            .checked_mul(self.stride)
            .and_then(|v| v.checked_add(x))
            .ok_or(HoughError::InvalidDimensions {
                width: self.width,
                height: self.height,
            })?;
        let data = self.data.get(start..).ok_or(HoughError::BufferTooSmall {
            needed: start.saturating_add(1),
            got: self.data.len(),
        })?;

        ImageView::new(data, width, height, self.stride)
    }
}

impl<T: EdgeValue> ImageView<'_, T> {
    /// Counts boundary pixels in the view.
    pub fn count_edges(&self) -> usize {
        (0..self.height)
            .filter_map(|y| self.row(y))
            .map(|row| row.iter().filter(|v| v.is_edge()).count())
            .sum()
    }
}

/// Owned contiguous image buffer.
#[derive(Clone, Debug)]
pub struct OwnedImage<T> {
    data: Vec<T>,
    width: usize,
    height: usize,
}

impl<T> OwnedImage<T> {
    /// Wraps a contiguous row-major buffer of exactly `width * height` pixels.
    pub fn new(data: Vec<T>, width: usize, height: usize) -> HoughResult<Self> {
        if width == 0 || height == 0 {
            return Err(HoughError::InvalidDimensions { width, height });
        }
        let needed = width
            .checked_mul(height)
            .ok_or(HoughError::InvalidDimensions { width, height })?;
        if data.len() < needed {
            return Err(HoughError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        if data.len() > needed {
            return Err(HoughError::InvalidDimensions { width, height });
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Returns the image width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the image height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the pixel buffer in row-major order.
    pub fn data(&self) -> &[T] {
        &self.data
    }

    /// Returns a borrowed view of the image.
    pub fn view(&self) -> ImageView<'_, T> {
        ImageView {
            data: &self.data,
            width: self.width,
            height: self.height,
            stride: self.width,
        }
    }
}

fn required_len(width: usize, height: usize, stride: usize) -> HoughResult<usize> {
    if width == 0 || height == 0 {
        return Err(HoughError::InvalidDimensions { width, height });
    }
    if stride < width {
        return Err(HoughError::InvalidStride { width, stride });
    }
    let needed = (height - 1)
        .checked_mul(stride)
        .and_then(|v| v.checked_add(width))
        .ok_or(HoughError::InvalidDimensions { width, height })?;
    Ok(needed)
}
