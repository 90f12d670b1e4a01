//! Vote accumulation over boundary pixels.
//!
//! A frame is first reduced to an [`EdgeMap`] (the list of nonzero pixels plus
//! a membership mask). Full-frame accumulation scatters votes from every edge
//! pixel through the lookup table into one radius layer per task. Window
//! accumulation computes the same cell values for a small sub-volume by
//! gathering: cell `c` at radius `r` counts the offsets `o` for which `c - o`
//! is an edge pixel.

pub(crate) mod scalar;

#[cfg(feature = "rayon")]
pub(crate) mod rayon;

use crate::accumulator::Accumulator;
use crate::image::{EdgeValue, ImageView};
use crate::lut::LookupTable;
use crate::trace::{trace_event, trace_span};
use crate::util::{HoughError, HoughResult};

/// Boundary pixels of one frame region.
#[derive(Clone, Debug)]
pub struct EdgeMap {
    width: usize,
    height: usize,
    points: Vec<(usize, usize)>,
    mask: Vec<bool>,
}

impl EdgeMap {
    /// Collects nonzero pixels of `view` in row-major order.
    pub fn from_view<T: EdgeValue>(view: ImageView<'_, T>) -> HoughResult<Self> {
        let width = view.width();
        let height = view.height();
        let mut mask = vec![false; width * height];
        let mut points = Vec::new();
        for y in 0..height {
            let row = view.row(y).ok_or(HoughError::BufferTooSmall {
                needed: y * view.stride() + width,
                got: view.as_slice().len(),
            })?;
            for (x, value) in row.iter().enumerate() {
                if value.is_edge() {
                    mask[y * width + x] = true;
                    points.push((x, y));
                }
            }
        }
        trace_event!("edges", count = points.len());
        Ok(Self {
            width,
            height,
            points,
            mask,
        })
    }

    /// Region width.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Region height.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of boundary pixels.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True if the region holds no boundary pixels.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Boundary pixel coordinates in row-major order.
    pub fn points(&self) -> &[(usize, usize)] {
        &self.points
    }

    /// Returns true if `(x, y)` lies inside the region and is a boundary pixel.
    #[inline]
    pub fn contains(&self, x: i64, y: i64) -> bool {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return false;
        }
        self.mask[y as usize * self.width + x as usize]
    }
}

/// Sub-volume of the accumulator: an inclusive pixel window and radius band.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SearchWindow {
    /// Left column of the window.
    pub x0: usize,
    /// Top row of the window.
    pub y0: usize,
    /// Window width in cells.
    pub width: usize,
    /// Window height in cells.
    pub height: usize,
    /// First radius index covered.
    pub r0: usize,
    /// Number of radius layers covered.
    pub depth: usize,
}

impl SearchWindow {
    /// Window of `±search_radius` around `(x, y)` and `±search_band` around
    /// `radius`, clamped to a `width x height` region and to the radius grid.
    pub fn around(
        lut: &LookupTable,
        width: usize,
        height: usize,
        (x, y, radius): (usize, usize, usize),
        search_radius: usize,
        search_band: usize,
    ) -> HoughResult<Self> {
        if width == 0 || height == 0 {
            return Err(HoughError::InvalidDimensions { width, height });
        }
        let x = x.min(width - 1);
        let y = y.min(height - 1);
        let x0 = x.saturating_sub(search_radius);
        let y0 = y.saturating_sub(search_radius);
        let x1 = x.saturating_add(search_radius).min(width - 1);
        let y1 = y.saturating_add(search_radius).min(height - 1);
        let band = lut.radii().band_indices(radius, search_band);
        let r0 = *band.start();
        let depth = band.end() - r0 + 1;
        Ok(Self {
            x0,
            y0,
            width: x1 - x0 + 1,
            height: y1 - y0 + 1,
            r0,
            depth,
        })
    }

    /// Returns true if the accumulator cell lies inside the window.
    pub fn contains(&self, x: usize, y: usize, radius_idx: usize) -> bool {
        x >= self.x0
            && x < self.x0 + self.width
            && y >= self.y0
            && y < self.y0 + self.height
            && radius_idx >= self.r0
            && radius_idx < self.r0 + self.depth
    }
}

/// Builds the full-frame accumulator for `edges`.
///
/// With `parallel` set (and the `rayon` feature enabled) radius layers are
/// filled concurrently; the result is identical either way.
pub fn accumulate(edges: &EdgeMap, lut: &LookupTable, parallel: bool) -> HoughResult<Accumulator> {
    let _span = trace_span!(
        "accumulate",
        edges = edges.len(),
        depth = lut.radii().len(),
        parallel = parallel
    )
    .entered();

    let mut acc = Accumulator::new(edges.width(), edges.height(), lut.radii().len())?;
    if edges.is_empty() {
        return Ok(acc);
    }

    fill_layers(&mut acc, edges, lut, parallel);
    Ok(acc)
}

#[cfg(feature = "rayon")]
fn fill_layers(acc: &mut Accumulator, edges: &EdgeMap, lut: &LookupTable, parallel: bool) {
    if parallel {
        rayon::accumulate_layers_par(acc, edges, lut);
    } else {
        scalar::accumulate_layers(acc, edges, lut);
    }
}

#[cfg(not(feature = "rayon"))]
fn fill_layers(acc: &mut Accumulator, edges: &EdgeMap, lut: &LookupTable, _parallel: bool) {
    scalar::accumulate_layers(acc, edges, lut);
}

/// Builds a local accumulator covering `window` only.
///
/// Cell `(i, j, k)` of the result equals cell `(x0 + i, y0 + j, r0 + k)` of
/// the full-frame accumulator.
pub fn accumulate_window(
    edges: &EdgeMap,
    lut: &LookupTable,
    window: &SearchWindow,
) -> HoughResult<Accumulator> {
    if window.r0 + window.depth > lut.radii().len() {
        return Err(HoughError::IndexOutOfBounds {
            index: window.r0 + window.depth - 1,
            len: lut.radii().len(),
            context: "radius",
        });
    }
    let mut acc = Accumulator::new(window.width, window.height, window.depth)?;
    if !edges.is_empty() {
        scalar::gather_window(&mut acc, edges, lut, window);
    }
    Ok(acc)
}
