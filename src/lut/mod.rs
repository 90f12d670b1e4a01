//! Precomputed circle-boundary offsets per sampled radius.
//!
//! For each radius the boundary is sampled at `resolution` equally spaced
//! angles `2πk / resolution` and rounded half away from zero to integer
//! `(dx, dy)` offsets. With deduplication enabled, consecutive repeats at the
//! reference radius are collapsed; the surviving count becomes the effective
//! resolution and every other radius is resampled at that resolution, so all
//! rows of the table have the same length.

mod radii;

pub use radii::RadiusGrid;

use crate::trace::trace_event;
use crate::util::{HoughError, HoughResult};

/// Radius whose unique offset count defines the effective resolution.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LutReference {
    /// Use the smallest sampled radius.
    Smallest,
    /// Use the largest sampled radius. Pushes the low-resolution harmonic
    /// below the search range.
    #[default]
    Largest,
}

/// Configuration for building a lookup table.
#[derive(Clone, Copy, Debug)]
pub struct LutConfig {
    /// Smallest radius searched.
    pub radius_min: usize,
    /// Largest radius searched.
    pub radius_max: usize,
    /// Step between searched radii; must divide `radius_max - radius_min`.
    pub radius_inc: usize,
    /// Requested number of votes per boundary pixel and radius.
    pub resolution: usize,
    /// Collapse consecutive duplicate offsets at the reference radius.
    pub dedup: bool,
    /// Radius used to derive the effective resolution when deduplicating.
    pub reference: LutReference,
}

impl Default for LutConfig {
    fn default() -> Self {
        Self {
            radius_min: 10,
            radius_max: 100,
            radius_inc: 2,
            resolution: 1000,
            dedup: false,
            reference: LutReference::Largest,
        }
    }
}

/// Integer offset from a boundary pixel to a candidate center.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Offset {
    /// Column offset.
    pub dx: i32,
    /// Row offset.
    pub dy: i32,
}

/// Offset table indexed by `[radius index][lut index]`.
#[derive(Clone, Debug, PartialEq)]
pub struct LookupTable {
    radii: RadiusGrid,
    lut_size: usize,
    offsets: Vec<Offset>,
}

impl LookupTable {
    /// Builds the table for `cfg`.
    pub fn build(cfg: &LutConfig) -> HoughResult<Self> {
        let radii = RadiusGrid::new(cfg.radius_min, cfg.radius_max, cfg.radius_inc)?;
        if cfg.resolution == 0 {
            return Err(HoughError::InvalidConfig {
                reason: "resolution must be > 0",
            });
        }

        let reference_radius = match cfg.reference {
            LutReference::Smallest => radii.min(),
            LutReference::Largest => radii.max(),
        };
        let reference_row = if cfg.dedup {
            Some(dedup_consecutive(sample_ring(reference_radius, cfg.resolution)))
        } else {
            None
        };
        let lut_size = reference_row
            .as_ref()
            .map_or(cfg.resolution, |row| row.len());

        let mut offsets = Vec::with_capacity(radii.len() * lut_size);
        for radius in radii.iter() {
            match &reference_row {
                Some(row) if radius == reference_radius => offsets.extend_from_slice(row),
                _ => offsets.extend(sample_ring(radius, lut_size)),
            }
        }
        debug_assert_eq!(offsets.len(), radii.len() * lut_size);

        trace_event!(
            "lut_built",
            radii = radii.len(),
            requested = cfg.resolution,
            lut_size = lut_size
        );
        Ok(Self {
            radii,
            lut_size,
            offsets,
        })
    }

    /// Radius sampling shared by the table and the accumulator.
    pub fn radii(&self) -> &RadiusGrid {
        &self.radii
    }

    /// Effective resolution: offsets per radius (maximum votes per cell).
    pub fn lut_size(&self) -> usize {
        self.lut_size
    }

    /// Offsets for a radius index.
    pub fn offsets(&self, radius_idx: usize) -> &[Offset] {
        let start = radius_idx * self.lut_size;
        &self.offsets[start..start + self.lut_size]
    }

    /// Offsets for a radius index, or an error if the index is out of range.
    pub fn try_offsets(&self, radius_idx: usize) -> HoughResult<&[Offset]> {
        if radius_idx >= self.radii.len() {
            return Err(HoughError::IndexOutOfBounds {
                index: radius_idx,
                len: self.radii.len(),
                context: "radius",
            });
        }
        Ok(self.offsets(radius_idx))
    }
}

fn sample_ring(radius: usize, resolution: usize) -> impl Iterator<Item = Offset> {
    let r = radius as f64;
    (0..resolution).map(move |step| {
        let angle = 2.0 * std::f64::consts::PI * step as f64 / resolution as f64;
        let (sin, cos) = angle.sin_cos();
        // `f64::round` rounds half away from zero.
        Offset {
            dx: (r * cos).round() as i32,
            dy: (r * sin).round() as i32,
        }
    })
}

fn dedup_consecutive(samples: impl Iterator<Item = Offset>) -> Vec<Offset> {
    let mut out: Vec<Offset> = Vec::new();
    for offset in samples {
        if out.last() != Some(&offset) {
            out.push(offset);
        }
    }
    out
}
