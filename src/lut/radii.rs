//! Discrete radius sampling for the accumulator depth axis.

use crate::util::{HoughError, HoughResult};

/// Evenly spaced, inclusive radius range `radius_min..=radius_max`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RadiusGrid {
    min: usize,
    max: usize,
    inc: usize,
}

impl RadiusGrid {
    /// Creates a grid; `inc` must be positive and divide `max - min`.
    pub fn new(min: usize, max: usize, inc: usize) -> HoughResult<Self> {
        if inc == 0 {
            return Err(HoughError::InvalidConfig {
                reason: "radius_inc must be > 0",
            });
        }
        if max < min {
            return Err(HoughError::InvalidConfig {
                reason: "radius_max must be >= radius_min",
            });
        }
        if max == 0 {
            return Err(HoughError::InvalidConfig {
                reason: "radius_max must be > 0",
            });
        }
        if (max - min) % inc != 0 {
            return Err(HoughError::RadiusIncrement {
                radius_min: min,
                radius_max: max,
                radius_inc: inc,
            });
        }
        Ok(Self { min, max, inc })
    }

    /// Smallest sampled radius.
    pub fn min(&self) -> usize {
        self.min
    }

    /// Largest sampled radius.
    pub fn max(&self) -> usize {
        self.max
    }

    /// Step between sampled radii.
    pub fn inc(&self) -> usize {
        self.inc
    }

    /// Number of sampled radii (accumulator depth).
    pub fn len(&self) -> usize {
        (self.max - self.min) / self.inc + 1
    }

    /// Always false; a valid grid holds at least one radius.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Radius for a layer index.
    pub fn radius_at(&self, idx: usize) -> usize {
        debug_assert!(idx < self.len());
        self.min + idx * self.inc
    }

    /// Layer index of `radius`, or `None` if it is not on the grid.
    pub fn index_of(&self, radius: usize) -> Option<usize> {
        if radius < self.min || radius > self.max || (radius - self.min) % self.inc != 0 {
            return None;
        }
        Some((radius - self.min) / self.inc)
    }

    /// Iterates over all sampled radii in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.len()).map(|idx| self.radius_at(idx))
    }

    /// Layer indices whose radius lies within `band` of `radius`, clamped to the grid.
    pub fn band_indices(&self, radius: usize, band: usize) -> std::ops::RangeInclusive<usize> {
        let lo = radius.saturating_sub(band).max(self.min);
        let hi = radius.saturating_add(band).min(self.max);
        if lo > hi {
            // Radius lies outside the grid by more than `band`; fall back to
            // the nearest end layer.
            let idx = if radius < self.min { 0 } else { self.len() - 1 };
            return idx..=idx;
        }
        let first = (lo - self.min).div_ceil(self.inc);
        let last = (hi - self.min) / self.inc;
        if first > last {
            // The band falls strictly between two samples.
            let nearest = ((radius.clamp(self.min, self.max) - self.min) + self.inc / 2) / self.inc;
            let nearest = nearest.min(self.len() - 1);
            return nearest..=nearest;
        }
        first..=last
    }
}
