//! Dense Hough vote volume.
//!
//! Storage is a single `Vec<u32>` laid out layer-major: each radius index owns
//! one contiguous `width * height` row-major slice. Parallel stages split the
//! buffer into these layers so that every cell has exactly one writer.

mod volume;

pub use volume::ByteVolume;

use crate::util::{HoughError, HoughResult};

/// Vote counts over `(x, y, radius index)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Accumulator {
    width: usize,
    height: usize,
    depth: usize,
    votes: Vec<u32>,
}

impl Accumulator {
    /// Allocates a zeroed volume.
    pub fn new(width: usize, height: usize, depth: usize) -> HoughResult<Self> {
        if width == 0 || height == 0 {
            return Err(HoughError::InvalidDimensions { width, height });
        }
        if depth == 0 {
            return Err(HoughError::InvalidConfig {
                reason: "accumulator depth must be > 0",
            });
        }
        let len = width
            .checked_mul(height)
            .and_then(|v| v.checked_mul(depth))
            .ok_or(HoughError::InvalidDimensions { width, height })?;
        Ok(Self {
            width,
            height,
            depth,
            votes: vec![0; len],
        })
    }

    /// Width in cells (ROI width).
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in cells (ROI height).
    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of radius layers.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Number of cells in one radius layer.
    pub fn layer_len(&self) -> usize {
        self.width * self.height
    }

    /// Vote count at a cell, or `None` outside the volume.
    pub fn get(&self, x: usize, y: usize, radius_idx: usize) -> Option<u32> {
        if x >= self.width || y >= self.height || radius_idx >= self.depth {
            return None;
        }
        Some(self.votes[radius_idx * self.layer_len() + y * self.width + x])
    }

    /// Row-major votes of one radius layer.
    pub fn layer(&self, radius_idx: usize) -> Option<&[u32]> {
        if radius_idx >= self.depth {
            return None;
        }
        let len = self.layer_len();
        let start = radius_idx * len;
        self.votes.get(start..start + len)
    }

    /// All votes, layer-major.
    pub fn as_slice(&self) -> &[u32] {
        &self.votes
    }

    /// Largest vote count in the volume.
    pub fn max_value(&self) -> u32 {
        self.votes.iter().copied().max().unwrap_or(0)
    }

    /// Total number of votes cast.
    pub fn total_votes(&self) -> u64 {
        self.votes.iter().map(|&v| u64::from(v)).sum()
    }

    pub(crate) fn layers_mut(&mut self) -> std::slice::ChunksExactMut<'_, u32> {
        let len = self.layer_len();
        self.votes.chunks_exact_mut(len)
    }

    #[cfg(feature = "rayon")]
    pub(crate) fn par_layers_mut(&mut self) -> rayon::slice::ChunksExactMut<'_, u32> {
        use rayon::slice::ParallelSliceMut;
        let len = self.layer_len();
        self.votes.par_chunks_exact_mut(len)
    }

    #[cfg(feature = "rayon")]
    pub(crate) fn par_layers(&self) -> rayon::slice::ChunksExact<'_, u32> {
        use rayon::slice::ParallelSlice;
        self.votes.par_chunks_exact(self.layer_len())
    }

    pub(crate) fn layers(&self) -> std::slice::ChunksExact<'_, u32> {
        self.votes.chunks_exact(self.layer_len())
    }

    /// Copies `src` into this volume with its origin at `(x0, y0, r0)`.
    ///
    /// Cells of `src` that fall outside this volume are dropped.
    pub fn splice(&mut self, src: &Accumulator, x0: usize, y0: usize, r0: usize) {
        let width = self.width;
        let layer_len = self.layer_len();
        for (sr, src_layer) in src.layers().enumerate() {
            let r = r0 + sr;
            if r >= self.depth {
                break;
            }
            for sy in 0..src.height {
                let y = y0 + sy;
                if y >= self.height || x0 >= width {
                    break;
                }
                let n = src.width.min(width - x0);
                let dst_start = r * layer_len + y * width + x0;
                let src_start = sy * src.width;
                self.votes[dst_start..dst_start + n]
                    .copy_from_slice(&src_layer[src_start..src_start + n]);
            }
        }
    }

    /// Byte-normalized copy for display: `round(v * 255 / max)`.
    pub fn to_byte_volume(&self) -> ByteVolume {
        ByteVolume::from_accumulator(self)
    }
}

#[cfg(test)]
mod tests {
    use super::Accumulator;

    #[test]
    fn layers_are_contiguous_and_disjoint() {
        let mut acc = Accumulator::new(3, 2, 4).unwrap();
        for (idx, layer) in acc.layers_mut().enumerate() {
            layer[0] = idx as u32 + 1;
        }
        for r in 0..4 {
            assert_eq!(acc.get(0, 0, r), Some(r as u32 + 1));
            assert_eq!(acc.layer(r).unwrap().len(), 6);
        }
        assert_eq!(acc.get(3, 0, 0), None);
        assert_eq!(acc.total_votes(), 10);
        assert_eq!(acc.max_value(), 4);
    }

    #[test]
    fn splice_clips_to_destination() {
        let mut src = Accumulator::new(2, 2, 1).unwrap();
        for layer in src.layers_mut() {
            layer.copy_from_slice(&[1, 2, 3, 4]);
        }
        let mut dst = Accumulator::new(3, 3, 2).unwrap();
        dst.splice(&src, 2, 2, 1);
        assert_eq!(dst.get(2, 2, 1), Some(1));
        assert_eq!(dst.total_votes(), 1);
    }
}
