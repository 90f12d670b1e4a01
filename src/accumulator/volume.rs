//! 8-bit rendition of the vote volume for visualization.

use crate::accumulator::Accumulator;

/// Byte-normalized accumulator, same layout as [`Accumulator`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ByteVolume {
    width: usize,
    height: usize,
    depth: usize,
    max_votes: u32,
    data: Vec<u8>,
}

impl ByteVolume {
    pub(crate) fn from_accumulator(acc: &Accumulator) -> Self {
        let max_votes = acc.max_value();
        let data = if max_votes == 0 {
            vec![0u8; acc.as_slice().len()]
        } else {
            let max = f64::from(max_votes);
            acc.as_slice()
                .iter()
                .map(|&v| (f64::from(v) * 255.0 / max).round() as u8)
                .collect()
        };
        Self {
            width: acc.width(),
            height: acc.height(),
            depth: acc.depth(),
            max_votes,
            data,
        }
    }

    /// Width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of radius layers.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Vote count mapped to 255.
    pub fn max_votes(&self) -> u32 {
        self.max_votes
    }

    /// Row-major bytes of one radius layer.
    pub fn layer(&self, radius_idx: usize) -> Option<&[u8]> {
        let len = self.width * self.height;
        let start = radius_idx.checked_mul(len)?;
        if radius_idx >= self.depth {
            return None;
        }
        self.data.get(start..start + len)
    }

    /// All bytes, layer-major.
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }
}
