//! Global and windowed maximum search with deterministic tie-breaking.
//!
//! Every search visits cells in the same canonical order: radius layers
//! ascending, then rows, then columns. A later cell replaces the current best
//! only if it has strictly more votes, so ties resolve to the first cell in
//! canonical order regardless of how layers are distributed across workers.

use crate::accumulator::Accumulator;
use crate::vote::SearchWindow;
#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// Accumulator cell holding a local or global maximum.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellPeak {
    /// Column of the cell.
    pub x: usize,
    /// Row of the cell.
    pub y: usize,
    /// Radius layer of the cell.
    pub radius_idx: usize,
    /// Vote count at the cell.
    pub votes: u32,
}

/// First maximum of one layer in row-major order.
pub(crate) fn layer_max(layer: &[u32], width: usize, radius_idx: usize) -> CellPeak {
    let mut best_idx = 0usize;
    let mut best = 0u32;
    for (idx, &votes) in layer.iter().enumerate() {
        if votes > best {
            best = votes;
            best_idx = idx;
        }
    }
    CellPeak {
        x: best_idx % width,
        y: best_idx / width,
        radius_idx,
        votes: best,
    }
}

/// Merges per-layer results in the order given, keeping the first strict maximum.
pub(crate) fn combine(peaks: impl IntoIterator<Item = CellPeak>) -> Option<CellPeak> {
    let mut best: Option<CellPeak> = None;
    for peak in peaks {
        match best {
            Some(current) if peak.votes <= current.votes => {}
            _ => best = Some(peak),
        }
    }
    best
}

/// Global maximum of the accumulator.
///
/// For an all-zero volume this is cell `(0, 0, 0)` with zero votes.
pub fn find_peak(acc: &Accumulator, parallel: bool) -> CellPeak {
    let width = acc.width();
    let fallback = CellPeak {
        x: 0,
        y: 0,
        radius_idx: 0,
        votes: 0,
    };

    #[cfg(feature = "rayon")]
    if parallel {
        // `collect` keeps layer order, so the combine below is schedule-independent.
        let per_layer: Vec<CellPeak> = acc
            .par_layers()
            .enumerate()
            .map(|(r, layer)| layer_max(layer, width, r))
            .collect();
        return combine(per_layer).unwrap_or(fallback);
    }
    #[cfg(not(feature = "rayon"))]
    let _ = parallel;

    combine(
        acc.layers()
            .enumerate()
            .map(|(r, layer)| layer_max(layer, width, r)),
    )
    .unwrap_or(fallback)
}

/// Maximum of the accumulator restricted to `window`.
pub fn find_peak_in_window(acc: &Accumulator, window: &SearchWindow) -> CellPeak {
    let width = acc.width();
    let x_end = (window.x0 + window.width).min(acc.width());
    let y_end = (window.y0 + window.height).min(acc.height());
    let r_end = (window.r0 + window.depth).min(acc.depth());
    let mut best = CellPeak {
        x: window.x0,
        y: window.y0,
        radius_idx: window.r0,
        votes: 0,
    };
    for r in window.r0..r_end {
        let Some(layer) = acc.layer(r) else { break };
        for y in window.y0..y_end {
            let row = &layer[y * width..(y + 1) * width];
            for x in window.x0..x_end {
                if row[x] > best.votes {
                    best = CellPeak {
                        x,
                        y,
                        radius_idx: r,
                        votes: row[x],
                    };
                }
            }
        }
    }
    best
}
