//! Sequential voting kernels.

use crate::accumulator::Accumulator;
use crate::lut::{LookupTable, Offset};
use crate::vote::{EdgeMap, SearchWindow};

/// Scatters votes from every edge pixel into one radius layer.
#[inline]
pub(crate) fn vote_layer(
    layer: &mut [u32],
    width: usize,
    height: usize,
    edges: &[(usize, usize)],
    offsets: &[Offset],
) {
    let (w, h) = (width as i64, height as i64);
    for &(x, y) in edges {
        let (x, y) = (x as i64, y as i64);
        for offset in offsets {
            let a = x + i64::from(offset.dx);
            let b = y + i64::from(offset.dy);
            if a >= 0 && a < w && b >= 0 && b < h {
                layer[b as usize * width + a as usize] += 1;
            }
        }
    }
}

/// Fills all layers of `acc` one after another.
pub(crate) fn accumulate_layers(acc: &mut Accumulator, edges: &EdgeMap, lut: &LookupTable) {
    let (width, height) = (acc.width(), acc.height());
    for (radius_idx, layer) in acc.layers_mut().enumerate() {
        vote_layer(layer, width, height, edges.points(), lut.offsets(radius_idx));
    }
}

/// Computes window cells by counting offsets that point back at edge pixels.
pub(crate) fn gather_window(
    acc: &mut Accumulator,
    edges: &EdgeMap,
    lut: &LookupTable,
    window: &SearchWindow,
) {
    let width = window.width;
    for (k, layer) in acc.layers_mut().enumerate() {
        let offsets = lut.offsets(window.r0 + k);
        for j in 0..window.height {
            let cy = (window.y0 + j) as i64;
            for i in 0..width {
                let cx = (window.x0 + i) as i64;
                let votes = offsets
                    .iter()
                    .filter(|o| edges.contains(cx - i64::from(o.dx), cy - i64::from(o.dy)))
                    .count();
                layer[j * width + i] = votes as u32;
            }
        }
    }
}
