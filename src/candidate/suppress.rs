//! Clearing the neighborhood of an extracted circle.

use crate::accumulator::Accumulator;

/// Zeroes every cell, in all radius layers, closer than `radius * ratio` to
/// `(x, y)`. The center column itself is always cleared so that a zero-size
/// zone cannot yield the same peak twice.
pub fn suppress_neighbors(
    acc: &mut Accumulator,
    x: usize,
    y: usize,
    radius: usize,
    ratio: f64,
    parallel: bool,
) {
    let reach = radius as f64 * ratio;
    let reach_sq = reach * reach;
    let half = reach.ceil().max(0.0) as usize;
    let width = acc.width();
    let x0 = x.saturating_sub(half);
    let y0 = y.saturating_sub(half);
    let x1 = x.saturating_add(half).min(width - 1);
    let y1 = y.saturating_add(half).min(acc.height() - 1);

    let clear = |layer: &mut [u32]| {
        for cy in y0..=y1 {
            let dy = cy as f64 - y as f64;
            let row = &mut layer[cy * width..(cy + 1) * width];
            for (cx, cell) in row.iter_mut().enumerate().take(x1 + 1).skip(x0) {
                let dx = cx as f64 - x as f64;
                if dx * dx + dy * dy < reach_sq {
                    *cell = 0;
                }
            }
        }
        if x < width && y * width + x < layer.len() {
            layer[y * width + x] = 0;
        }
    };

    #[cfg(feature = "rayon")]
    if parallel {
        use rayon::prelude::*;
        acc.par_layers_mut().for_each(clear);
        return;
    }
    #[cfg(not(feature = "rayon"))]
    let _ = parallel;

    acc.layers_mut().for_each(clear);
}

#[cfg(test)]
mod tests {
    use super::suppress_neighbors;
    use crate::accumulator::Accumulator;

    fn filled(width: usize, height: usize, depth: usize) -> Accumulator {
        let mut acc = Accumulator::new(width, height, depth).unwrap();
        for layer in acc.layers_mut() {
            layer.fill(1);
        }
        acc
    }

    #[test]
    fn clears_disc_in_every_layer() {
        let mut acc = filled(9, 9, 3);
        suppress_neighbors(&mut acc, 4, 4, 2, 1.0, false);
        for r in 0..3 {
            assert_eq!(acc.get(4, 4, r), Some(0));
            assert_eq!(acc.get(5, 5, r), Some(0));
            // Distance exactly 2 is kept (strict comparison).
            assert_eq!(acc.get(6, 4, r), Some(1));
            assert_eq!(acc.get(0, 0, r), Some(1));
        }
    }

    #[test]
    fn zone_is_clipped_at_borders() {
        let mut acc = filled(5, 5, 1);
        suppress_neighbors(&mut acc, 0, 0, 10, 1.0, false);
        assert_eq!(acc.total_votes(), 0);
    }

    #[test]
    fn zero_ratio_still_clears_center() {
        let mut acc = filled(3, 3, 2);
        suppress_neighbors(&mut acc, 1, 1, 4, 0.0, false);
        assert_eq!(acc.total_votes(), 16);
        assert_eq!(acc.get(1, 1, 1), Some(0));
    }
}
