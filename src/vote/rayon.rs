//! Rayon-parallel voting (feature-gated).
//!
//! Each radius layer is a disjoint mutable chunk of the accumulator, so the
//! layers can be filled concurrently without synchronization.

use crate::accumulator::Accumulator;
use crate::lut::LookupTable;
use crate::vote::scalar::vote_layer;
use crate::vote::EdgeMap;
use rayon::prelude::*;

/// Fills all layers of `acc`, one task per radius.
pub(crate) fn accumulate_layers_par(acc: &mut Accumulator, edges: &EdgeMap, lut: &LookupTable) {
    let (width, height) = (acc.width(), acc.height());
    acc.par_layers_mut()
        .enumerate()
        .for_each(|(radius_idx, layer)| {
            vote_layer(layer, width, height, edges.points(), lut.offsets(radius_idx));
        });
}
