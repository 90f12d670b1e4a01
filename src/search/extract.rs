//! Iterative peak extraction on a full accumulator.

use crate::accumulator::Accumulator;
use crate::candidate::peak::find_peak;
use crate::candidate::suppress::suppress_neighbors;
use crate::search::{Circle, CircleDetector};
use crate::trace::trace_span;

/// Repeatedly takes the global maximum, records it and clears its
/// neighborhood, until `limit` circles are found or the best remaining cell
/// falls below the detector's vote threshold.
///
/// Circles come out in extraction order, which is non-increasing in votes.
pub(crate) fn extract_circles(
    acc: &mut Accumulator,
    detector: &CircleDetector,
    limit: usize,
) -> Vec<Circle> {
    let _span = trace_span!("extract_peaks", limit = limit).entered();
    let cfg = detector.config();
    let radii = detector.lut().radii();
    let threshold = detector.vote_threshold();

    let mut circles = Vec::with_capacity(limit);
    while circles.len() < limit {
        let peak = find_peak(acc, cfg.parallel);
        if peak.votes < threshold {
            break;
        }
        let radius = radii.radius_at(peak.radius_idx);
        circles.push(Circle {
            id: None,
            x: peak.x,
            y: peak.y,
            radius,
            score: peak.votes,
        });
        suppress_neighbors(
            acc,
            peak.x,
            peak.y,
            radius,
            cfg.suppression_ratio,
            cfg.parallel,
        );
    }
    circles
}
