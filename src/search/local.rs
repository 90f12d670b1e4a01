//! Window search around tracked circles.
//!
//! Each tracked circle gets its own small accumulator covering
//! `±search_radius` pixels and `±search_band` radii around its last state.
//! Windows are independent, so with `parallel` set they are processed
//! concurrently, one task per circle.

use crate::accumulator::Accumulator;
use crate::candidate::peak::find_peak;
use crate::search::track::TrackedCircle;
use crate::search::CircleDetector;
use crate::util::HoughResult;
use crate::vote::{accumulate_window, EdgeMap, SearchWindow};
#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// Outcome of searching one tracked circle's window.
pub(crate) struct WindowOutcome {
    /// Updated state, or `None` if the best cell fell below threshold.
    pub(crate) circle: Option<TrackedCircle>,
    pub(crate) window: SearchWindow,
    pub(crate) votes: Accumulator,
}

/// Searches the window of a single tracked circle.
pub(crate) fn search_window(
    edges: &EdgeMap,
    detector: &CircleDetector,
    tracked: &TrackedCircle,
) -> HoughResult<WindowOutcome> {
    let local = &detector.config().local;
    let lut = detector.lut();
    let window = SearchWindow::around(
        lut,
        edges.width(),
        edges.height(),
        (tracked.x, tracked.y, tracked.radius),
        local.search_radius,
        local.search_band,
    )?;
    let votes = accumulate_window(edges, lut, &window)?;
    let peak = find_peak(&votes, false);

    let circle = (peak.votes >= detector.track_threshold()).then(|| TrackedCircle {
        id: tracked.id,
        x: window.x0 + peak.x,
        y: window.y0 + peak.y,
        radius: lut.radii().radius_at(window.r0 + peak.radius_idx),
        score: peak.votes,
    });
    Ok(WindowOutcome {
        circle,
        window,
        votes,
    })
}

/// Searches every tracked circle's window; outcomes keep the input order.
pub(crate) fn search_tracked(
    edges: &EdgeMap,
    detector: &CircleDetector,
    tracked: &[TrackedCircle],
) -> HoughResult<Vec<WindowOutcome>> {
    #[cfg(feature = "rayon")]
    if detector.config().parallel && tracked.len() > 1 {
        return tracked
            .par_iter()
            .map(|circle| search_window(edges, detector, circle))
            .collect();
    }

    tracked
        .iter()
        .map(|circle| search_window(edges, detector, circle))
        .collect()
}

/// Rebuilds a full-size volume from local windows for display.
pub(crate) fn splice_windows(
    width: usize,
    height: usize,
    depth: usize,
    outcomes: &[WindowOutcome],
) -> HoughResult<Accumulator> {
    let mut full = Accumulator::new(width, height, depth)?;
    for outcome in outcomes {
        let w = &outcome.window;
        full.splice(&outcome.votes, w.x0, w.y0, w.r0);
    }
    Ok(full)
}
