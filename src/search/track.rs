//! Circle tracking across the frames of a stack.

use crate::candidate::peak::find_peak_in_window;
use crate::candidate::suppress::suppress_neighbors;
use crate::image::{EdgeValue, ImageView, Roi};
use crate::search::extract::extract_circles;
use crate::search::local::{search_tracked, splice_windows};
use crate::search::{Circle, CircleDetector, FrameDetections, SearchKind};
use crate::trace::{trace_event, trace_span};
use crate::util::HoughResult;
use crate::vote::{accumulate, EdgeMap, SearchWindow};

/// State of a circle carried from one frame to the next.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TrackedCircle {
    /// Identity assigned when the circle was first found.
    pub id: u64,
    /// Last center column.
    pub x: usize,
    /// Last center row.
    pub y: usize,
    /// Last radius.
    pub radius: usize,
    /// Votes in the last frame.
    pub score: u32,
}

impl From<TrackedCircle> for Circle {
    fn from(t: TrackedCircle) -> Self {
        Circle {
            id: Some(t.id),
            x: t.x,
            y: t.y,
            radius: t.radius,
            score: t.score,
        }
    }
}

/// Processes a stack one frame at a time, keeping circle identities.
///
/// Ids start at 1 and only ever increase; an id dropped when its circle is
/// lost is never handed out again. With local search disabled nothing is
/// tracked and frames are detected independently, without ids.
pub struct CircleTracker<'d> {
    detector: &'d CircleDetector,
    tracked: Vec<TrackedCircle>,
    last_id: u64,
    frames: usize,
}

impl<'d> CircleTracker<'d> {
    /// Creates a tracker with no circles.
    pub fn new(detector: &'d CircleDetector) -> Self {
        Self {
            detector,
            tracked: Vec::new(),
            last_id: 0,
            frames: 0,
        }
    }

    /// Circles currently tracked, in slot order.
    pub fn tracked(&self) -> &[TrackedCircle] {
        &self.tracked
    }

    /// Number of frames processed so far.
    pub fn frames(&self) -> usize {
        self.frames
    }

    /// Processes the next frame of the stack.
    pub fn process<T: EdgeValue>(
        &mut self,
        frame: ImageView<'_, T>,
        roi: Option<Roi>,
    ) -> HoughResult<FrameDetections> {
        let edges = self.detector.edge_map(frame, roi)?;
        let _span = trace_span!("track_frame", frame = self.frames, edges = edges.len()).entered();
        self.frames += 1;

        let local = self.detector.config().local;
        if !local.enabled {
            return self.detector.detect_edges(&edges);
        }
        if !self.tracked.is_empty() && self.tracked.len() >= local.min_tracked {
            if let Some(result) = self.local_only(&edges)? {
                return Ok(result);
            }
            trace_event!("tracking_fallback", remaining = self.tracked.len());
        }

        self.full_search(&edges)
    }

    /// Searches windows only. Returns `None` when too few circles survive and
    /// the frame needs a full transform.
    fn local_only(&mut self, edges: &EdgeMap) -> HoughResult<Option<FrameDetections>> {
        let _span = trace_span!("local_search", tracked = self.tracked.len()).entered();
        let outcomes = search_tracked(edges, self.detector, &self.tracked)?;

        let mut survivors = Vec::with_capacity(outcomes.len());
        for (prev, outcome) in self.tracked.iter().zip(&outcomes) {
            match outcome.circle {
                Some(circle) => survivors.push(circle),
                None => {
                    trace_event!("circle_lost", id = prev.id);
                }
            }
        }
        self.tracked = survivors;

        let min_tracked = self.detector.config().local.min_tracked.max(1);
        if self.tracked.len() < min_tracked {
            return Ok(None);
        }

        let volume = if self.detector.config().keep_volume {
            let depth = self.detector.lut().radii().len();
            let full = splice_windows(edges.width(), edges.height(), depth, &outcomes)?;
            Some(full.to_byte_volume())
        } else {
            None
        };
        let circles = self.tracked.iter().copied().map(Circle::from).collect();
        Ok(Some(self.detector.frame_result(
            circles,
            SearchKind::Local,
            volume,
        )))
    }

    /// Full transform; re-finds tracked circles in their windows, then fills
    /// the remaining slots from the global maxima with fresh ids.
    fn full_search(&mut self, edges: &EdgeMap) -> HoughResult<FrameDetections> {
        let detector = self.detector;
        let cfg = detector.config();
        let lut = detector.lut();

        let mut acc = accumulate(edges, lut, cfg.parallel)?;
        let volume = cfg.keep_volume.then(|| acc.to_byte_volume());

        let kind = if self.tracked.is_empty() {
            SearchKind::Full
        } else {
            SearchKind::Mixed
        };

        let mut kept = Vec::with_capacity(self.tracked.len());
        for prev in std::mem::take(&mut self.tracked) {
            let window = SearchWindow::around(
                lut,
                acc.width(),
                acc.height(),
                (prev.x, prev.y, prev.radius),
                cfg.local.search_radius,
                cfg.local.search_band,
            )?;
            let peak = find_peak_in_window(&acc, &window);
            if peak.votes < detector.track_threshold() {
                trace_event!("circle_lost", id = prev.id);
                continue;
            }
            let radius = lut.radii().radius_at(peak.radius_idx);
            kept.push(TrackedCircle {
                id: prev.id,
                x: peak.x,
                y: peak.y,
                radius,
                score: peak.votes,
            });
            suppress_neighbors(
                &mut acc,
                peak.x,
                peak.y,
                radius,
                cfg.suppression_ratio,
                cfg.parallel,
            );
        }

        let remaining = detector.slot_count().saturating_sub(kept.len());
        for found in extract_circles(&mut acc, detector, remaining) {
            self.last_id += 1;
            kept.push(TrackedCircle {
                id: self.last_id,
                x: found.x,
                y: found.y,
                radius: found.radius,
                score: found.score,
            });
        }
        trace_event!("circles_found", count = kept.len());

        self.tracked = kept;
        let circles = self.tracked.iter().copied().map(Circle::from).collect();
        Ok(detector.frame_result(circles, kind, volume))
    }
}
