//! Circle detection pipeline: configuration, single-frame detection and
//! stack tracking.
//!
//! [`CircleDetector`] validates a [`DetectConfig`] and builds the lookup table
//! once. Single frames go through [`CircleDetector::detect`], which carries no
//! state between calls. Image sequences go through a [`CircleTracker`], which
//! keeps circle identities from frame to frame and can restrict the search to
//! windows around previously found circles.

mod extract;
mod local;
mod track;

pub use track::{CircleTracker, TrackedCircle};

use crate::accumulator::ByteVolume;
use crate::image::{EdgeValue, ImageView, Roi};
use crate::lut::{LookupTable, LutConfig};
use crate::trace::{trace_event, trace_span};
use crate::util::{HoughError, HoughResult};
use crate::vote::{accumulate, EdgeMap};

/// When peak extraction stops.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum StopMode {
    /// Extract exactly `count` circles; slots that cannot be filled because the
    /// accumulator ran out of votes are reported as unfilled.
    FixedCount { count: usize },
    /// Extract circles while the best remaining cell holds at least
    /// `max(1, round(ratio * lut_size))` votes, up to `max_circles`.
    ScoreThreshold { ratio: f64, max_circles: usize },
}

impl Default for StopMode {
    fn default() -> Self {
        Self::FixedCount { count: 1 }
    }
}

/// Frame-to-frame local search settings for stacks.
#[derive(Clone, Copy, Debug)]
pub struct LocalSearchConfig {
    /// Search around previously tracked circles.
    pub enabled: bool,
    /// Half-size of the spatial window around a tracked center.
    pub search_radius: usize,
    /// Half-width of the radius band around a tracked radius.
    pub search_band: usize,
    /// Minimum number of tracked circles required to skip the full transform.
    pub min_tracked: usize,
    /// A tracked circle is lost when its window peak falls below
    /// `max(1, round(loss_ratio * lut_size))` votes. Never lower than the
    /// threshold a new detection has to meet.
    pub loss_ratio: f64,
}

impl Default for LocalSearchConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            search_radius: 10,
            search_band: 1,
            min_tracked: 1,
            loss_ratio: 0.5,
        }
    }
}

/// Full detector configuration.
#[derive(Clone, Debug)]
pub struct DetectConfig {
    /// Radius sampling and lookup-table settings.
    pub lut: LutConfig,
    /// Stop criterion for peak extraction.
    pub stop: StopMode,
    /// Suppression zone radius as a multiple of the found circle radius.
    /// Values `>= 1` keep found circles from overlapping.
    pub suppression_ratio: f64,
    /// Local search settings (stacks only).
    pub local: LocalSearchConfig,
    /// Use the rayon thread pool (requires the `rayon` feature).
    pub parallel: bool,
    /// Return a byte-normalized copy of the vote volume with each frame.
    pub keep_volume: bool,
}

impl Default for DetectConfig {
    fn default() -> Self {
        Self {
            lut: LutConfig::default(),
            stop: StopMode::default(),
            suppression_ratio: 1.0,
            local: LocalSearchConfig::default(),
            parallel: true,
            keep_volume: false,
        }
    }
}

/// Detected circle in region (accumulator) coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Circle {
    /// Tracking identity; `None` for single-frame detection.
    pub id: Option<u64>,
    /// Center column relative to the region of interest.
    pub x: usize,
    /// Center row relative to the region of interest.
    pub y: usize,
    /// Radius in pixels.
    pub radius: usize,
    /// Votes at the center cell.
    pub score: u32,
}

impl Circle {
    /// Votes as a fraction of the maximum possible (`lut_size`).
    pub fn normalized_score(&self, lut_size: usize) -> f32 {
        if lut_size == 0 {
            return 0.0;
        }
        self.score as f32 / lut_size as f32
    }

    /// Center in image coordinates for a circle found inside `roi`.
    pub fn image_center(&self, roi: Roi) -> (usize, usize) {
        (self.x + roi.x, self.y + roi.y)
    }
}

/// How a frame was searched.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SearchKind {
    /// Full transform and global peak extraction.
    Full,
    /// Only windows around tracked circles were transformed.
    Local,
    /// Full transform; tracked circles were re-found in their windows first,
    /// then the remaining slots were filled globally.
    Mixed,
}

/// Result of processing one frame.
#[derive(Clone, Debug)]
pub struct FrameDetections {
    /// Circles in detection order.
    pub circles: Vec<Circle>,
    /// Fixed-count slots left empty because no votes remained.
    pub unfilled: usize,
    /// Effective resolution used for voting.
    pub lut_size: usize,
    /// Search strategy used for the frame.
    pub kind: SearchKind,
    /// Vote volume before extraction, if requested.
    pub volume: Option<ByteVolume>,
}

impl FrameDetections {
    /// Circles followed by `None` for every unfilled slot.
    pub fn slots(&self) -> impl Iterator<Item = Option<&Circle>> + '_ {
        self.circles
            .iter()
            .map(Some)
            .chain(std::iter::repeat(None).take(self.unfilled))
    }
}

/// Validated configuration plus the lookup table built from it.
#[derive(Clone, Debug)]
pub struct CircleDetector {
    cfg: DetectConfig,
    lut: LookupTable,
    vote_threshold: u32,
    track_threshold: u32,
    slot_count: usize,
}

impl CircleDetector {
    /// Validates `cfg` and builds the lookup table.
    pub fn new(cfg: DetectConfig) -> HoughResult<Self> {
        if !cfg.suppression_ratio.is_finite() || cfg.suppression_ratio < 0.0 {
            return Err(HoughError::InvalidConfig {
                reason: "suppression_ratio must be finite and >= 0",
            });
        }
        match cfg.stop {
            StopMode::FixedCount { count: 0 } => {
                return Err(HoughError::InvalidConfig {
                    reason: "count must be > 0",
                })
            }
            StopMode::ScoreThreshold { ratio, .. } if !ratio.is_finite() || ratio <= 0.0 => {
                return Err(HoughError::InvalidConfig {
                    reason: "score threshold must be finite and > 0",
                })
            }
            StopMode::ScoreThreshold { max_circles: 0, .. } => {
                return Err(HoughError::InvalidConfig {
                    reason: "max_circles must be > 0",
                })
            }
            _ => {}
        }
        if !cfg.local.loss_ratio.is_finite() || cfg.local.loss_ratio < 0.0 {
            return Err(HoughError::InvalidConfig {
                reason: "loss_ratio must be finite and >= 0",
            });
        }

        let lut = LookupTable::build(&cfg.lut)?;
        let (vote_threshold, slot_count) = match cfg.stop {
            StopMode::FixedCount { count } => (1, count),
            StopMode::ScoreThreshold { ratio, max_circles } => {
                let votes = (ratio * lut.lut_size() as f64).round();
                (votes_to_threshold(votes), max_circles)
            }
        };
        let loss_votes = votes_to_threshold((cfg.local.loss_ratio * lut.lut_size() as f64).round());
        let track_threshold = loss_votes.max(vote_threshold);

        Ok(Self {
            cfg,
            lut,
            vote_threshold,
            track_threshold,
            slot_count,
        })
    }

    /// Configuration the detector was built from.
    pub fn config(&self) -> &DetectConfig {
        &self.cfg
    }

    /// Lookup table shared by every frame.
    pub fn lut(&self) -> &LookupTable {
        &self.lut
    }

    /// Minimum votes for a cell to count as a circle.
    pub fn vote_threshold(&self) -> u32 {
        self.vote_threshold
    }

    /// Minimum votes for a tracked circle to stay tracked.
    pub fn track_threshold(&self) -> u32 {
        self.track_threshold
    }

    /// Maximum number of circles reported per frame.
    pub fn slot_count(&self) -> usize {
        self.slot_count
    }

    /// Detects circles in one frame.
    ///
    /// `roi` restricts voting to a sub-rectangle; `None` uses the whole frame.
    /// Returned coordinates are relative to the region.
    pub fn detect<T: EdgeValue>(
        &self,
        frame: ImageView<'_, T>,
        roi: Option<Roi>,
    ) -> HoughResult<FrameDetections> {
        let edges = self.edge_map(frame, roi)?;
        self.detect_edges(&edges)
    }

    /// Processes a sequence of frames with a fresh tracker.
    ///
    /// With local search disabled every frame is detected independently and
    /// circles carry no id.
    pub fn detect_stack<T: EdgeValue>(
        &self,
        frames: &[ImageView<'_, T>],
        roi: Option<Roi>,
    ) -> HoughResult<Vec<FrameDetections>> {
        let mut tracker = CircleTracker::new(self);
        frames
            .iter()
            .map(|frame| tracker.process(*frame, roi))
            .collect()
    }

    pub(crate) fn detect_edges(&self, edges: &EdgeMap) -> HoughResult<FrameDetections> {
        let _span = trace_span!("detect_frame", edges = edges.len()).entered();

        let mut acc = accumulate(edges, &self.lut, self.cfg.parallel)?;
        let volume = self.cfg.keep_volume.then(|| acc.to_byte_volume());
        let circles = extract::extract_circles(&mut acc, self, self.slot_count);
        trace_event!("circles_found", count = circles.len());

        Ok(self.frame_result(circles, SearchKind::Full, volume))
    }

    pub(crate) fn edge_map<T: EdgeValue>(
        &self,
        frame: ImageView<'_, T>,
        roi: Option<Roi>,
    ) -> HoughResult<EdgeMap> {
        let roi = roi.unwrap_or_else(|| Roi::full(frame.width(), frame.height()));
        EdgeMap::from_view(frame.roi(roi)?)
    }

    pub(crate) fn frame_result(
        &self,
        circles: Vec<Circle>,
        kind: SearchKind,
        volume: Option<ByteVolume>,
    ) -> FrameDetections {
        let unfilled = match self.cfg.stop {
            StopMode::FixedCount { count } => count.saturating_sub(circles.len()),
            StopMode::ScoreThreshold { .. } => 0,
        };
        FrameDetections {
            circles,
            unfilled,
            lut_size: self.lut.lut_size(),
            kind,
            volume,
        }
    }
}

fn votes_to_threshold(votes: f64) -> u32 {
    votes.clamp(1.0, u32::MAX as f64) as u32
}

#[cfg(test)]
mod tests {
    use super::{CircleDetector, DetectConfig, LocalSearchConfig, StopMode};
    use crate::lut::LutConfig;
    use crate::util::HoughError;

    #[test]
    fn threshold_scales_with_effective_resolution() {
        let det = CircleDetector::new(DetectConfig {
            lut: LutConfig {
                radius_min: 5,
                radius_max: 5,
                radius_inc: 1,
                resolution: 40,
                ..LutConfig::default()
            },
            stop: StopMode::ScoreThreshold {
                ratio: 0.5,
                max_circles: 3,
            },
            ..DetectConfig::default()
        })
        .unwrap();
        assert_eq!(det.vote_threshold(), 20);
        assert_eq!(det.slot_count(), 3);
    }

    #[test]
    fn tracking_threshold_never_undercuts_detection() {
        let lut = LutConfig {
            radius_min: 5,
            radius_max: 5,
            radius_inc: 1,
            resolution: 40,
            ..LutConfig::default()
        };
        let fixed = CircleDetector::new(DetectConfig {
            lut,
            stop: StopMode::FixedCount { count: 2 },
            ..DetectConfig::default()
        })
        .unwrap();
        assert_eq!(fixed.vote_threshold(), 1);
        assert_eq!(fixed.track_threshold(), 20);

        let strict = CircleDetector::new(DetectConfig {
            lut,
            stop: StopMode::ScoreThreshold {
                ratio: 0.75,
                max_circles: 2,
            },
            local: LocalSearchConfig {
                loss_ratio: 0.25,
                ..LocalSearchConfig::default()
            },
            ..DetectConfig::default()
        })
        .unwrap();
        assert_eq!(strict.track_threshold(), 30);
    }

    #[test]
    fn rejects_invalid_loss_ratio() {
        for loss_ratio in [-0.1, f64::INFINITY] {
            let err = CircleDetector::new(DetectConfig {
                local: LocalSearchConfig {
                    loss_ratio,
                    ..LocalSearchConfig::default()
                },
                ..DetectConfig::default()
            })
            .unwrap_err();
            assert!(matches!(err, HoughError::InvalidConfig { .. }));
        }
    }

    #[test]
    fn tiny_threshold_rounds_up_to_one_vote() {
        let det = CircleDetector::new(DetectConfig {
            stop: StopMode::ScoreThreshold {
                ratio: 1e-9,
                max_circles: 1,
            },
            ..DetectConfig::default()
        })
        .unwrap();
        assert_eq!(det.vote_threshold(), 1);
    }

    #[test]
    fn rejects_invalid_stop_modes() {
        for stop in [
            StopMode::FixedCount { count: 0 },
            StopMode::ScoreThreshold {
                ratio: 0.0,
                max_circles: 1,
            },
            StopMode::ScoreThreshold {
                ratio: f64::NAN,
                max_circles: 1,
            },
            StopMode::ScoreThreshold {
                ratio: 0.5,
                max_circles: 0,
            },
        ] {
            let err = CircleDetector::new(DetectConfig {
                stop,
                ..DetectConfig::default()
            })
            .unwrap_err();
            assert!(matches!(err, HoughError::InvalidConfig { .. }));
        }
    }

    #[test]
    fn rejects_negative_suppression_ratio() {
        let err = CircleDetector::new(DetectConfig {
            suppression_ratio: -1.0,
            ..DetectConfig::default()
        })
        .unwrap_err();
        assert!(matches!(err, HoughError::InvalidConfig { .. }));
    }
}
