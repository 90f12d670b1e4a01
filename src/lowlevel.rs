//! Low-level building blocks for custom pipelines.
//!
//! These expose the voting, peak search and suppression stages used by
//! [`CircleDetector`](crate::CircleDetector). Most users should prefer the
//! detector and tracker.

pub use crate::accumulator::{Accumulator, ByteVolume};
pub use crate::candidate::peak::{find_peak, find_peak_in_window, CellPeak};
pub use crate::candidate::suppress::suppress_neighbors;
pub use crate::lut::{LookupTable, Offset, RadiusGrid};
pub use crate::vote::{accumulate, accumulate_window, EdgeMap, SearchWindow};
