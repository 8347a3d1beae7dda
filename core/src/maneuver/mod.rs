//! Board segmentation and tack scoring over an enriched series.

pub mod segmenter;
pub mod slice;
pub mod tack;

pub use segmenter::{find_legs, find_maneuvers, MIN_LEG_MS};
pub use slice::{slice_around_time, slice_between_times};
pub use tack::{TackAnalyzer, TackConfig};
