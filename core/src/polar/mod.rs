//! Boat-speed polar table and target interpolation.
//!
//! A polar file holds one `tws twa speed heel lee` row per line. A trailing
//! `*` marks the row as the best-VMG target for its wind speed, upwind when
//! `twa < 90` and downwind otherwise. Blank lines and `#` comments are
//! skipped.

mod parse;
mod table;

pub use parse::PolarError;
pub use table::{PolarModel, PolarSample, PolarTargets, TargetKey, TargetSample};
