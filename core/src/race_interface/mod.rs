pub mod point;
pub mod race;
pub mod records;

pub use point::{DataPoint, Field, LonLat};
pub use race::{parse_race_points, RaceEntry, RaceIndex, RawPoint, RegattaGroup, YearGroup};
pub use records::{Board, Confidence, Leg, Maneuver, Side, Tack, TackTiming};
