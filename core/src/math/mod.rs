pub mod geo;
pub mod stats;
pub mod wind;

pub use geo::GeoMath;
pub use stats::StatsHelper;
pub use wind::WindMath;

/// Radians to degrees, normalized into `[0, 360)`.
pub fn deg(radians: f64) -> f64 {
    (radians.to_degrees() + 360.0) % 360.0
}

pub fn rad(degrees: f64) -> f64 {
    degrees.to_radians()
}
