use crate::math::{deg, rad};

/// Earth radius in nautical miles.
pub const EARTH_RADIUS_NM: f64 = 3440.06479;

/// Great-circle helpers on a spherical earth. Coordinates in degrees,
/// distances in nautical miles.
pub struct GeoMath;

impl GeoMath {
    /// Haversine distance.
    pub fn distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
        let (lat1, lat2) = (rad(lat1), rad(lat2));
        let d_lat = lat2 - lat1;
        let d_lon = rad(lon2) - rad(lon1);

        let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        EARTH_RADIUS_NM * c
    }

    /// Initial bearing from the first point toward the second, `[0, 360)`.
    pub fn bearing(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
        let (lat1, lat2) = (rad(lat1), rad(lat2));
        let d_lon = rad(lon2) - rad(lon1);

        let y = d_lon.sin() * lat2.cos();
        let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * d_lon.cos();
        deg(y.atan2(x))
    }

    /// Signed turn from one bearing to another, in `(-180, 180]`.
    /// Positive is a turn to starboard.
    pub fn steer(from: f64, to: f64) -> f64 {
        let diff = (to - from).rem_euclid(360.0);
        if diff > 180.0 {
            diff - 360.0
        } else {
            diff
        }
    }

    /// Distance of `(lat, lon)` off the great circle from `from` to `to`;
    /// positive when the point lies to starboard of the course.
    pub fn cross_track_error(
        from_lat: f64,
        from_lon: f64,
        lat: f64,
        lon: f64,
        to_lat: f64,
        to_lon: f64,
    ) -> f64 {
        let d13 = Self::distance(from_lat, from_lon, lat, lon) / EARTH_RADIUS_NM;
        let course = Self::bearing(from_lat, from_lon, to_lat, to_lon);
        let to_point = Self::bearing(from_lat, from_lon, lat, lon);
        (d13.sin() * rad(to_point - course).sin()).asin() * EARTH_RADIUS_NM
    }
}
