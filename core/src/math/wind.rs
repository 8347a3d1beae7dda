use crate::math::{deg, rad};

/// Wind, current and VMG formulas. Angles are degrees, speeds knots.
pub struct WindMath;

impl WindMath {
    pub fn law_of_cosines(a: f64, b: f64, gamma: f64) -> f64 {
        (a * a + b * b - 2.0 * a * b * rad(gamma.abs()).cos()).sqrt()
    }

    pub fn true_wind_speed(speed: f64, awa: f64, aws: f64) -> f64 {
        Self::law_of_cosines(speed, aws, awa)
    }

    /// True wind angle, signed like `awa`.
    ///
    /// The `asin` argument is clamped into `[-1, 1]` so noisy apparent wind
    /// cannot produce NaN.
    pub fn true_wind_angle(speed: f64, awa: f64, tws: f64) -> f64 {
        let ratio = (speed * rad(awa.abs()).sin() / tws).clamp(-1.0, 1.0);
        let angle = deg(ratio.asin()) + awa.abs();
        if awa < 0.0 {
            -angle
        } else {
            angle
        }
    }

    pub fn ground_wind_speed(sog: f64, awa: f64, aws: f64) -> f64 {
        Self::law_of_cosines(sog, aws, awa)
    }

    pub fn ground_wind_direction(sog: f64, cog: f64, awa: f64, gws: f64) -> f64 {
        let gwa = Self::true_wind_angle(sog, awa, gws);
        (cog + gwa + 360.0) % 360.0
    }

    pub fn vmg(speed: f64, twa: f64) -> f64 {
        (speed * rad(twa).cos()).abs()
    }

    pub fn true_wind_direction(hdg: f64, twa: f64) -> f64 {
        (hdg + twa + 360.0) % 360.0
    }

    /// Current vector as ground track minus water track, in a frame with
    /// north along +y.
    fn current_vector(speed: f64, hdg: f64, sog: f64, cog: f64) -> (f64, f64) {
        let hdg = rad(90.0 - hdg);
        let cog = rad(90.0 - cog);
        let x = sog * cog.cos() - speed * hdg.cos();
        let y = sog * cog.sin() - speed * hdg.sin();
        (x, y)
    }

    /// Direction the current flows toward, `[0, 360)`.
    pub fn set(speed: f64, hdg: f64, sog: f64, cog: f64) -> f64 {
        let (x, y) = Self::current_vector(speed, hdg, sog, cog);
        if x == 0.0 {
            if y < 0.0 {
                180.0
            } else {
                0.0
            }
        } else {
            (90.0 - deg(y.atan2(x)) + 360.0) % 360.0
        }
    }

    /// Current speed.
    pub fn drift(speed: f64, hdg: f64, sog: f64, cog: f64) -> f64 {
        let (x, y) = Self::current_vector(speed, hdg, sog, cog);
        x.hypot(y)
    }
}
