use crate::math::{deg, rad};

/// Components smaller than this are treated as cancelled out.
const CANCELLED: f64 = 1e-12;

pub struct StatsHelper;

impl StatsHelper {
    /// Arithmetic mean, `None` for an empty sequence.
    pub fn mean<I>(samples: I) -> Option<f64>
    where
        I: IntoIterator<Item = f64>,
    {
        let (sum, count) = samples
            .into_iter()
            .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
        if count == 0 {
            None
        } else {
            Some(sum / count as f64)
        }
    }

    /// Mean of compass bearings via unit vectors, `[0, 360)`.
    ///
    /// Opposing bearings that cancel exactly resolve to 0.
    pub fn circular_mean(angles: &[f64]) -> Option<f64> {
        if angles.is_empty() {
            return None;
        }

        let (sin_sum, cos_sum) = angles.iter().fold((0.0, 0.0), |(s, c), &angle| {
            (s + rad(angle).sin(), c + rad(angle).cos())
        });
        let n = angles.len() as f64;
        let snap = |v: f64| if v.abs() < CANCELLED { 0.0 } else { v / n };

        Some((360.0 + deg(snap(sin_sum).atan2(snap(cos_sum)))) % 360.0)
    }
}
