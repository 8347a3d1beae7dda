use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Measured performance at one (tws, twa).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PolarSample {
    pub speed: f64,
    pub heel: f64,
    pub lee: f64,
}

/// Best-VMG sample for one wind speed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetSample {
    pub twa: f64,
    pub speed: f64,
    pub heel: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKey {
    Speed,
    Twa,
    Heel,
}

impl TargetSample {
    pub fn value(&self, key: TargetKey) -> f64 {
        match key {
            TargetKey::Speed => self.speed,
            TargetKey::Twa => self.twa,
            TargetKey::Heel => self.heel,
        }
    }
}

pub type WindTable<T> = BTreeMap<OrderedFloat<f64>, T>;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PolarTargets {
    pub up: WindTable<TargetSample>,
    pub down: WindTable<TargetSample>,
}

/// Full polar table plus per-wind-speed targets. Read-only once loaded.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PolarModel {
    pub all: WindTable<WindTable<PolarSample>>,
    pub targets: PolarTargets,
}

impl PolarModel {
    pub fn new(all: WindTable<WindTable<PolarSample>>, targets: PolarTargets) -> Self {
        Self { all, targets }
    }

    pub fn insert_sample(&mut self, tws: f64, twa: f64, sample: PolarSample) {
        self.all
            .entry(OrderedFloat(tws))
            .or_default()
            .insert(OrderedFloat(twa), sample);
    }

    pub fn insert_target(&mut self, tws: f64, target: TargetSample) {
        let side = if target.twa < 90.0 {
            &mut self.targets.up
        } else {
            &mut self.targets.down
        };
        side.insert(OrderedFloat(tws), target);
    }

    /// Measured sample at an exact (tws, twa) grid point.
    pub fn sample(&self, tws: f64, twa: f64) -> Option<&PolarSample> {
        self.all.get(&OrderedFloat(tws))?.get(&OrderedFloat(twa))
    }

    /// Linearly interpolates a target value between the two sampled wind
    /// speeds bracketing `tws`.
    ///
    /// Wind speeds outside the sampled range clamp to the nearest edge.
    /// Returns `None` when the side has no targets or `tws` is not finite.
    pub fn get_interpolated_value(&self, tws: f64, key: TargetKey, upwind: bool) -> Option<f64> {
        if !tws.is_finite() {
            return None;
        }
        let table = if upwind {
            &self.targets.up
        } else {
            &self.targets.down
        };

        let wind = OrderedFloat(tws);
        if let Some(exact) = table.get(&wind) {
            return Some(exact.value(key));
        }

        let lower = table.range(..wind).next_back();
        let upper = table.range(wind..).next();
        match (lower, upper) {
            (Some((lo_tws, lo)), Some((hi_tws, hi))) => {
                let percent = 1.0 - (tws - lo_tws.0) / (hi_tws.0 - lo_tws.0);
                Some(percent * lo.value(key) + (1.0 - percent) * hi.value(key))
            }
            (Some((_, edge)), None) | (None, Some((_, edge))) => Some(edge.value(key)),
            (None, None) => None,
        }
    }

    pub fn target_speed(&self, tws: f64, upwind: bool) -> Option<f64> {
        self.get_interpolated_value(tws, TargetKey::Speed, upwind)
    }

    pub fn target_angle(&self, tws: f64, upwind: bool) -> Option<f64> {
        self.get_interpolated_value(tws, TargetKey::Twa, upwind)
    }

    pub fn target_heel(&self, tws: f64, upwind: bool) -> Option<f64> {
        self.get_interpolated_value(tws, TargetKey::Heel, upwind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model() -> PolarModel {
        let mut polar = PolarModel::default();
        polar.insert_target(6.0, TargetSample { twa: 43.0, speed: 5.0, heel: 8.0 });
        polar.insert_target(8.0, TargetSample { twa: 41.0, speed: 6.0, heel: 14.0 });
        polar.insert_target(6.0, TargetSample { twa: 143.0, speed: 5.4, heel: 2.0 });
        polar
    }

    #[test]
    fn exact_wind_speed_returns_sample() {
        let polar = model();
        assert_eq!(polar.target_speed(6.0, true), Some(5.0));
        assert_eq!(polar.target_angle(8.0, true), Some(41.0));
        assert_eq!(polar.target_heel(6.0, false), Some(2.0));
    }

    #[test]
    fn midpoint_interpolates_linearly() {
        let polar = model();
        let speed = polar.target_speed(7.0, true).unwrap();
        assert!((speed - 5.5).abs() < 1e-12);
        let angle = polar.target_angle(7.5, true).unwrap();
        assert!((angle - 41.5).abs() < 1e-12);
    }

    #[test]
    fn out_of_range_clamps_to_edges() {
        let polar = model();
        assert_eq!(polar.target_speed(2.0, true), Some(5.0));
        assert_eq!(polar.target_speed(30.0, true), Some(6.0));
        assert_eq!(polar.target_speed(30.0, false), Some(5.4));
    }

    #[test]
    fn missing_side_or_bad_wind_is_none() {
        let mut polar = PolarModel::default();
        polar.insert_target(6.0, TargetSample { twa: 43.0, speed: 5.0, heel: 8.0 });
        assert_eq!(polar.target_speed(6.0, false), None);
        assert_eq!(polar.target_speed(f64::NAN, true), None);
    }
}
