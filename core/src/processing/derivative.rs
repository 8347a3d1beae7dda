use crate::prelude::{emit, PointStage, StageOutcome};
use crate::race_interface::{DataPoint, Field};

/// Rate of change of a metric per second, times a scale factor.
pub struct Derivative {
    output: Field,
    metric: Field,
    scale: f64,
    wrap_degrees: bool,
    last: Option<(i64, f64)>,
}

impl Derivative {
    pub fn new(output: Field, metric: Field, scale: f64) -> Self {
        Self {
            output,
            metric,
            scale,
            wrap_degrees: false,
            last: None,
        }
    }

    /// Treats the metric as a compass bearing: differences are taken the
    /// short way round, so 359 -> 1 is +2.
    pub fn wrapping_degrees(mut self) -> Self {
        self.wrap_degrees = true;
        self
    }

    /// Records `value` at `t` (epoch ms) and returns the rate since the
    /// previous observation. The first observation, and any with no elapsed
    /// time, yield nothing.
    pub fn observe(&mut self, t: i64, value: f64) -> Option<f64> {
        let rate = self.last.and_then(|(last_t, last_value)| {
            let elapsed = (t - last_t) as f64 / 1000.0;
            if elapsed <= 0.0 {
                return None;
            }
            let mut delta = value - last_value;
            if self.wrap_degrees {
                delta = (delta + 180.0).rem_euclid(360.0) - 180.0;
            }
            Some(delta / elapsed * self.scale)
        });
        self.last = Some((t, value));
        rate
    }
}

impl PointStage for Derivative {
    fn label(&self) -> &str {
        self.output.name()
    }

    fn execute(&mut self, point: &mut DataPoint) -> StageOutcome {
        let Some(value) = point.get(self.metric) else {
            return StageOutcome::Pending;
        };
        match self.observe(point.t, value) {
            Some(rate) => emit(point, self.output, rate),
            None => StageOutcome::Pending,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_observation_emits_nothing() {
        let mut accel = Derivative::new(Field::Acceleration, Field::Speed, 1.0);
        assert_eq!(accel.observe(1_000, 5.0), None);
        assert_eq!(accel.observe(2_000, 5.0), Some(0.0));
        assert_eq!(accel.observe(3_000, 6.0), Some(1.0));
        assert_eq!(accel.observe(3_500, 7.0), Some(2.0));
    }

    #[test]
    fn scale_factor_converts_units() {
        let mut accel = Derivative::new(Field::Acceleration, Field::Speed, 10.0);
        accel.observe(0, 1.0);
        assert_eq!(accel.observe(2_000, 2.0), Some(5.0));
    }

    #[test]
    fn duplicate_timestamp_is_skipped() {
        let mut rot = Derivative::new(Field::Rot, Field::Hdg, 1.0);
        rot.observe(1_000, 10.0);
        assert_eq!(rot.observe(1_000, 12.0), None);
        assert_eq!(rot.observe(2_000, 14.0), Some(2.0));
    }

    #[test]
    fn heading_rate_wraps_through_north() {
        let mut rot = Derivative::new(Field::Rot, Field::Hdg, 1.0).wrapping_degrees();
        rot.observe(0, 359.0);
        assert_eq!(rot.observe(1_000, 1.0), Some(2.0));
        assert_eq!(rot.observe(2_000, 357.0), Some(-4.0));
    }

    #[test]
    fn stage_writes_output_field() {
        let mut accel = Derivative::new(Field::Acceleration, Field::Speed, 1.0);
        let mut first = DataPoint::new(0, 0.0);
        first.speed = Some(4.0);
        assert_eq!(accel.execute(&mut first), StageOutcome::Pending);

        let mut gap = DataPoint::new(500, 0.5);
        assert_eq!(accel.execute(&mut gap), StageOutcome::Pending);

        let mut second = DataPoint::new(2_000, 2.0);
        second.speed = Some(5.0);
        assert_eq!(accel.execute(&mut second), StageOutcome::Emitted(0.5));
        assert_eq!(second.acceleration, Some(0.5));
    }
}
