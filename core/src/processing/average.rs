use crate::math::{deg, rad};
use crate::prelude::{emit, PointStage, StageOutcome};
use crate::processing::window::RingWindow;
use crate::race_interface::{DataPoint, Field};

enum Accumulator {
    Linear(RingWindow),
    /// Unit-vector components of compass bearings.
    Circular { sin: RingWindow, cos: RingWindow },
}

/// Mean of the last `size` observed values of a metric.
pub struct RollingAverage {
    output: Field,
    metric: Field,
    size: usize,
    acc: Accumulator,
}

impl RollingAverage {
    pub fn new(output: Field, metric: Field, size: usize) -> Self {
        Self {
            output,
            metric,
            size,
            acc: Accumulator::Linear(RingWindow::with_capacity(size)),
        }
    }

    /// Treats the metric as a compass bearing: the mean is taken over unit
    /// vectors, so 359 and 1 average to 0, and lands in `[0, 360)`.
    pub fn circular(mut self) -> Self {
        self.acc = Accumulator::Circular {
            sin: RingWindow::with_capacity(self.size),
            cos: RingWindow::with_capacity(self.size),
        };
        self
    }

    pub fn observe(&mut self, value: f64) -> f64 {
        match &mut self.acc {
            Accumulator::Linear(window) => window.push(value),
            Accumulator::Circular { sin, cos } => {
                let s = sin.push(rad(value).sin());
                let c = cos.push(rad(value).cos());
                deg(s.atan2(c))
            }
        }
    }
}

impl PointStage for RollingAverage {
    fn label(&self) -> &str {
        self.output.name()
    }

    fn execute(&mut self, point: &mut DataPoint) -> StageOutcome {
        match point.get(self.metric) {
            Some(value) => {
                let mean = self.observe(value);
                emit(point, self.output, mean)
            }
            None => StageOutcome::Pending,
        }
    }
}
