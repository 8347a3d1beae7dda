use crate::prelude::{emit, PointStage, StageOutcome};
use crate::race_interface::{DataPoint, Field};

type Formula = Box<dyn Fn(&[f64]) -> Option<f64>>;

/// Runs a formula over inputs that arrive on different points.
///
/// The latest value of each input field is latched as points go by. Once
/// every input has been observed the formula runs on the latched values (in
/// declared order), its result is written to `output`, and all latches are
/// cleared so each input must be seen again before the next result.
pub struct DelayedInputs {
    output: Field,
    inputs: Vec<Field>,
    latched: Vec<Option<f64>>,
    formula: Formula,
}

impl DelayedInputs {
    pub fn new<F>(output: Field, inputs: &[Field], formula: F) -> Self
    where
        F: Fn(&[f64]) -> Option<f64> + 'static,
    {
        Self {
            output,
            inputs: inputs.to_vec(),
            latched: vec![None; inputs.len()],
            formula: Box::new(formula),
        }
    }

    /// Latches whatever inputs `point` carries. Returns the full argument
    /// list, clearing the latches, once every input has been observed.
    pub fn latch(&mut self, point: &DataPoint) -> Option<Vec<f64>> {
        for (slot, field) in self.latched.iter_mut().zip(&self.inputs) {
            if let Some(value) = point.get(*field) {
                *slot = Some(value);
            }
        }

        let args = self.latched.iter().copied().collect::<Option<Vec<f64>>>()?;
        self.latched.iter_mut().for_each(|slot| *slot = None);
        Some(args)
    }
}

impl PointStage for DelayedInputs {
    fn label(&self) -> &str {
        self.output.name()
    }

    fn execute(&mut self, point: &mut DataPoint) -> StageOutcome {
        let Some(args) = self.latch(point) else {
            return StageOutcome::Pending;
        };
        match (self.formula)(&args) {
            Some(value) => emit(point, self.output, value),
            None => StageOutcome::Rejected,
        }
    }
}
