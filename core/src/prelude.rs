use crate::polar::PolarError;
use crate::race_interface::DataPoint;

/// Result of running one stage against one point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StageOutcome {
    /// Required inputs have not all been observed yet.
    Pending,
    /// The stage wrote its output field onto the point.
    Emitted(f64),
    /// The stage edited fields of the point in place.
    Applied,
    /// The computed value was not finite and was not written.
    Rejected,
}

impl StageOutcome {
    pub fn value(&self) -> Option<f64> {
        match self {
            StageOutcome::Emitted(value) => Some(*value),
            _ => None,
        }
    }
}

/// Common error type for the analysis core.
#[derive(thiserror::Error, Debug)]
pub enum AnalysisError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error(transparent)]
    Polar(#[from] PolarError),
}

pub type AnalysisResult<T> = Result<T, AnalysisError>;

/// A stateful per-point computation.
///
/// Stages are created fresh for every pipeline run and fed points in
/// chronological order. A stage may read any field written by an earlier
/// stage on the same point.
pub trait PointStage {
    fn label(&self) -> &str;
    fn execute(&mut self, point: &mut DataPoint) -> StageOutcome;
}

/// Writes `value` into `field` if it is finite.
pub(crate) fn emit(
    point: &mut DataPoint,
    field: crate::race_interface::Field,
    value: f64,
) -> StageOutcome {
    if value.is_finite() {
        point.set(field, value);
        StageOutcome::Emitted(value)
    } else {
        StageOutcome::Rejected
    }
}
