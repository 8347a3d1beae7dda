use crate::prelude::{PointStage, StageOutcome};
use crate::race_interface::DataPoint;
use serde::{Deserialize, Serialize};

/// Fixed instrument corrections applied before any derivation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Calibration {
    /// Subtracted from `awa`, degrees.
    pub awa_offset: f64,
    /// Multiplies `aws`.
    pub aws_scale: f64,
    /// Multiplies boat `speed`.
    pub speed_scale: f64,
    /// Added to `hdg`, degrees.
    pub hdg_offset: f64,
}

impl Default for Calibration {
    fn default() -> Self {
        Self {
            awa_offset: 0.0,
            aws_scale: 1.0,
            speed_scale: 1.0,
            hdg_offset: 0.0,
        }
    }
}

pub struct CalibrationStage {
    calibration: Calibration,
}

impl CalibrationStage {
    pub fn new(calibration: Calibration) -> Self {
        Self { calibration }
    }
}

/// Folds an angle into `[-180, 180]`.
fn signed_angle(angle: f64) -> f64 {
    if angle > 180.0 {
        angle - 360.0
    } else if angle < -180.0 {
        angle + 360.0
    } else {
        angle
    }
}

impl PointStage for CalibrationStage {
    fn label(&self) -> &str {
        "calibrate"
    }

    fn execute(&mut self, point: &mut DataPoint) -> StageOutcome {
        let cal = &self.calibration;
        if let Some(awa) = point.awa.as_mut() {
            *awa = signed_angle(*awa - cal.awa_offset);
        }
        if let Some(aws) = point.aws.as_mut() {
            *aws *= cal.aws_scale;
        }
        if let Some(speed) = point.speed.as_mut() {
            *speed *= cal.speed_scale;
        }
        if let Some(hdg) = point.hdg.as_mut() {
            *hdg = (*hdg + cal.hdg_offset).rem_euclid(360.0);
        }
        StageOutcome::Applied
    }
}

/// Adds unsigned copies of the apparent and true wind angles.
pub struct AbsoluteAngles;

impl PointStage for AbsoluteAngles {
    fn label(&self) -> &str {
        "abses"
    }

    fn execute(&mut self, point: &mut DataPoint) -> StageOutcome {
        point.aawa = point.awa.map(f64::abs);
        point.atwa = point.twa.map(f64::abs);
        StageOutcome::Applied
    }
}
