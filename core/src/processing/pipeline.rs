use crate::maneuver::{find_legs, find_maneuvers, TackAnalyzer, TackConfig};
use crate::math::WindMath;
use crate::polar::PolarModel;
use crate::prelude::{AnalysisError, AnalysisResult, PointStage, StageOutcome};
use crate::processing::average::RollingAverage;
use crate::processing::calibration::{AbsoluteAngles, Calibration, CalibrationStage};
use crate::processing::delayed::DelayedInputs;
use crate::processing::derivative::Derivative;
use crate::race_interface::{DataPoint, Field, Leg, Maneuver, Tack};
use crate::telemetry::{LogManager, MetricsRecorder, MetricsSnapshot};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Knots to feet per second.
const KNOTS_TO_FPS: f64 = 6076.11549 / 3600.0;

/// Settings for one pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub calibrate: bool,
    pub calibration: Calibration,
    /// Added to `ot * 1000` to give each point's epoch-ms `t`.
    pub time_offset_ms: i64,
    /// Race-clock seconds before which every sample is pre-start.
    pub pre_start_seconds: f64,
    /// Samples in the `gws_20`/`gwd_20` rolling averages.
    pub smoothing_window: usize,
    pub tack: TackConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            calibrate: true,
            calibration: Calibration::default(),
            time_offset_ms: 0,
            pre_start_seconds: 300.0,
            smoothing_window: 5,
            tack: TackConfig::default(),
        }
    }
}

/// Everything derived from one race besides the enriched points themselves.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineOutput {
    pub maneuvers: Vec<Maneuver>,
    pub tacks: Vec<Tack>,
    pub legs: Vec<Leg>,
    #[serde(skip)]
    pub metrics: MetricsSnapshot,
}

/// Enriches a race in place and extracts maneuvers, tacks and legs.
pub struct Pipeline {
    config: PipelineConfig,
    polar: Arc<PolarModel>,
    logger: LogManager,
}

fn upwind(twa: f64) -> bool {
    twa.abs() <= 90.0
}

impl Pipeline {
    pub fn new(config: PipelineConfig, polar: Arc<PolarModel>) -> Self {
        Self {
            config,
            polar,
            logger: LogManager::new("pipeline"),
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Fresh stage instances in dependency order: each stage may read what
    /// the stages before it wrote on the same point.
    pub fn build_stages(&self) -> Vec<Box<dyn PointStage>> {
        let mut stages: Vec<Box<dyn PointStage>> = Vec::new();
        if self.config.calibrate {
            stages.push(Box::new(CalibrationStage::new(self.config.calibration)));
        }

        use Field::*;
        stages.push(Box::new(DelayedInputs::new(Tws, &[Speed, Awa, Aws], |a| {
            Some(WindMath::true_wind_speed(a[0], a[1], a[2]))
        })));
        stages.push(Box::new(DelayedInputs::new(Twa, &[Speed, Awa, Tws], |a| {
            Some(WindMath::true_wind_angle(a[0], a[1], a[2]))
        })));
        stages.push(Box::new(DelayedInputs::new(Twd, &[Hdg, Twa], |a| {
            Some(WindMath::true_wind_direction(a[0], a[1]))
        })));
        stages.push(Box::new(DelayedInputs::new(Gws, &[Sog, Awa, Aws], |a| {
            Some(WindMath::ground_wind_speed(a[0], a[1], a[2]))
        })));
        stages.push(Box::new(DelayedInputs::new(Gwd, &[Sog, Cog, Awa, Gws], |a| {
            Some(WindMath::ground_wind_direction(a[0], a[1], a[2], a[3]))
        })));
        stages.push(Box::new(DelayedInputs::new(Set, &[Speed, Hdg, Sog, Cog], |a| {
            Some(WindMath::set(a[0], a[1], a[2], a[3]))
        })));
        stages.push(Box::new(DelayedInputs::new(Drift, &[Speed, Hdg, Sog, Cog], |a| {
            Some(WindMath::drift(a[0], a[1], a[2], a[3]))
        })));
        stages.push(Box::new(DelayedInputs::new(Vmg, &[Speed, Twa], |a| {
            Some(WindMath::vmg(a[0], a[1]))
        })));

        let polar = Arc::clone(&self.polar);
        stages.push(Box::new(DelayedInputs::new(TargetSpeed, &[Tws, Twa], move |a| {
            polar.target_speed(a[0], upwind(a[1]))
        })));
        let polar = Arc::clone(&self.polar);
        stages.push(Box::new(DelayedInputs::new(TargetAngle, &[Tws, Twa], move |a| {
            polar.target_angle(a[0], upwind(a[1]))
        })));
        let polar = Arc::clone(&self.polar);
        stages.push(Box::new(DelayedInputs::new(TargetHeel, &[Tws, Twa], move |a| {
            polar.target_heel(a[0], upwind(a[1]))
        })));

        // vmg is latched so target vmg only refreshes alongside measured vmg
        stages.push(Box::new(DelayedInputs::new(
            TargetVmg,
            &[TargetSpeed, TargetAngle, Vmg],
            |a| Some(WindMath::vmg(a[0], a[1])),
        )));
        stages.push(Box::new(DelayedInputs::new(Performance, &[TargetVmg, Vmg], |a| {
            Some(a[0] / a[1] * 100.0)
        })));

        let window = self.config.smoothing_window;
        stages.push(Box::new(RollingAverage::new(Gws20, Gws, window)));
        stages.push(Box::new(RollingAverage::new(Gwd20, Gwd, window).circular()));
        stages.push(Box::new(AbsoluteAngles));
        stages.push(Box::new(Derivative::new(Acceleration, Speed, KNOTS_TO_FPS)));
        stages.push(Box::new(Derivative::new(Rot, Hdg, 1.0).wrapping_degrees()));
        stages
    }

    /// Runs one full pass over `points`, which must be ordered by race clock.
    ///
    /// Stages are rebuilt on every call, so repeated runs never share state.
    pub fn run(&self, points: &mut [DataPoint]) -> AnalysisResult<PipelineOutput> {
        if let Some(pair) = points.windows(2).find(|w| w[1].ot < w[0].ot) {
            return Err(AnalysisError::InvalidInput(format!(
                "points out of order: {} after {}",
                pair[1].ot, pair[0].ot
            )));
        }

        let metrics = MetricsRecorder::new();
        let mut stages = self.build_stages();

        for point in points.iter_mut() {
            point.t = (point.ot * 1000.0).round() as i64 + self.config.time_offset_ms;
            for stage in stages.iter_mut() {
                if stage.execute(point) == StageOutcome::Rejected {
                    metrics.record_rejected();
                    self.logger.caution(&format!(
                        "{} rejected at {}",
                        stage.label(),
                        point.t
                    ));
                }
            }
            metrics.record_processed();
        }

        let maneuvers = find_maneuvers(points, self.config.pre_start_seconds);
        let tacks = TackAnalyzer::new(self.config.tack).analyze_tacks(&maneuvers, points, &metrics);
        let legs = find_legs(&maneuvers);

        let snapshot = metrics.snapshot();
        self.logger.record(&format!(
            "{} points, {} rejected values, {} maneuvers, {} tacks, {} legs",
            snapshot.processed,
            snapshot.rejected,
            maneuvers.len(),
            tacks.len(),
            legs.len()
        ));

        Ok(PipelineOutput {
            maneuvers,
            tacks,
            legs,
            metrics: snapshot,
        })
    }
}

/// One-call form: enrich `points` with the bundled polar.
pub fn build_out_data(
    points: &mut [DataPoint],
    time_offset_ms: i64,
    calibrate: bool,
) -> AnalysisResult<PipelineOutput> {
    let polar = Arc::new(PolarModel::builtin()?);
    let config = PipelineConfig {
        calibrate,
        time_offset_ms,
        ..Default::default()
    };
    Pipeline::new(config, polar).run(points)
}
