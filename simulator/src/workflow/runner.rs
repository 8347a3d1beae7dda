use crate::workflow::config::WorkflowConfig;
use anyhow::Context;
use log::info;
use sailcore::math::GeoMath;
use sailcore::polar::PolarModel;
use sailcore::processing::{performance_track, reference_wind_direction, TrackSegment};
use sailcore::race_interface::{parse_race_points, DataPoint, RaceEntry, RaceIndex};
use sailcore::{Pipeline, PipelineConfig, PipelineOutput};
use serde::Serialize;
use std::fs;
use std::sync::Arc;

/// Points averaged for the chart-orientation wind direction.
const REFERENCE_WIND_WINDOW: usize = 600;
/// Width of the performance-coloured track pieces.
const PERFORMANCE_STEP_MS: i64 = 10_000;

/// One analyzed race, as written to reports and served by the bridge.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowResult {
    pub race: String,
    pub data: Vec<DataPoint>,
    #[serde(flatten)]
    pub output: PipelineOutput,
    pub reference_wind: Option<f64>,
    pub performance: Vec<TrackSegment>,
    pub distance_nm: f64,
}

impl WorkflowResult {
    pub fn summary(&self) -> String {
        format!(
            "race {} -> points {}, maneuvers {}, tacks {}, legs {}, rejected {}, distance {:.2} nm",
            self.race,
            self.data.len(),
            self.output.maneuvers.len(),
            self.output.tacks.len(),
            self.output.legs.len(),
            self.output.metrics.rejected,
            self.distance_nm
        )
    }
}

/// Great-circle length of the sailed track.
fn track_distance(points: &[DataPoint]) -> f64 {
    let positions: Vec<_> = points.iter().filter_map(DataPoint::position).collect();
    positions
        .windows(2)
        .map(|w| GeoMath::distance(w[0].1, w[0].0, w[1].1, w[1].0))
        .sum()
}

#[derive(Clone)]
pub struct Runner {
    config: WorkflowConfig,
    polar: Arc<PolarModel>,
}

impl Runner {
    pub fn new(config: WorkflowConfig) -> anyhow::Result<Self> {
        let polar = Arc::new(config.load_polar()?);
        Ok(Self { config, polar })
    }

    pub fn index(&self) -> anyhow::Result<RaceIndex> {
        self.config.load_index()
    }

    pub fn execute(
        &self,
        race: &str,
        mut points: Vec<DataPoint>,
        time_offset_ms: i64,
    ) -> anyhow::Result<WorkflowResult> {
        let pipeline_config = PipelineConfig {
            time_offset_ms,
            ..self.config.pipeline
        };
        let output = Pipeline::new(pipeline_config, Arc::clone(&self.polar))
            .run(&mut points)
            .with_context(|| format!("analyzing race {}", race))?;

        let result = WorkflowResult {
            race: race.to_string(),
            reference_wind: reference_wind_direction(&points, REFERENCE_WIND_WINDOW),
            performance: performance_track(&points, PERFORMANCE_STEP_MS),
            distance_nm: track_distance(&points),
            data: points,
            output,
        };
        info!("{}", result.summary());
        Ok(result)
    }

    /// Reads `<race_dir>/<id>.json` and runs it with the entry's start gun as
    /// the time offset.
    pub fn execute_entry(&self, entry: &RaceEntry) -> anyhow::Result<WorkflowResult> {
        let path = self.config.race_path(&entry.id);
        let contents = fs::read_to_string(&path)
            .with_context(|| format!("reading race {}", path.display()))?;
        let points = parse_race_points(&contents)
            .with_context(|| format!("parsing race {}", path.display()))?;
        let offset = entry
            .start_epoch_ms()
            .with_context(|| format!("start time of race {}", entry.id))?;
        self.execute(&entry.id, points, offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::profile::{build_points, build_race, GeneratorConfig};
    use sailcore::race_interface::{Board, Side};

    #[test]
    fn runner_analyzes_synthetic_race() {
        let runner = Runner::new(WorkflowConfig::default()).unwrap();
        let points = build_points(&GeneratorConfig::default()).unwrap();
        let result = runner.execute("synthetic", points, 0).unwrap();

        assert_eq!(result.data.len(), 721);
        assert_eq!(result.output.tacks.len(), 1);
        assert_eq!(result.output.tacks[0].board, Board::Upwind(Side::Port));
        assert!(result.output.legs.iter().all(|leg| leg.leg >= 2));
        let up = result.reference_wind.unwrap();
        assert!(up < 1e-6 || 360.0 - up < 1e-6);
        // a bucket closes on the first sample more than 10s past its start, so each spans 11s
        assert_eq!(result.performance.len(), 65);
        let piece = &result.performance[0];
        assert_eq!(piece.bucket.start, 0);
        assert!(piece.bucket.value.is_some());
        assert_eq!(piece.path.len(), 11);
        assert!((result.distance_nm - 6.0 * 720.0 / 3600.0).abs() < 0.01);
    }

    #[test]
    fn runner_reads_race_entry_with_start_offset() {
        let dir = tempfile::tempdir().unwrap();
        let race = build_race(&GeneratorConfig::default()).unwrap();
        fs::write(dir.path().join("r1.json"), serde_json::to_string(&race).unwrap()).unwrap();

        let runner = Runner::new(WorkflowConfig {
            race_dir: dir.path().to_path_buf(),
            ..Default::default()
        })
        .unwrap();
        let entry = RaceEntry {
            id: "r1".into(),
            boat: "mayhem".into(),
            date: "20140712".into(),
            regatta: "Summer".into(),
            race: 1,
            start_time: Some("13:05".into()),
        };
        let result = runner.execute_entry(&entry).unwrap();
        assert_eq!(result.data[0].t, 1_405_170_300_000);
        assert_eq!(result.output.maneuvers[0].start, 1_405_170_300_000);
    }

    #[test]
    fn missing_race_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let runner = Runner::new(WorkflowConfig {
            race_dir: dir.path().to_path_buf(),
            ..Default::default()
        })
        .unwrap();
        let entry = RaceEntry {
            id: "gone".into(),
            boat: "mayhem".into(),
            date: "20140712".into(),
            regatta: "Summer".into(),
            race: 1,
            start_time: None,
        };
        let err = runner.execute_entry(&entry).unwrap_err();
        assert!(format!("{:#}", err).contains("reading race"));
    }
}
