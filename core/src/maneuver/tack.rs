use crate::maneuver::slice::{slice_around_time, slice_between_times};
use crate::math::StatsHelper;
use crate::race_interface::{Board, Confidence, DataPoint, LonLat, Maneuver, Side, Tack, TackTiming};
use crate::telemetry::{LogManager, MetricsRecorder};
use serde::{Deserialize, Serialize};

/// Feet per nautical mile.
pub const NM_TO_FT: f64 = 6076.11549;

/// Tuned constants of the tack analysis. Index-based values count samples
/// within the extraction window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TackConfig {
    pub window_before_s: f64,
    pub window_after_s: f64,
    pub data_before_s: f64,
    pub data_after_s: f64,
    pub track_before_s: f64,
    pub track_after_s: f64,
    /// The following maneuver must start at least this long after the tack.
    pub min_next_spacing_s: f64,
    /// Rate of turn (deg/s) below which the boat counts as settled.
    pub settle_rot: f64,
    /// Samples skipped back from the center before looking for a settled one.
    pub start_skip: usize,
    pub start_search_span: usize,
    pub default_start_index: usize,
    /// Entry averages cover `[start - entry_from_s, start - entry_to_s]`.
    pub entry_from_s: f64,
    pub entry_to_s: f64,
    pub end_search_span: usize,
    pub recovery_skip: usize,
    pub recovery_fallback: usize,
    pub recovery_metric_span: usize,
}

impl Default for TackConfig {
    fn default() -> Self {
        Self {
            window_before_s: 30.0,
            window_after_s: 120.0,
            data_before_s: 20.0,
            data_after_s: 40.0,
            track_before_s: 15.0,
            track_after_s: 20.0,
            min_next_spacing_s: 45.0,
            settle_rot: 2.5,
            start_skip: 3,
            start_search_span: 15,
            default_start_index: 15,
            entry_from_s: 6.0,
            entry_to_s: 2.0,
            end_search_span: 12,
            recovery_skip: 5,
            recovery_fallback: 30,
            recovery_metric_span: 6,
        }
    }
}

/// Window indices of a tack before they become timestamps.
#[derive(Debug, Clone, Copy, Default)]
struct TackIndices {
    center: usize,
    start: usize,
    end: usize,
    recovered: usize,
}

/// In-progress tack over its extraction window. Each step fills in more of
/// the record; a failed search falls back to a default and leaves a note.
struct TackWork<'a> {
    config: &'a TackConfig,
    range: &'a [DataPoint],
    board: Board,
    time: i64,
    idx: TackIndices,
    timing: Option<TackTiming>,
    position: Option<LonLat>,
    start_position: Option<LonLat>,
    end_position: Option<LonLat>,
    entry_speed: Option<f64>,
    entry_vmg: Option<f64>,
    entry_twa: Option<f64>,
    entry_hdg: Option<f64>,
    max_twa: Option<f64>,
    recovery_twa: Option<f64>,
    recovery_hdg: Option<f64>,
    tws: Option<f64>,
    twd: Option<f64>,
    loss: Option<f64>,
    notes: Vec<String>,
}

impl<'a> TackWork<'a> {
    fn new(config: &'a TackConfig, range: &'a [DataPoint], board: Board, time: i64) -> Self {
        Self {
            config,
            range,
            board,
            time,
            idx: TackIndices::default(),
            timing: None,
            position: None,
            start_position: None,
            end_position: None,
            entry_speed: None,
            entry_vmg: None,
            entry_twa: None,
            entry_hdg: None,
            max_twa: None,
            recovery_twa: None,
            recovery_hdg: None,
            tws: None,
            twd: None,
            loss: None,
            notes: Vec::new(),
        }
    }

    fn last_index(&self) -> usize {
        self.range.len().saturating_sub(1)
    }

    fn find_center(&mut self) {
        match self.range.iter().position(|p| p.t == self.time) {
            Some(j) => self.idx.center = j.saturating_sub(1),
            None => {
                self.idx.center = 0;
                self.notes.push("tack time not in window".to_string());
            }
        }
        self.position = self.range[self.idx.center].position();
    }

    fn find_start(&mut self) {
        let cfg = self.config;
        let settled = self
            .idx
            .center
            .checked_sub(cfg.start_skip)
            .and_then(|from| {
                (0..=from)
                    .rev()
                    .take(cfg.start_search_span)
                    .find(|&j| self.range[j].rot.is_some_and(|rot| rot.abs() < cfg.settle_rot))
            });

        self.idx.start = match settled {
            Some(j) => j,
            None => {
                self.notes.push("using default start".to_string());
                cfg.default_start_index.min(self.idx.center)
            }
        };
        self.start_position = self.range[self.idx.start].position();
    }

    fn calculate_entry_speeds(&mut self) {
        let start_t = self.range[self.idx.start].t;
        let from = start_t - (self.config.entry_from_s * 1000.0).round() as i64;
        let to = start_t - (self.config.entry_to_s * 1000.0).round() as i64;
        let entry = slice_between_times(self.range, from, to);

        self.entry_vmg = StatsHelper::mean(entry.iter().filter_map(|p| p.vmg));
        self.entry_speed = StatsHelper::mean(entry.iter().filter_map(|p| p.speed));
        self.entry_twa = StatsHelper::mean(entry.iter().filter_map(|p| p.twa));
        let hdgs: Vec<f64> = entry.iter().filter_map(|p| p.hdg).collect();
        self.entry_hdg = StatsHelper::circular_mean(&hdgs);

        if self.entry_vmg.is_none() {
            self.notes.push("no entry vmg".to_string());
        }
    }

    /// Furthest twa reached after the center: the minimum when settling onto
    /// port, the maximum otherwise. twa lags heading and drives vmg.
    fn find_end(&mut self) {
        let find_max = self.board.side() != Some(Side::Port);
        let center = self.idx.center;
        let stop = (center + self.config.end_search_span).min(self.range.len());

        let mut best = center;
        for j in center..stop {
            let Some(twa) = self.range[j].twa else {
                continue;
            };
            best = match self.range[best].twa {
                None => j,
                Some(current) if find_max && twa > current => j,
                Some(current) if !find_max && twa < current => j,
                Some(_) => best,
            };
        }

        self.idx.end = best;
        self.max_twa = self.range[best].twa;
        self.end_position = self.range[best].position();
    }

    fn find_recovery_time(&mut self) {
        let from = self.idx.end + self.config.recovery_skip;
        let recovered = self.entry_vmg.and_then(|entry| {
            (from..self.range.len()).find(|&j| self.range[j].vmg.is_some_and(|vmg| vmg >= entry))
        });

        self.idx.recovered = match recovered {
            Some(j) => j,
            None => {
                self.notes.push("using default recovery".to_string());
                (self.idx.center + self.config.recovery_fallback).min(self.last_index())
            }
        };
    }

    fn find_recovery_metrics(&mut self) {
        let from = self.idx.recovered;
        let to = (from + self.config.recovery_metric_span).min(self.range.len());
        let window = &self.range[from..to];

        self.recovery_twa = StatsHelper::mean(window.iter().filter_map(|p| p.twa));
        let hdgs: Vec<f64> = window.iter().filter_map(|p| p.hdg).collect();
        self.recovery_hdg = StatsHelper::circular_mean(&hdgs);
    }

    /// Wind conditions leading into the tack.
    fn add_classification_stats(&mut self) {
        let before = &self.range[..self.idx.start];
        self.tws = StatsHelper::mean(before.iter().filter_map(|p| p.tws));
        let twds: Vec<f64> = before.iter().filter_map(|p| p.twd).collect();
        self.twd = StatsHelper::circular_mean(&twds);
    }

    fn convert_indexes_to_times(&mut self) {
        let at = |j: usize| self.range[j].t;
        self.timing = Some(TackTiming {
            center: at(self.idx.center),
            start: at(self.idx.start),
            end: at(self.idx.end),
            recovered: at(self.idx.recovered),
        });
    }

    /// Distance (feet) gained against sailing the whole maneuver at entry
    /// VMG; negative means distance lost.
    fn calculate_loss(&mut self) {
        let (Some(timing), Some(entry_vmg)) = (self.timing, self.entry_vmg) else {
            return;
        };

        let mut covered = 0.0;
        let mut last_t: Option<i64> = None;
        for point in self
            .range
            .iter()
            .filter(|p| p.t >= timing.start && p.t <= timing.recovered)
        {
            let Some(vmg) = point.vmg else {
                continue;
            };
            if let Some(last) = last_t {
                covered += (point.t - last) as f64 / 1000.0 * vmg;
            }
            last_t = Some(point.t);
        }

        let ideal = entry_vmg * ((timing.recovered - timing.start) as f64 / 1000.0);
        self.loss = Some(-NM_TO_FT / 3600.0 * (ideal - covered));
    }

    fn finish(self, data: Vec<DataPoint>, track: Vec<DataPoint>) -> Option<Tack> {
        let timing = self.timing?;
        let confidence = if self.notes.is_empty() {
            Confidence::Full
        } else {
            Confidence::Reduced
        };
        Some(Tack {
            time: self.time,
            board: self.board,
            timing,
            position: self.position,
            start_position: self.start_position,
            end_position: self.end_position,
            entry_speed: self.entry_speed,
            entry_vmg: self.entry_vmg,
            entry_twa: self.entry_twa,
            entry_hdg: self.entry_hdg,
            max_twa: self.max_twa,
            recovery_twa: self.recovery_twa,
            recovery_hdg: self.recovery_hdg,
            tws: self.tws,
            twd: self.twd,
            loss: self.loss,
            data,
            track,
            notes: self.notes,
            confidence,
        })
    }
}

/// Finds upwind-to-upwind board changes and scores each as a tack.
pub struct TackAnalyzer {
    config: TackConfig,
    logger: LogManager,
}

impl TackAnalyzer {
    pub fn new(config: TackConfig) -> Self {
        Self {
            config,
            logger: LogManager::new("tacks"),
        }
    }

    /// A maneuver is a tack when it and its predecessor are both upwind and
    /// the next maneuver, if any, starts far enough after it.
    fn qualifies(&self, maneuvers: &[Maneuver], i: usize) -> bool {
        let (prev, current) = (&maneuvers[i - 1], &maneuvers[i]);
        if !current.board.is_upwind() || !prev.board.is_upwind() {
            return false;
        }
        let spacing_ms = (self.config.min_next_spacing_s * 1000.0).round() as i64;
        maneuvers
            .get(i + 1)
            .map_or(true, |next| next.start - spacing_ms >= current.start)
    }

    pub fn analyze_tacks(
        &self,
        maneuvers: &[Maneuver],
        points: &[DataPoint],
        metrics: &MetricsRecorder,
    ) -> Vec<Tack> {
        let mut tacks = Vec::new();

        for i in 2..maneuvers.len() {
            if !self.qualifies(maneuvers, i) {
                continue;
            }
            if let Some(tack) = self.analyze_one(&maneuvers[i], points) {
                metrics.record_tack();
                if tack.confidence == Confidence::Reduced {
                    metrics.record_fallback();
                    self.logger.caution(&format!(
                        "tack at {} reduced confidence: {}",
                        tack.time,
                        tack.notes.join(", ")
                    ));
                }
                tacks.push(tack);
            }
        }

        self.logger
            .record(&format!("{} tacks from {} maneuvers", tacks.len(), maneuvers.len()));
        tacks
    }

    fn analyze_one(&self, maneuver: &Maneuver, points: &[DataPoint]) -> Option<Tack> {
        let cfg = &self.config;
        let time = maneuver.start;
        let range = slice_around_time(points, time, cfg.window_before_s, cfg.window_after_s);
        if range.is_empty() {
            self.logger.caution(&format!("no samples around tack at {}", time));
            return None;
        }
        let data = slice_around_time(points, time, cfg.data_before_s, cfg.data_after_s).to_vec();
        let track = slice_around_time(points, time, cfg.track_before_s, cfg.track_after_s).to_vec();

        let mut work = TackWork::new(cfg, range, maneuver.board, time);
        work.find_center();
        work.find_start();
        work.calculate_entry_speeds();
        work.find_end();
        work.find_recovery_time();
        work.find_recovery_metrics();
        work.add_classification_stats();
        work.convert_indexes_to_times();
        work.calculate_loss();

        self.logger.detail(&format!(
            "tack {} at {}: indices {:?} loss {:?}",
            maneuver.board, time, work.idx, work.loss
        ));
        work.finish(data, track)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 1 Hz upwind series tacking from starboard to port at `tack_s`.
    fn tacking_series(len: i64, tack_s: i64) -> Vec<DataPoint> {
        (0..len)
            .map(|s| {
                let twa = if s < tack_s {
                    40.0
                } else if s < tack_s + 5 {
                    40.0 - 16.0 * (s - tack_s + 1) as f64
                } else {
                    -40.0
                };
                let turning = (tack_s - 1..tack_s + 5).contains(&s);
                let speed = if s < tack_s {
                    6.0
                } else if s < tack_s + 20 {
                    4.5
                } else {
                    6.5
                };
                DataPoint {
                    t: s * 1_000,
                    ot: s as f64,
                    lon: Some(-122.0 + s as f64 * 1e-5),
                    lat: Some(47.0),
                    speed: Some(speed),
                    twa: Some(twa),
                    vmg: Some(speed * twa.to_radians().cos().abs()),
                    hdg: Some((360.0 - twa).rem_euclid(360.0)),
                    rot: Some(if turning { -16.0 } else { 0.5 }),
                    tws: Some(12.0),
                    twd: Some(0.0),
                    ..Default::default()
                }
            })
            .collect()
    }

    fn maneuver(board: Board, start: i64, end: i64) -> Maneuver {
        Maneuver {
            board,
            start,
            end,
            closed: true,
        }
    }

    fn upwind_maneuvers(tack_s: i64, len: i64) -> Vec<Maneuver> {
        vec![
            maneuver(Board::PreStart, 0, 10_000),
            maneuver(Board::Upwind(Side::Starboard), 10_000, tack_s * 1_000),
            maneuver(Board::Upwind(Side::Port), tack_s * 1_000, len * 1_000),
        ]
    }

    #[test]
    fn scores_a_clean_tack() {
        let points = tacking_series(200, 60);
        let analyzer = TackAnalyzer::new(TackConfig::default());
        let metrics = MetricsRecorder::new();
        let tacks = analyzer.analyze_tacks(&upwind_maneuvers(60, 200), &points, &metrics);

        assert_eq!(tacks.len(), 1);
        let tack = &tacks[0];
        assert_eq!(tack.board, Board::Upwind(Side::Port));
        assert_eq!(tack.timing.center, 59_000);
        // the search begins three samples back from the center
        assert_eq!(tack.timing.start, 56_000);
        assert_eq!(tack.max_twa, Some(-40.0));
        assert!(tack.timing.end > tack.timing.center);
        // speed picks back up at 80s
        assert_eq!(tack.timing.recovered, 80_000);
        assert!(tack.timing.start < tack.timing.end && tack.timing.end < tack.timing.recovered);

        let entry_vmg = tack.entry_vmg.unwrap();
        assert!((entry_vmg - 6.0 * 40f64.to_radians().cos()).abs() < 1e-9);
        assert_eq!(tack.entry_speed, Some(6.0));
        assert_eq!(tack.tws, Some(12.0));
        assert!(tack.loss.unwrap() < 0.0);
        assert_eq!(tack.confidence, Confidence::Full);
        assert!(tack.notes.is_empty());
        assert_eq!(metrics.snapshot().tacks, 1);
    }

    #[test]
    fn fallbacks_mark_reduced_confidence() {
        let mut points = tacking_series(200, 60);
        for p in points.iter_mut() {
            p.rot = Some(10.0);
            if p.t > 60_000 {
                p.vmg = Some(1.0);
            }
        }
        let analyzer = TackAnalyzer::new(TackConfig::default());
        let metrics = MetricsRecorder::new();
        let tacks = analyzer.analyze_tacks(&upwind_maneuvers(60, 200), &points, &metrics);

        let tack = &tacks[0];
        assert_eq!(tack.confidence, Confidence::Reduced);
        assert!(tack.notes.iter().any(|n| n == "using default start"));
        assert!(tack.notes.iter().any(|n| n == "using default recovery"));
        // window starts at 30s, so index 15 is 45s and center + 30 is 89s
        assert_eq!(tack.timing.start, 45_000);
        assert_eq!(tack.timing.recovered, 89_000);
        assert_eq!(metrics.snapshot().fallbacks, 1);
    }

    #[test]
    fn start_search_stops_after_fifteen_samples() {
        // window index j is (30 + j)s; the scan covers indices 26 down to 12
        let settled_at = |t: i64| {
            let mut points = tacking_series(200, 60);
            for p in points.iter_mut() {
                p.rot = Some(if p.t == t { 0.5 } else { 10.0 });
            }
            let analyzer = TackAnalyzer::new(TackConfig::default());
            analyzer
                .analyze_tacks(&upwind_maneuvers(60, 200), &points, &MetricsRecorder::new())
                .remove(0)
        };

        let inside = settled_at(42_000);
        assert_eq!(inside.timing.start, 42_000);
        assert!(!inside.notes.iter().any(|n| n == "using default start"));

        let beyond = settled_at(41_000);
        assert_eq!(beyond.timing.start, 45_000);
        assert!(beyond.notes.iter().any(|n| n == "using default start"));
    }

    #[test]
    fn tack_onto_starboard_ends_at_max_twa() {
        let mut points = tacking_series(200, 60);
        for p in points.iter_mut() {
            let twa = -p.twa.unwrap();
            p.twa = Some(twa);
            p.hdg = Some((360.0 - twa).rem_euclid(360.0));
            p.rot = p.rot.map(|rot| -rot);
        }
        let maneuvers = vec![
            maneuver(Board::PreStart, 0, 10_000),
            maneuver(Board::Upwind(Side::Port), 10_000, 60_000),
            maneuver(Board::Upwind(Side::Starboard), 60_000, 200_000),
        ];
        let analyzer = TackAnalyzer::new(TackConfig::default());
        let tacks = analyzer.analyze_tacks(&maneuvers, &points, &MetricsRecorder::new());

        assert_eq!(tacks.len(), 1);
        assert_eq!(tacks[0].board, Board::Upwind(Side::Starboard));
        assert_eq!(tacks[0].max_twa, Some(40.0));
        // twa first reaches 40 four samples after the tack
        assert_eq!(tacks[0].timing.end, 64_000);
    }

    #[test]
    fn skips_tacks_crowded_by_next_maneuver() {
        let points = tacking_series(200, 60);
        let mut maneuvers = upwind_maneuvers(60, 200);
        maneuvers.push(maneuver(Board::Upwind(Side::Starboard), 100_000, 200_000));
        let analyzer = TackAnalyzer::new(TackConfig::default());
        let tacks = analyzer.analyze_tacks(&maneuvers, &points, &MetricsRecorder::new());
        // 60s -> 100s is only 40s, the 100s tack has no successor
        assert_eq!(tacks.len(), 1);
        assert_eq!(tacks[0].time, 100_000);
    }

    #[test]
    fn ignores_pre_start_and_downwind_changes() {
        let points = tacking_series(200, 60);
        let maneuvers = vec![
            maneuver(Board::Upwind(Side::Starboard), 0, 10_000),
            maneuver(Board::PreStart, 10_000, 60_000),
            maneuver(Board::Upwind(Side::Port), 60_000, 120_000),
            maneuver(Board::Downwind(Side::Port), 120_000, 200_000),
        ];
        let analyzer = TackAnalyzer::new(TackConfig::default());
        assert!(analyzer
            .analyze_tacks(&maneuvers, &points, &MetricsRecorder::new())
            .is_empty());
    }

    #[test]
    fn retains_data_and_track_windows() {
        let points = tacking_series(200, 60);
        let analyzer = TackAnalyzer::new(TackConfig::default());
        let tacks = analyzer.analyze_tacks(&upwind_maneuvers(60, 200), &points, &MetricsRecorder::new());
        let tack = &tacks[0];
        assert_eq!(tack.data.first().map(|p| p.t), Some(40_000));
        assert_eq!(tack.data.last().map(|p| p.t), Some(100_000));
        assert_eq!(tack.track.len(), 36);
        assert!(tack.position.is_some());
    }
}
