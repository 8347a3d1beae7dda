use crate::prelude::{AnalysisError, AnalysisResult};
use crate::race_interface::DataPoint;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A sample as stored in a race file: `t` is race-clock seconds.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawPoint {
    pub t: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lon: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hdg: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cog: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sog: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub awa: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aws: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heel: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trim: Option<f64>,
}

impl From<RawPoint> for DataPoint {
    /// Moves the race clock into `ot`; `t` is filled in by the pipeline.
    fn from(raw: RawPoint) -> Self {
        DataPoint {
            t: 0,
            ot: raw.t,
            lon: raw.lon,
            lat: raw.lat,
            hdg: raw.hdg,
            cog: raw.cog,
            sog: raw.sog,
            speed: raw.speed,
            awa: raw.awa,
            aws: raw.aws,
            heel: raw.heel,
            trim: raw.trim,
            ..Default::default()
        }
    }
}

/// Parses a race file (a JSON array of raw samples) into points.
pub fn parse_race_points(json: &str) -> AnalysisResult<Vec<DataPoint>> {
    let raw: Vec<RawPoint> = serde_json::from_str(json)
        .map_err(|err| AnalysisError::InvalidInput(format!("race points: {}", err)))?;
    Ok(raw.into_iter().map(DataPoint::from).collect())
}

/// One entry of the race list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RaceEntry {
    pub id: String,
    pub boat: String,
    /// `YYYYMMDD`
    pub date: String,
    pub regatta: String,
    pub race: u32,
    /// `HH:mm`, UTC
    #[serde(rename = "startTime", default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
}

impl RaceEntry {
    pub fn year(&self) -> &str {
        self.date.get(..4).unwrap_or(&self.date)
    }

    /// Epoch milliseconds of the start gun, used as the pipeline time offset.
    pub fn start_epoch_ms(&self) -> AnalysisResult<i64> {
        let clock = self.start_time.as_deref().unwrap_or("00:00");
        let stamp = format!("{} {}", self.date, clock);
        let parsed = NaiveDateTime::parse_from_str(&stamp, "%Y%m%d %H:%M").map_err(|err| {
            AnalysisError::InvalidInput(format!("race {} start '{}': {}", self.id, stamp, err))
        })?;
        Ok(parsed.and_utc().timestamp_millis())
    }
}

/// Races of one regatta, ordered by race number.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegattaGroup {
    pub name: String,
    pub races: Vec<RaceEntry>,
}

/// Regattas sailed in one year.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YearGroup {
    pub year: String,
    pub regattas: Vec<RegattaGroup>,
}

/// The race list document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RaceIndex {
    pub races: Vec<RaceEntry>,
}

impl RaceIndex {
    pub fn from_json(json: &str) -> AnalysisResult<Self> {
        serde_json::from_str(json)
            .map_err(|err| AnalysisError::InvalidInput(format!("race index: {}", err)))
    }

    pub fn find(&self, id: &str) -> Option<&RaceEntry> {
        self.races.iter().find(|race| race.id == id)
    }

    /// Races sailed by `boat`, newest first.
    pub fn for_boat(&self, boat: &str) -> Vec<&RaceEntry> {
        let mut races: Vec<&RaceEntry> = self.races.iter().filter(|r| r.boat == boat).collect();
        races.sort_by(|a, b| b.date.cmp(&a.date));
        races
    }

    /// Groups a boat's races by year (newest first) and regatta.
    pub fn by_year(&self, boat: &str) -> Vec<YearGroup> {
        let mut years: BTreeMap<String, BTreeMap<String, Vec<RaceEntry>>> = BTreeMap::new();
        for race in self.for_boat(boat) {
            years
                .entry(race.year().to_string())
                .or_default()
                .entry(race.regatta.clone())
                .or_default()
                .push(race.clone());
        }

        years
            .into_iter()
            .rev()
            .map(|(year, regattas)| YearGroup {
                year,
                regattas: regattas
                    .into_iter()
                    .map(|(name, mut races)| {
                        races.sort_by_key(|r| r.race);
                        RegattaGroup { name, races }
                    })
                    .collect(),
            })
            .collect()
    }
}
