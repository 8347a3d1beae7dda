use crate::workflow::runner::WorkflowResult;
use sailcore::race_interface::{RaceIndex, YearGroup};
use serde::Serialize;
use std::collections::BTreeMap;

/// What the bridge serves: the race list plus every race analyzed so far.
#[derive(Debug, Default)]
pub struct BridgeModel {
    pub index: RaceIndex,
    pub boat: Option<String>,
    pub results: BTreeMap<String, WorkflowResult>,
}

/// `GET /races` body: grouped when a boat is selected, flat otherwise.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum RaceListing {
    ByYear(Vec<YearGroup>),
    All(RaceIndex),
}

impl BridgeModel {
    pub fn new(index: RaceIndex, boat: Option<String>) -> Self {
        Self {
            index,
            boat,
            results: BTreeMap::new(),
        }
    }

    pub fn listing(&self) -> RaceListing {
        match &self.boat {
            Some(boat) => RaceListing::ByYear(self.index.by_year(boat)),
            None => RaceListing::All(self.index.clone()),
        }
    }
}
