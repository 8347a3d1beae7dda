use crate::generator::profile::GeneratorConfig;
use anyhow::Context;
use sailcore::polar::PolarModel;
use sailcore::race_interface::RaceIndex;
use sailcore::PipelineConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    /// Polar file; the bundled table is used when unset.
    pub polar: Option<PathBuf>,
    /// Race list JSON.
    pub races: Option<PathBuf>,
    /// Directory holding `<race id>.json` sample files.
    pub race_dir: PathBuf,
    /// Boat whose races the bridge lists.
    pub boat: Option<String>,
    pub bind: SocketAddr,
    pub pipeline: PipelineConfig,
    pub generator: GeneratorConfig,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            polar: None,
            races: None,
            race_dir: PathBuf::from("races"),
            boat: None,
            bind: SocketAddr::from(([127, 0, 0, 1], 9000)),
            pipeline: PipelineConfig::default(),
            generator: GeneratorConfig::default(),
        }
    }
}

impl WorkflowConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading workflow config {}", path_ref.display()))?;
        let config: WorkflowConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing workflow config {}", path_ref.display()))?;
        Ok(config)
    }

    pub fn load_polar(&self) -> anyhow::Result<PolarModel> {
        match &self.polar {
            Some(path) => PolarModel::from_path(path)
                .with_context(|| format!("loading polar {}", path.display())),
            None => PolarModel::builtin().context("loading bundled polar"),
        }
    }

    /// The race list, or an empty one when no list is configured.
    pub fn load_index(&self) -> anyhow::Result<RaceIndex> {
        let Some(path) = &self.races else {
            return Ok(RaceIndex::default());
        };
        let contents = fs::read_to_string(path)
            .with_context(|| format!("reading race index {}", path.display()))?;
        RaceIndex::from_json(&contents)
            .with_context(|| format!("parsing race index {}", path.display()))
    }

    pub fn race_path(&self, id: &str) -> PathBuf {
        self.race_dir.join(format!("{}.json", id))
    }
}
