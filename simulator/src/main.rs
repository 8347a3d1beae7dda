use anyhow::Context;
use bridge::model::BridgeModel;
use bridge::server::RaceBridge;
use clap::Parser;
use generator::profile::build_points;
use sailcore::race_interface::parse_race_points;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::runtime::Builder as TokioBuilder;
use tokio::signal;
use workflow::config::WorkflowConfig;
use workflow::runner::{Runner, WorkflowResult};

mod bridge;
mod generator;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "Sailboat race performance analysis driver")]
struct Args {
    /// Load a workflow config from YAML
    #[arg(long)]
    workflow: Option<PathBuf>,
    /// Analyze a single race sample file (JSON array)
    #[arg(long)]
    race: Option<PathBuf>,
    /// Race list JSON
    #[arg(long)]
    races: Option<PathBuf>,
    /// Directory holding `<race id>.json` files
    #[arg(long)]
    race_dir: Option<PathBuf>,
    /// Analyze this race from the race list
    #[arg(long)]
    race_id: Option<String>,
    /// Boat whose races the bridge lists
    #[arg(long)]
    boat: Option<String>,
    /// Polar file replacing the bundled table
    #[arg(long)]
    polar: Option<PathBuf>,
    /// Epoch-ms offset added to race-clock times of `--race`/`--synthetic`
    #[arg(long)]
    offset_ms: Option<i64>,
    #[arg(long)]
    awa_offset: Option<f64>,
    #[arg(long)]
    aws_scale: Option<f64>,
    /// Skip instrument calibration
    #[arg(long, default_value_t = false)]
    no_calibrate: bool,
    /// Generate and analyze a synthetic race
    #[arg(long, default_value_t = false)]
    synthetic: bool,
    #[arg(long)]
    seed: Option<u64>,
    /// Write the analysis results as JSON
    #[arg(long)]
    output: Option<PathBuf>,
    /// Keep the HTTP bridge alive serving results
    #[arg(long, default_value_t = false)]
    serve: bool,
}

impl Args {
    fn apply(&self, config: &mut WorkflowConfig) {
        if let Some(path) = &self.races {
            config.races = Some(path.clone());
        }
        if let Some(dir) = &self.race_dir {
            config.race_dir = dir.clone();
        }
        if let Some(boat) = &self.boat {
            config.boat = Some(boat.clone());
        }
        if let Some(path) = &self.polar {
            config.polar = Some(path.clone());
        }
        if let Some(offset) = self.offset_ms {
            config.pipeline.time_offset_ms = offset;
        }
        if let Some(offset) = self.awa_offset {
            config.pipeline.calibration.awa_offset = offset;
        }
        if let Some(scale) = self.aws_scale {
            config.pipeline.calibration.aws_scale = scale;
        }
        if self.no_calibrate {
            config.pipeline.calibrate = false;
        }
        if let Some(seed) = self.seed {
            config.generator.seed = seed;
        }
    }
}

fn write_report(path: &Path, results: &[WorkflowResult]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating report directory {}", parent.display()))?;
    }
    let report = serde_json::to_string_pretty(results).context("serializing results")?;
    fs::write(path, report).with_context(|| format!("writing report {}", path.display()))
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut config = if let Some(path) = &args.workflow {
        WorkflowConfig::load(path)?
    } else {
        WorkflowConfig::default()
    };
    args.apply(&mut config);

    let runner = Runner::new(config.clone())?;
    let offset = config.pipeline.time_offset_ms;
    let mut results = Vec::new();

    if args.synthetic {
        let points = build_points(&config.generator)?;
        results.push(runner.execute("synthetic", points, offset)?);
    }
    if let Some(path) = &args.race {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("reading race {}", path.display()))?;
        let points = parse_race_points(&contents)
            .with_context(|| format!("parsing race {}", path.display()))?;
        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "race".to_string());
        results.push(runner.execute(&name, points, offset)?);
    }
    if let Some(id) = &args.race_id {
        let index = runner.index()?;
        let entry = index
            .find(id)
            .with_context(|| format!("race {} is not in the race list", id))?;
        results.push(runner.execute_entry(entry)?);
    }

    for result in &results {
        println!("{}", result.summary());
        for tack in &result.output.tacks {
            println!(
                "  tack {} at {} loss {:.1} ft ({:?})",
                tack.board,
                tack.time,
                tack.loss.unwrap_or(f64::NAN),
                tack.confidence
            );
        }
    }

    if let Some(path) = &args.output {
        write_report(path, &results)?;
    }

    if args.serve {
        let bridge = RaceBridge::new(BridgeModel::new(runner.index()?, config.boat.clone()));
        for result in results {
            bridge.publish(result);
        }
        bridge.spawn(Arc::new(runner), config.bind);
        println!("HTTP bridge on http://{} (Ctrl+C to stop)...", config.bind);
        let runtime = TokioBuilder::new_current_thread()
            .enable_all()
            .build()
            .context("creating runtime for signal handling")?;
        runtime.block_on(async {
            signal::ctrl_c().await.context("awaiting Ctrl+C to exit")?;
            Ok::<(), anyhow::Error>(())
        })?;
    }

    Ok(())
}
