//! Performance-analysis core for sailboat instrument logs.
//!
//! Raw samples flow through an ordered chain of stateful stages that derive
//! true/ground wind, VMG and polar performance, then get segmented into
//! boards and scored tacks.

pub mod maneuver;
pub mod math;
pub mod polar;
pub mod prelude;
pub mod processing;
pub mod race_interface;
pub mod telemetry;

pub use prelude::{AnalysisError, AnalysisResult, PointStage, StageOutcome};
pub use processing::pipeline::{build_out_data, Pipeline, PipelineConfig, PipelineOutput};
