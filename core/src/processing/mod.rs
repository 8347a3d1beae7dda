pub mod average;
pub mod calibration;
pub mod delayed;
pub mod derivative;
pub mod pipeline;
pub mod segment;
pub mod window;

pub use average::RollingAverage;
pub use calibration::{AbsoluteAngles, Calibration, CalibrationStage};
pub use delayed::DelayedInputs;
pub use derivative::Derivative;
pub use pipeline::{build_out_data, Pipeline, PipelineConfig, PipelineOutput};
pub use segment::{
    performance_track, reference_wind_direction, segment_data, summarize_data, Bucket, Segment,
    Span, TrackSegment,
};
pub use window::RingWindow;
