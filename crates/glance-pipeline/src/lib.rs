//! Admission control and dispatch for live-stream classification.
//!
//! Frames arrive at capture rate (commonly 15-60 Hz) while one
//! inference call takes tens to hundreds of milliseconds. The pipeline
//! admits at most one frame at a time into the model and drops the
//! rest: queueing a backlog would only grow latency, and a live
//! preview needs timely results on the frames it does process, not a
//! result for every frame.

pub mod pipeline;
pub mod sink;
pub mod stats;

pub use pipeline::{Admission, ClassificationPipeline};
pub use sink::{ChannelSink, ResultSink};
pub use stats::PipelineStats;
