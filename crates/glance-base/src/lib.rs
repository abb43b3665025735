//! Shared base types for the glance ecosystem.
//!
//! Provides the `Frame` type exchanged between capture and inference,
//! camera intrinsics side data, and logging setup.

pub mod frame;
pub mod intrinsics;
pub mod logging;

pub use frame::{Frame, FrameError, Orientation};
pub use intrinsics::CameraIntrinsics;
pub use logging::{init_stdout_logger, StdoutLogger};

// Re-export log so downstream crates can use glance_base::log::*
pub use log;
