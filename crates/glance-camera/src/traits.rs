use crate::CameraError;
use glance_base::Frame;

/// Async source of captured frames.
///
/// Implementations deliver decoded RGB8 `Frame`s at the device's
/// native cadence. `recv` must hand the frame over with its capture
/// timestamp and orientation already stamped; downstream admission
/// control decides whether the frame is actually processed.
#[allow(async_fn_in_trait)]
pub trait FrameSource {
    /// Receive the next frame from the source.
    async fn recv(&mut self) -> Result<Frame, CameraError>;
}
