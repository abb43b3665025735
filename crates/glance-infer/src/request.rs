use glance_base::{CameraIntrinsics, Frame};

/// One admitted frame on its way to the model.
///
/// Constructed only after admission; a dropped frame never becomes a
/// request. Lives for exactly one inference call.
#[derive(Clone, Debug, PartialEq)]
pub struct ClassificationRequest {
    frame: Frame,
    intrinsics: Option<CameraIntrinsics>,
}

impl ClassificationRequest {
    pub fn new(frame: Frame) -> Self {
        Self {
            frame,
            intrinsics: None,
        }
    }

    /// Attach camera intrinsics as model context.
    pub fn with_intrinsics(mut self, intrinsics: CameraIntrinsics) -> Self {
        self.intrinsics = Some(intrinsics);
        self
    }

    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    pub fn intrinsics(&self) -> Option<&CameraIntrinsics> {
        self.intrinsics.as_ref()
    }
}
