/// Pinhole camera intrinsics attached to a capture stream.
///
/// Optional side data passed along with a frame so a model can use the
/// camera geometry for context. Focal lengths and principal point are
/// in pixel units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraIntrinsics {
    fx: f32,
    fy: f32,
    cx: f32,
    cy: f32,
}

impl CameraIntrinsics {
    pub fn new(fx: f32, fy: f32, cx: f32, cy: f32) -> Self {
        Self { fx, fy, cx, cy }
    }

    /// Focal lengths (fx, fy) in pixels.
    pub fn focal(&self) -> (f32, f32) {
        (self.fx, self.fy)
    }

    /// Principal point (cx, cy) in pixels.
    pub fn principal_point(&self) -> (f32, f32) {
        (self.cx, self.cy)
    }
}
