use std::fmt;
use std::time::Duration;

#[derive(Debug, PartialEq)]
pub enum FrameError {
    EmptyFrame,
    ZeroDimension { width: usize, height: usize },
    SizeOverflow,
    SizeMismatch { expected: usize, got: usize },
}

impl fmt::Display for FrameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameError::EmptyFrame => write!(f, "frame has no pixel data"),
            FrameError::ZeroDimension { width, height } => {
                write!(f, "frame dimensions must be non-zero, got {width}x{height}")
            }
            FrameError::SizeOverflow => write!(f, "frame dimensions overflow when multiplied"),
            FrameError::SizeMismatch { expected, got } => {
                write!(f, "pixel buffer size mismatch: expected {expected} bytes, got {got}")
            }
        }
    }
}

impl std::error::Error for FrameError {}

/// Display orientation of a captured frame.
///
/// `Up` means the buffer is already upright. `Left`/`Right` mean the
/// buffer must be rotated 90 degrees (counter-clockwise / clockwise)
/// to appear upright; `Down` means 180 degrees.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Orientation {
    #[default]
    Up,
    Down,
    Left,
    Right,
}

impl Orientation {
    /// True when applying this orientation swaps width and height.
    pub fn swaps_axes(self) -> bool {
        matches!(self, Orientation::Left | Orientation::Right)
    }
}

/// One captured image sample.
///
/// Pixels are tightly packed RGB8 in row-major HWC order. The timestamp
/// is relative to the start of the capture stream that produced the frame.
#[derive(Clone, PartialEq)]
pub struct Frame {
    width: usize,
    height: usize,
    channels: usize,
    pixels: Vec<u8>,
    timestamp: Duration,
    orientation: Orientation,
}

impl fmt::Debug for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Frame")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("channels", &self.channels)
            .field("pixels", &format_args!("<{} bytes>", self.pixels.len()))
            .field("timestamp", &self.timestamp)
            .field("orientation", &self.orientation)
            .finish()
    }
}

impl Frame {
    /// Create an RGB8 frame (3 channels) from a packed pixel buffer.
    pub fn rgb8(width: usize, height: usize, pixels: Vec<u8>) -> Self {
        Self {
            width,
            height,
            channels: 3,
            pixels,
            timestamp: Duration::ZERO,
            orientation: Orientation::Up,
        }
    }

    /// Set the capture timestamp (relative to stream start).
    pub fn with_timestamp(mut self, timestamp: Duration) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Set the orientation metadata.
    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn timestamp(&self) -> Duration {
        self.timestamp
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Check that the frame carries usable pixel data.
    ///
    /// A frame that fails validation must never be admitted for
    /// inference; callers reject it before any state transition.
    pub fn validate(&self) -> Result<(), FrameError> {
        if self.pixels.is_empty() {
            return Err(FrameError::EmptyFrame);
        }
        if self.width == 0 || self.height == 0 {
            return Err(FrameError::ZeroDimension {
                width: self.width,
                height: self.height,
            });
        }
        let expected = self
            .width
            .checked_mul(self.height)
            .and_then(|n| n.checked_mul(self.channels))
            .ok_or(FrameError::SizeOverflow)?;
        if expected != self.pixels.len() {
            return Err(FrameError::SizeMismatch {
                expected,
                got: self.pixels.len(),
            });
        }
        Ok(())
    }
}
