//! Image decoding and raster utilities for the glance ecosystem.
//!
//! Wraps the `image` crate to decode compressed camera frames (MJPEG,
//! PNG, ...) into packed RGB8 buffers, and provides the CPU raster
//! operations the classifier preprocessing needs: nearest-neighbor
//! resize and orientation rotation.

pub mod error;
pub mod raster;

pub use error::ImageError;
pub use raster::{orient_rgb8, resize_nearest_rgb8};

use glance_base::Frame;

/// Decode a compressed image from raw bytes into an RGB8 `Frame`.
///
/// The format is auto-detected by the `image` crate; whatever the
/// source pixel layout, the result is converted to packed RGB8 in HWC
/// order. Timestamp and orientation on the returned frame are defaults;
/// the caller stamps them from capture metadata.
///
/// # Errors
///
/// Returns `ImageError::Decode` if the data is invalid or the format
/// is unsupported.
pub fn decode_frame(data: &[u8]) -> Result<Frame, ImageError> {
    let img = crates_image::load_from_memory(data)?;
    let rgb = img.to_rgb8();
    let (width, height) = rgb.dimensions();
    Ok(Frame::rgb8(width as usize, height as usize, rgb.into_raw()))
}
