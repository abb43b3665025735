use crate::ImageError;
use glance_base::Orientation;

fn check_rgb8(src: &[u8], width: usize, height: usize) -> Result<(), ImageError> {
    if width == 0 || height == 0 {
        return Err(ImageError::Geometry(format!(
            "dimensions must be non-zero, got {width}x{height}"
        )));
    }
    let expected = width
        .checked_mul(height)
        .and_then(|n| n.checked_mul(3))
        .ok_or_else(|| ImageError::Geometry("dimension overflow".to_string()))?;
    if src.len() != expected {
        return Err(ImageError::Geometry(format!(
            "RGB8 buffer size mismatch: expected {expected} bytes, got {}",
            src.len()
        )));
    }
    Ok(())
}

/// Resize a packed RGB8 buffer with nearest-neighbor sampling.
///
/// Nearest-neighbor keeps preprocessing cheap enough for a per-frame
/// path; callers wanting better quality can pre-resize with a slower
/// filter before classification.
pub fn resize_nearest_rgb8(
    src: &[u8],
    src_w: usize,
    src_h: usize,
    dst_w: usize,
    dst_h: usize,
) -> Result<Vec<u8>, ImageError> {
    check_rgb8(src, src_w, src_h)?;
    if dst_w == 0 || dst_h == 0 {
        return Err(ImageError::Geometry(format!(
            "target dimensions must be non-zero, got {dst_w}x{dst_h}"
        )));
    }

    let mut dst = Vec::with_capacity(dst_w * dst_h * 3);
    for y in 0..dst_h {
        let sy = y * src_h / dst_h;
        for x in 0..dst_w {
            let sx = x * src_w / dst_w;
            let idx = (sy * src_w + sx) * 3;
            dst.extend_from_slice(&src[idx..idx + 3]);
        }
    }
    Ok(dst)
}

/// Rotate a packed RGB8 buffer so the image appears upright.
///
/// Returns `(width, height, pixels)` of the rotated buffer. `Right`
/// rotates 90 degrees clockwise, `Left` 90 degrees counter-clockwise,
/// `Down` 180 degrees; `Up` is a plain copy.
pub fn orient_rgb8(
    src: &[u8],
    width: usize,
    height: usize,
    orientation: Orientation,
) -> Result<(usize, usize, Vec<u8>), ImageError> {
    check_rgb8(src, width, height)?;

    match orientation {
        Orientation::Up => Ok((width, height, src.to_vec())),
        Orientation::Down => {
            let mut dst = vec![0u8; src.len()];
            for y in 0..height {
                for x in 0..width {
                    let s = (y * width + x) * 3;
                    let d = ((height - 1 - y) * width + (width - 1 - x)) * 3;
                    dst[d..d + 3].copy_from_slice(&src[s..s + 3]);
                }
            }
            Ok((width, height, dst))
        }
        Orientation::Right => {
            // 90 CW: (x, y) -> (new_x = h-1-y, new_y = x), new size (h, w)
            let mut dst = vec![0u8; src.len()];
            for y in 0..height {
                for x in 0..width {
                    let s = (y * width + x) * 3;
                    let d = (x * height + (height - 1 - y)) * 3;
                    dst[d..d + 3].copy_from_slice(&src[s..s + 3]);
                }
            }
            Ok((height, width, dst))
        }
        Orientation::Left => {
            // 90 CCW: (x, y) -> (new_x = y, new_y = w-1-x), new size (h, w)
            let mut dst = vec![0u8; src.len()];
            for y in 0..height {
                for x in 0..width {
                    let s = (y * width + x) * 3;
                    let d = ((width - 1 - x) * height + y) * 3;
                    dst[d..d + 3].copy_from_slice(&src[s..s + 3]);
                }
            }
            Ok((height, width, dst))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: [u8; 3] = [1, 1, 1];
    const B: [u8; 3] = [2, 2, 2];
    const C: [u8; 3] = [3, 3, 3];
    const D: [u8; 3] = [4, 4, 4];

    fn buf(pixels: &[[u8; 3]]) -> Vec<u8> {
        pixels.iter().flatten().copied().collect()
    }

    #[test]
    fn test_resize_identity() {
        let src = buf(&[A, B, C, D]);
        let dst = resize_nearest_rgb8(&src, 2, 2, 2, 2).unwrap();
        assert_eq!(dst, src);
    }

    #[test]
    fn test_resize_upscale_2x() {
        let src = buf(&[A, B]);
        let dst = resize_nearest_rgb8(&src, 2, 1, 4, 1).unwrap();
        assert_eq!(dst, buf(&[A, A, B, B]));
    }

    #[test]
    fn test_resize_downscale() {
        let src = buf(&[A, B, C, D]);
        let dst = resize_nearest_rgb8(&src, 4, 1, 2, 1).unwrap();
        assert_eq!(dst, buf(&[A, C]));
    }

    #[test]
    fn test_resize_rejects_bad_buffer() {
        assert!(resize_nearest_rgb8(&[0u8; 5], 2, 1, 4, 4).is_err());
        assert!(resize_nearest_rgb8(&buf(&[A, B]), 2, 1, 0, 4).is_err());
    }

    #[test]
    fn test_orient_up_is_copy() {
        let src = buf(&[A, B, C, D]);
        let (w, h, dst) = orient_rgb8(&src, 2, 2, Orientation::Up).unwrap();
        assert_eq!((w, h), (2, 2));
        assert_eq!(dst, src);
    }

    #[test]
    fn test_orient_down_reverses() {
        let src = buf(&[A, B, C, D]);
        let (w, h, dst) = orient_rgb8(&src, 2, 2, Orientation::Down).unwrap();
        assert_eq!((w, h), (2, 2));
        assert_eq!(dst, buf(&[D, C, B, A]));
    }

    #[test]
    fn test_orient_right_rotates_clockwise() {
        // [A B] as a 2x1 strip becomes a 1x2 column [A; B]
        let src = buf(&[A, B]);
        let (w, h, dst) = orient_rgb8(&src, 2, 1, Orientation::Right).unwrap();
        assert_eq!((w, h), (1, 2));
        assert_eq!(dst, buf(&[A, B]));

        // 2x2 check: top row [A B] ends up as right column
        let src = buf(&[A, B, C, D]);
        let (w, h, dst) = orient_rgb8(&src, 2, 2, Orientation::Right).unwrap();
        assert_eq!((w, h), (2, 2));
        assert_eq!(dst, buf(&[C, A, D, B]));
    }

    #[test]
    fn test_orient_left_rotates_counter_clockwise() {
        let src = buf(&[A, B, C, D]);
        let (w, h, dst) = orient_rgb8(&src, 2, 2, Orientation::Left).unwrap();
        assert_eq!((w, h), (2, 2));
        assert_eq!(dst, buf(&[B, D, A, C]));
    }
}
