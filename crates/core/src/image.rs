//! Decoded raster images handed to the reveal effect.

use crate::error::SimError;

/// A decoded RGBA8 image in row-major order.
///
/// Zero-sized images are allowed; they simply sample to nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    width: usize,
    height: usize,
    rgba: Vec<u8>,
}

impl RasterImage {
    /// Wraps a decoded pixel buffer.
    ///
    /// Returns `SimError::ImageBufferMismatch` if `rgba.len()` is not
    /// `width * height * 4`, and `SimError::InvalidDimensions` if that
    /// product overflows.
    pub fn new(width: usize, height: usize, rgba: Vec<u8>) -> Result<Self, SimError> {
        let expected = width
            .checked_mul(height)
            .and_then(|n| n.checked_mul(4))
            .ok_or(SimError::InvalidDimensions)?;
        if rgba.len() != expected {
            return Err(SimError::ImageBufferMismatch {
                expected,
                got: rgba.len(),
            });
        }
        Ok(Self {
            width,
            height,
            rgba,
        })
    }

    /// Creates an image where every pixel is `pixel`.
    pub fn filled(width: usize, height: usize, pixel: [u8; 4]) -> Result<Self, SimError> {
        let count = width
            .checked_mul(height)
            .ok_or(SimError::InvalidDimensions)?;
        Self::new(width, height, pixel.repeat(count))
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Raw RGBA bytes.
    pub fn data(&self) -> &[u8] {
        &self.rgba
    }

    /// RGBA value at `(x, y)`, or `None` outside the image.
    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y * self.width + x) * 4;
        Some([
            self.rgba[i],
            self.rgba[i + 1],
            self.rgba[i + 2],
            self.rgba[i + 3],
        ])
    }

    /// Overwrites the pixel at `(x, y)`. Out-of-range writes are ignored.
    pub fn set_pixel(&mut self, x: usize, y: usize, pixel: [u8; 4]) {
        if x >= self.width || y >= self.height {
            return;
        }
        let i = (y * self.width + x) * 4;
        self.rgba[i..i + 4].copy_from_slice(&pixel);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_accepts_matching_buffer() {
        let img = RasterImage::new(2, 3, vec![0; 24]).unwrap();
        assert_eq!(img.width(), 2);
        assert_eq!(img.height(), 3);
        assert_eq!(img.data().len(), 24);
    }

    #[test]
    fn new_rejects_short_buffer() {
        let err = RasterImage::new(2, 2, vec![0; 15]).unwrap_err();
        assert!(matches!(
            err,
            SimError::ImageBufferMismatch {
                expected: 16,
                got: 15
            }
        ));
    }

    #[test]
    fn new_rejects_overflowing_dimensions() {
        assert!(matches!(
            RasterImage::new(usize::MAX, 2, Vec::new()),
            Err(SimError::InvalidDimensions)
        ));
    }

    #[test]
    fn zero_sized_image_is_valid() {
        let img = RasterImage::new(0, 0, Vec::new()).unwrap();
        assert_eq!(img.pixel(0, 0), None);
    }

    #[test]
    fn pixel_reads_row_major() {
        let mut data = vec![0; 2 * 2 * 4];
        data[(2 + 1) * 4..(2 + 1) * 4 + 4].copy_from_slice(&[1, 2, 3, 4]);
        let img = RasterImage::new(2, 2, data).unwrap();
        assert_eq!(img.pixel(1, 1), Some([1, 2, 3, 4]));
        assert_eq!(img.pixel(0, 1), Some([0, 0, 0, 0]));
        assert_eq!(img.pixel(2, 0), None);
    }

    #[test]
    fn filled_and_set_pixel() {
        let mut img = RasterImage::filled(3, 1, [9, 9, 9, 255]).unwrap();
        img.set_pixel(2, 0, [1, 1, 1, 0]);
        img.set_pixel(5, 5, [7, 7, 7, 7]);
        assert_eq!(img.pixel(0, 0), Some([9, 9, 9, 255]));
        assert_eq!(img.pixel(2, 0), Some([1, 1, 1, 0]));
    }
}
