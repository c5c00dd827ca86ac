//! PNG export of a [`Raster`] and image decoding into [`RasterImage`].
//!
//! This module is feature-gated behind `png` (default on) so that WASM builds
//! can depend on the `engines` crate without pulling in the `image` crate.
//! Compositing itself lives in [`crate::raster`] (always available).

use motes_core::error::SimError;
use motes_core::RasterImage;
use std::path::Path;

use crate::raster::Raster;

/// Writes a raster as an RGBA PNG.
///
/// Returns `SimError::InvalidDimensions` if the raster dimensions overflow
/// `u32`, or `SimError::Io` on write failure.
pub fn write_png(raster: &Raster, path: &Path) -> Result<(), SimError> {
    let w = u32::try_from(raster.width()).map_err(|_| SimError::InvalidDimensions)?;
    let h = u32::try_from(raster.height()).map_err(|_| SimError::InvalidDimensions)?;
    let img = image::RgbaImage::from_raw(w, h, raster.to_rgba8())
        .ok_or_else(|| SimError::Io("RGBA buffer size mismatch".into()))?;
    img.save(path).map_err(|e| SimError::Io(e.to_string()))
}

/// Decodes a PNG or JPEG file into straight RGBA8 pixels.
pub fn load_image(path: &Path) -> Result<RasterImage, SimError> {
    let img = image::open(path)
        .map_err(|e| SimError::Io(format!("{}: {e}", path.display())))?
        .to_rgba8();
    let (w, h) = img.dimensions();
    RasterImage::new(w as usize, h as usize, img.into_raw())
}
