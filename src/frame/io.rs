//! Loading frames and deck assets from disk via the `image` crate.

use crate::util::{CardMatchError, CardMatchResult};
use image::RgbImage;
use std::path::Path;

/// Loads an image file as an 8-bit RGB frame.
///
/// Files that decode to zero pixels are rejected as `EmptyImage`.
pub fn load_color_image<P: AsRef<Path>>(path: P) -> CardMatchResult<RgbImage> {
    let img = image::open(path.as_ref()).map_err(|err| CardMatchError::ImageIo {
        reason: format!("{}: {err}", path.as_ref().display()),
    })?;
    let rgb = img.to_rgb8();
    super::ensure_not_empty(rgb.width(), rgb.height())?;
    Ok(rgb)
}
