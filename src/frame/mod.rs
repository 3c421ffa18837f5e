//! Raster helpers shared by the detection stages.
//!
//! Source frames are 8-bit RGB (`image::RgbImage`); every stage past the
//! colour warp works on 8-bit grayscale (`image::GrayImage`). Filters here
//! wrap `imageproc` primitives with the parameters the pipeline needs.

pub mod io;

use crate::util::{CardMatchError, CardMatchResult};
use image::{GrayImage, Luma, RgbImage};
use imageproc::contrast::{threshold, ThresholdType};
use imageproc::filter::{box_filter, gaussian_blur_f32};

/// Fails with `EmptyImage` if the frame has no pixels.
pub fn ensure_not_empty(width: u32, height: u32) -> CardMatchResult<()> {
    if width == 0 || height == 0 {
        return Err(CardMatchError::EmptyImage);
    }
    Ok(())
}

/// Converts an RGB frame to single-channel intensity.
pub fn to_gray(image: &RgbImage) -> GrayImage {
    image::imageops::grayscale(image)
}

/// Gaussian smoothing; `sigma <= 0` returns a copy.
pub fn blur(image: &GrayImage, sigma: f32) -> GrayImage {
    if sigma > 0.0 {
        gaussian_blur_f32(image, sigma)
    } else {
        image.clone()
    }
}

/// Fixed global threshold: pixels strictly above `level` become 255.
pub fn binarize(image: &GrayImage, level: u8) -> GrayImage {
    threshold(image, level, ThresholdType::Binary)
}

/// Locally windowed, inverted binarization.
///
/// A pixel becomes 255 when it is darker than the Gaussian-weighted mean of
/// its neighbourhood minus `offset`, else 0. The window weight follows
/// `sigma = 0.3 * ((block - 1) / 2 - 1) + 0.8`, so `block = 11` gives
/// `sigma = 2`.
pub fn adaptive_threshold_inv(image: &GrayImage, block: u32, offset: i16) -> GrayImage {
    let sigma = 0.3 * ((block.max(3) as f32 - 1.0) * 0.5 - 1.0) + 0.8;
    let local = gaussian_blur_f32(image, sigma);
    let mut out = GrayImage::new(image.width(), image.height());
    for (x, y, px) in image.enumerate_pixels() {
        let mean = i16::from(local.get_pixel(x, y)[0]);
        let value = if i16::from(px[0]) > mean - offset { 0 } else { 255 };
        out.put_pixel(x, y, Luma([value]));
    }
    out
}

/// Per-pixel absolute difference of two equally sized images.
pub fn abs_diff(a: &GrayImage, b: &GrayImage) -> CardMatchResult<GrayImage> {
    if a.dimensions() != b.dimensions() {
        return Err(CardMatchError::InvalidDimensions {
            width: b.width(),
            height: b.height(),
        });
    }
    let mut out = GrayImage::new(a.width(), a.height());
    for ((dst, pa), pb) in out.pixels_mut().zip(a.pixels()).zip(b.pixels()) {
        dst[0] = pa[0].abs_diff(pb[0]);
    }
    Ok(out)
}

/// Mean filter over a `(2r + 1)^2` window.
pub fn box_smooth(image: &GrayImage, radius: u32) -> GrayImage {
    if radius == 0 {
        return image.clone();
    }
    box_filter(image, radius, radius)
}

/// Number of non-zero pixels.
pub fn count_non_zero(image: &GrayImage) -> usize {
    image.as_raw().iter().filter(|&&v| v != 0).count()
}

/// Rotates a frame by 180 degrees.
pub fn rotate_half_turn<P>(
    image: &image::ImageBuffer<P, Vec<P::Subpixel>>,
) -> image::ImageBuffer<P, Vec<P::Subpixel>>
where
    P: image::Pixel + 'static,
{
    image::imageops::rotate180(image)
}
