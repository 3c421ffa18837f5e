//! Perspective normalization into the canonical card square.
//!
//! The quadrilateral corners `[p1, p2, p3, p4]` map to the square corners
//! bottom-left, top-left, top-right, bottom-right, so the canonical
//! labelling of [`Quadrilateral`] fixes the card orientation up to a half
//! turn.

use crate::frame::{adaptive_threshold_inv, blur, ensure_not_empty, to_gray};
use crate::quad::Quadrilateral;
use crate::util::{CardMatchError, CardMatchResult};
use image::{GrayImage, Rgb, RgbImage};
use imageproc::geometric_transformations::{warp_into, Interpolation, Projection};

/// Side length, in pixels, of the canonical card square.
pub const CANONICAL_SIZE: u32 = 450;

/// Parameters of the perspective normalizer and its binarizing chain.
#[derive(Clone, Debug)]
pub struct NormalizeConfig {
    /// Side of the output square.
    pub size: u32,
    /// Gaussian sigma applied before adaptive thresholding.
    pub blur_sigma: f32,
    /// Adaptive threshold window (odd, >= 3).
    pub block_size: u32,
    /// Constant subtracted from the local mean.
    pub offset: i16,
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self {
            size: CANONICAL_SIZE,
            blur_sigma: 2.0,
            block_size: 11,
            offset: 1,
        }
    }
}

impl NormalizeConfig {
    pub fn validate(&self) -> CardMatchResult<()> {
        if self.size < 2 {
            return Err(CardMatchError::InvalidConfig {
                reason: "canonical size must be at least 2",
            });
        }
        if self.block_size < 3 || self.block_size % 2 == 0 {
            return Err(CardMatchError::InvalidConfig {
                reason: "block_size must be odd and >= 3",
            });
        }
        Ok(())
    }

    /// Square corners matching `[p1, p2, p3, p4]`.
    fn target_corners(&self) -> [(f32, f32); 4] {
        let m = (self.size - 1) as f32;
        [(0.0, m), (0.0, 0.0), (m, 0.0), (m, m)]
    }
}

/// Warps the quadrilateral region of `image` into the canonical square.
///
/// The result is always `size x size`, whatever the quadrilateral's size
/// or shape. Pixels mapped from outside the frame are black.
pub fn warp_card(
    image: &RgbImage,
    quad: &Quadrilateral,
    cfg: &NormalizeConfig,
) -> CardMatchResult<RgbImage> {
    ensure_not_empty(image.width(), image.height())?;
    cfg.validate()?;
    let from = quad.corners().map(|p| (p.x, p.y));
    let projection = Projection::from_control_points(from, cfg.target_corners()).ok_or(
        CardMatchError::DegenerateGeometry {
            reason: "no projective transform for quadrilateral",
        },
    )?;
    let mut out = RgbImage::new(cfg.size, cfg.size);
    warp_into(
        image,
        &projection,
        Interpolation::Bilinear,
        Rgb([0, 0, 0]),
        &mut out,
    );
    Ok(out)
}

/// Grayscale, Gaussian smoothing, inverted adaptive threshold.
///
/// Removes illumination gradients so binarized cards compare pixel by
/// pixel.
pub fn binarize_card(card: &RgbImage, cfg: &NormalizeConfig) -> GrayImage {
    let gray = to_gray(card);
    let smooth = blur(&gray, cfg.blur_sigma);
    adaptive_threshold_inv(&smooth, cfg.block_size, cfg.offset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;

    fn quad(corners: [(f32, f32); 4]) -> Quadrilateral {
        Quadrilateral::new(corners.map(|(x, y)| Point::new(x, y))).unwrap()
    }

    #[test]
    fn output_is_always_canonical_size() {
        let cfg = NormalizeConfig::default();
        for (w, h) in [(64u32, 48u32), (640, 480), (1200, 900)] {
            let img = RgbImage::from_pixel(w, h, Rgb([200, 10, 10]));
            let q = quad([
                (2.0, 3.0),
                (w as f32 * 0.7, 1.0),
                (w as f32 - 3.0, h as f32 - 2.0),
                (1.0, h as f32 * 0.8),
            ]);
            let out = warp_card(&img, &q, &cfg).unwrap();
            assert_eq!(out.dimensions(), (CANONICAL_SIZE, CANONICAL_SIZE));
        }
    }

    #[test]
    fn warp_samples_inside_the_quad() {
        let mut img = RgbImage::from_pixel(300, 300, Rgb([0, 0, 0]));
        for y in 50..250 {
            for x in 100..200 {
                img.put_pixel(x, y, Rgb([255, 255, 255]));
            }
        }
        let q = quad([(100.0, 50.0), (199.0, 50.0), (199.0, 249.0), (100.0, 249.0)]);
        let cfg = NormalizeConfig {
            size: 64,
            ..NormalizeConfig::default()
        };
        let out = warp_card(&img, &q, &cfg).unwrap();
        assert_eq!(out.get_pixel(32, 32)[0], 255);
        assert_eq!(out.get_pixel(5, 58)[0], 255);
    }

    #[test]
    fn binarized_card_keeps_canonical_size() {
        let card = RgbImage::from_pixel(40, 40, Rgb([230, 230, 230]));
        let cfg = NormalizeConfig {
            size: 40,
            ..NormalizeConfig::default()
        };
        let bin = binarize_card(&card, &cfg);
        assert_eq!(bin.dimensions(), (40, 40));
        assert!(bin.pixels().all(|p| p[0] == 0));
    }
}
