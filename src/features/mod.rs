//! Keypoints, binary descriptors and correspondence verification.
//!
//! Detection is FAST-9 on a smoothed grayscale card, thinned by
//! non-maximum suppression and capped at the strongest `max_keypoints`.
//! Each keypoint gets an intensity-centroid orientation and a 256-bit
//! steered BRIEF descriptor drawn from a fixed-seed sampling pattern, so
//! descriptors are reproducible across runs and processes.

mod brief;
mod matching;
mod select;
mod verify;

pub use brief::SamplingPattern;
pub use matching::{hamming, match_descriptors, DescriptorMatch};
pub use select::select_keypoints;
pub use verify::{verify, VerifyConfig};

use crate::frame::blur;
use crate::util::{CardMatchError, CardMatchResult};
use image::GrayImage;
use imageproc::corners::corners_fast9;

/// 256-bit binary descriptor.
pub type Descriptor = [u8; 32];

/// Oriented corner in card coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Keypoint {
    pub x: f32,
    pub y: f32,
    /// Orientation in radians.
    pub angle: f32,
    /// FAST corner score.
    pub score: f32,
}

/// Keypoints with their descriptors, index-aligned.
#[derive(Clone, Debug, Default)]
pub struct FeatureSet {
    pub keypoints: Vec<Keypoint>,
    pub descriptors: Vec<Descriptor>,
}

impl FeatureSet {
    pub fn len(&self) -> usize {
        self.keypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keypoints.is_empty()
    }
}

/// Keypoint detection and description parameters.
#[derive(Clone, Debug)]
pub struct FeatureConfig {
    /// FAST intensity threshold.
    pub fast_threshold: u8,
    /// Strongest keypoints kept per image.
    pub max_keypoints: usize,
    /// Chebyshev radius for corner suppression.
    pub nms_radius: u32,
    /// Gaussian sigma applied before detection and sampling.
    pub blur_sigma: f32,
    /// Seed of the BRIEF sampling pattern.
    pub pattern_seed: u64,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            fast_threshold: 20,
            max_keypoints: 500,
            nms_radius: 3,
            blur_sigma: 2.0,
            pattern_seed: 0x00C4_4D5E,
        }
    }
}

impl FeatureConfig {
    pub fn validate(&self) -> CardMatchResult<()> {
        if self.max_keypoints == 0 {
            return Err(CardMatchError::InvalidConfig {
                reason: "max_keypoints must be > 0",
            });
        }
        if !self.blur_sigma.is_finite() || self.blur_sigma < 0.0 {
            return Err(CardMatchError::InvalidConfig {
                reason: "feature blur_sigma must be finite and >= 0",
            });
        }
        Ok(())
    }
}

/// Keypoint detector and descriptor extractor with a prebuilt pattern.
#[derive(Clone, Debug)]
pub struct FeatureExtractor {
    cfg: FeatureConfig,
    pattern: SamplingPattern,
}

impl Default for FeatureExtractor {
    fn default() -> Self {
        let cfg = FeatureConfig::default();
        let pattern = SamplingPattern::new(cfg.pattern_seed);
        Self { cfg, pattern }
    }
}

impl FeatureExtractor {
    pub fn new(cfg: FeatureConfig) -> CardMatchResult<Self> {
        cfg.validate()?;
        let pattern = SamplingPattern::new(cfg.pattern_seed);
        Ok(Self { cfg, pattern })
    }

    pub fn config(&self) -> &FeatureConfig {
        &self.cfg
    }

    /// Detects keypoints and computes their descriptors.
    ///
    /// Corners too close to the border for a full sampling patch are
    /// dropped before selection.
    pub fn detect_and_describe(&self, gray: &GrayImage) -> FeatureSet {
        let smooth = blur(gray, self.cfg.blur_sigma);
        let margin = SamplingPattern::MARGIN;
        let (w, h) = smooth.dimensions();
        if w <= 2 * margin || h <= 2 * margin {
            return FeatureSet::default();
        }

        let corners: Vec<_> = corners_fast9(&smooth, self.cfg.fast_threshold)
            .into_iter()
            .filter(|c| c.x >= margin && c.y >= margin && c.x < w - margin && c.y < h - margin)
            .collect();
        let selected = select_keypoints(corners, self.cfg.nms_radius, self.cfg.max_keypoints);

        let mut set = FeatureSet::default();
        for corner in selected {
            let angle = brief::centroid_angle(&smooth, corner.x, corner.y);
            let descriptor = self.pattern.describe(&smooth, corner.x, corner.y, angle);
            set.keypoints.push(Keypoint {
                x: corner.x as f32,
                y: corner.y as f32,
                angle,
                score: corner.score,
            });
            set.descriptors.push(descriptor);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    fn checker_card(size: u32, cell: u32) -> GrayImage {
        GrayImage::from_fn(size, size, |x, y| {
            let v = ((x / cell) * 7 + (y / cell) * 3) % 5;
            Luma([(v * 60) as u8])
        })
    }

    #[test]
    fn flat_image_has_no_keypoints() {
        let ex = FeatureExtractor::new(FeatureConfig::default()).unwrap();
        let set = ex.detect_and_describe(&GrayImage::from_pixel(120, 120, Luma([128])));
        assert!(set.is_empty());
    }

    #[test]
    fn textured_image_is_deterministic() {
        let ex = FeatureExtractor::new(FeatureConfig::default()).unwrap();
        let img = checker_card(160, 16);
        let a = ex.detect_and_describe(&img);
        let b = ex.detect_and_describe(&img);
        assert!(!a.is_empty());
        assert_eq!(a.keypoints, b.keypoints);
        assert_eq!(a.descriptors, b.descriptors);
        assert_eq!(a.keypoints.len(), a.descriptors.len());
    }

    #[test]
    fn keypoints_respect_limits() {
        let cfg = FeatureConfig {
            max_keypoints: 10,
            ..FeatureConfig::default()
        };
        let ex = FeatureExtractor::new(cfg).unwrap();
        let set = ex.detect_and_describe(&checker_card(200, 10));
        assert!(set.len() <= 10);
        let m = SamplingPattern::MARGIN as f32;
        assert!(set
            .keypoints
            .iter()
            .all(|k| k.x >= m && k.y >= m && k.x < 200.0 - m && k.y < 200.0 - m));
    }

    #[test]
    fn zero_keypoint_budget_is_rejected() {
        let cfg = FeatureConfig {
            max_keypoints: 0,
            ..FeatureConfig::default()
        };
        assert!(FeatureExtractor::new(cfg).is_err());
    }
}
