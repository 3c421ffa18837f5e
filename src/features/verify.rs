//! Geometric verification of descriptor correspondences.
//!
//! Two stages: drop correspondences whose descriptor distance exceeds a
//! limit, then (with at least four left) keep only those consistent with
//! a single homography found by RANSAC. Sampling uses a fixed seed, so a
//! given input always yields the same output.

use super::{DescriptorMatch, Keypoint};
use crate::geometry::{distance, estimate_homography, homography_from_4pt, Homography, Point};
use crate::trace::trace_event;
use crate::util::{CardMatchError, CardMatchResult};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Minimum correspondences for a homography.
const MIN_SAMPLE: usize = 4;

/// Verification parameters.
#[derive(Clone, Debug)]
pub struct VerifyConfig {
    /// Largest Hamming distance a correspondence may have.
    pub max_distance: u32,
    /// Reprojection tolerance in pixels.
    pub ransac_threshold: f32,
    pub ransac_iterations: usize,
    pub seed: u64,
}

impl Default for VerifyConfig {
    fn default() -> Self {
        Self {
            max_distance: 64,
            ransac_threshold: 3.0,
            ransac_iterations: 500,
            seed: 0x0052_A4C5,
        }
    }
}

impl VerifyConfig {
    pub fn validate(&self) -> CardMatchResult<()> {
        if !self.ransac_threshold.is_finite() || self.ransac_threshold <= 0.0 {
            return Err(CardMatchError::InvalidConfig {
                reason: "ransac_threshold must be finite and > 0",
            });
        }
        if self.ransac_iterations == 0 {
            return Err(CardMatchError::InvalidConfig {
                reason: "ransac_iterations must be > 0",
            });
        }
        Ok(())
    }
}

/// Filters `matches` between `query` and `train` keypoints.
///
/// Returns a subset of `matches` in their original order. With fewer than
/// four correspondences after the distance filter the survivors are
/// returned without geometric checking.
pub fn verify(
    matches: &[DescriptorMatch],
    query: &[Keypoint],
    train: &[Keypoint],
    cfg: &VerifyConfig,
) -> Vec<DescriptorMatch> {
    let close: Vec<DescriptorMatch> = matches
        .iter()
        .copied()
        .filter(|m| m.distance <= cfg.max_distance)
        .filter(|m| m.query_idx < query.len() && m.train_idx < train.len())
        .collect();
    if close.len() < MIN_SAMPLE {
        return close;
    }

    let src: Vec<Point> = close
        .iter()
        .map(|m| Point::new(query[m.query_idx].x, query[m.query_idx].y))
        .collect();
    let dst: Vec<Point> = close
        .iter()
        .map(|m| Point::new(train[m.train_idx].x, train[m.train_idx].y))
        .collect();

    let mask = ransac_inliers(&src, &dst, cfg);
    close
        .into_iter()
        .zip(mask)
        .filter_map(|(m, keep)| keep.then_some(m))
        .collect()
}

fn inlier_mask(h: &Homography, src: &[Point], dst: &[Point], tol: f32) -> (Vec<bool>, usize) {
    let mut count = 0;
    let mask = src
        .iter()
        .zip(dst)
        .map(|(s, d)| {
            let ok = h.apply(*s).is_some_and(|p| distance(p, *d) <= tol);
            count += ok as usize;
            ok
        })
        .collect();
    (mask, count)
}

fn ransac_inliers(src: &[Point], dst: &[Point], cfg: &VerifyConfig) -> Vec<bool> {
    let n = src.len();
    let mut rng = StdRng::seed_from_u64(cfg.seed);
    let mut best: Option<(Vec<bool>, usize)> = None;

    for _ in 0..cfg.ransac_iterations {
        let sample = rand::seq::index::sample(&mut rng, n, MIN_SAMPLE);
        let s = [
            src[sample.index(0)],
            src[sample.index(1)],
            src[sample.index(2)],
            src[sample.index(3)],
        ];
        let d = [
            dst[sample.index(0)],
            dst[sample.index(1)],
            dst[sample.index(2)],
            dst[sample.index(3)],
        ];
        let Some(h) = homography_from_4pt(&s, &d) else {
            continue;
        };
        let (mask, count) = inlier_mask(&h, src, dst, cfg.ransac_threshold);
        if best.as_ref().map_or(true, |(_, c)| count > *c) {
            best = Some((mask, count));
            if count == n {
                break;
            }
        }
    }

    let Some((mask, count)) = best else {
        trace_event!("ransac_no_model", candidates = n);
        return vec![false; n];
    };
    if count < MIN_SAMPLE {
        return mask;
    }

    // One least-squares refit on the consensus set.
    let (in_src, in_dst): (Vec<Point>, Vec<Point>) = src
        .iter()
        .zip(dst)
        .zip(&mask)
        .filter(|(_, keep)| **keep)
        .map(|((s, d), _)| (*s, *d))
        .unzip();
    if let Some(refit) = estimate_homography(&in_src, &in_dst) {
        let (refined, refined_count) = inlier_mask(&refit, src, dst, cfg.ransac_threshold);
        if refined_count >= count {
            return refined;
        }
    }
    mask
}
