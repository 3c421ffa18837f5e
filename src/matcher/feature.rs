//! Verified keypoint-correspondence strategy.

use super::{NormalizedCard, Strategy, StrategyKind};
use crate::features::{
    match_descriptors, verify, FeatureConfig, FeatureExtractor, FeatureSet, VerifyConfig,
};
use crate::frame::to_gray;
use crate::util::{CardMatchError, CardMatchResult};
use crate::warp::NormalizeConfig;
use image::RgbImage;

/// Score of a pair with no correspondences at all.
const NO_MATCHES: i64 = -1;

/// Scores cards by verified correspondences; higher is better.
#[derive(Clone, Debug)]
pub struct FeatureStrategy {
    normalize: NormalizeConfig,
    extractor: FeatureExtractor,
    verify: VerifyConfig,
}

impl FeatureStrategy {
    pub fn new(
        normalize: NormalizeConfig,
        features: FeatureConfig,
        verify: VerifyConfig,
    ) -> CardMatchResult<Self> {
        normalize.validate()?;
        verify.validate()?;
        Ok(Self {
            normalize,
            extractor: FeatureExtractor::new(features)?,
            verify,
        })
    }

    pub fn verify_config(&self) -> &VerifyConfig {
        &self.verify
    }
}

impl Default for FeatureStrategy {
    fn default() -> Self {
        Self {
            normalize: NormalizeConfig::default(),
            extractor: FeatureExtractor::default(),
            verify: VerifyConfig::default(),
        }
    }
}

fn feature_set(card: &NormalizedCard) -> CardMatchResult<&FeatureSet> {
    card.features.as_ref().ok_or(CardMatchError::InvalidConfig {
        reason: "card was not prepared for feature matching",
    })
}

impl Strategy for FeatureStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Feature
    }

    fn normalize_config(&self) -> &NormalizeConfig {
        &self.normalize
    }

    fn preprocess(&self, card: &RgbImage) -> CardMatchResult<NormalizedCard> {
        if card.dimensions() != (self.normalize.size, self.normalize.size) {
            return Err(CardMatchError::InvalidDimensions {
                width: card.width(),
                height: card.height(),
            });
        }
        let gray = to_gray(card);
        let features = self.extractor.detect_and_describe(&gray);
        Ok(NormalizedCard {
            image: gray,
            features: Some(features),
        })
    }

    fn score(&self, probe: &NormalizedCard, entry: &NormalizedCard) -> CardMatchResult<i64> {
        let probe = feature_set(probe)?;
        let entry = feature_set(entry)?;
        let raw = match_descriptors(&probe.descriptors, &entry.descriptors);
        if raw.is_empty() {
            return Ok(NO_MATCHES);
        }
        let kept = verify(&raw, &probe.keypoints, &entry.keypoints, &self.verify);
        Ok(kept.len() as i64)
    }

    fn better(&self, candidate: i64, incumbent: i64) -> bool {
        candidate > incumbent
    }

    fn confident(&self, score: i64) -> bool {
        score > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn small() -> FeatureStrategy {
        FeatureStrategy::new(
            NormalizeConfig {
                size: 160,
                ..NormalizeConfig::default()
            },
            FeatureConfig::default(),
            VerifyConfig::default(),
        )
        .unwrap()
    }

    fn textured() -> RgbImage {
        let mut rng = StdRng::seed_from_u64(11);
        let cells: Vec<u8> = (0..100).map(|_| rng.random_range(0..=255)).collect();
        RgbImage::from_fn(160, 160, |x, y| {
            let v = cells[((y / 16) * 10 + x / 16) as usize];
            Rgb([v, v, v])
        })
    }

    #[test]
    fn card_matches_itself() {
        let s = small();
        let a = s.preprocess(&textured()).unwrap();
        let b = s.preprocess(&textured()).unwrap();
        let n = a.features.as_ref().unwrap().len() as i64;
        assert!(n >= 8);
        let score = s.score(&a, &b).unwrap();
        assert!(score * 2 >= n, "score {score} of {n}");
        assert!(s.confident(score));
    }

    #[test]
    fn featureless_pair_scores_floor() {
        let s = small();
        let flat = RgbImage::from_pixel(160, 160, Rgb([200, 200, 200]));
        let a = s.preprocess(&flat).unwrap();
        let b = s.preprocess(&textured()).unwrap();
        assert_eq!(s.score(&a, &b).unwrap(), NO_MATCHES);
        assert!(!s.confident(NO_MATCHES));
        assert!(s.better(0, NO_MATCHES));
    }

    #[test]
    fn binary_prepared_cards_are_rejected() {
        let s = small();
        let a = s.preprocess(&textured()).unwrap();
        let bare = NormalizedCard {
            image: a.image.clone(),
            features: None,
        };
        assert!(s.score(&a, &bare).is_err());
    }
}
