//! Pixel-disagreement strategy over binarized cards.

use super::{NormalizedCard, Strategy, StrategyKind};
use crate::frame::{abs_diff, binarize, box_smooth, count_non_zero, to_gray};
use crate::util::{CardMatchError, CardMatchResult};
use crate::warp::{binarize_card, NormalizeConfig};
use image::RgbImage;

/// Midpoint separating ink from paper in a stored binarized strip.
const STORED_LEVEL: u8 = 127;

/// Difference-image parameters.
#[derive(Clone, Debug)]
pub struct BinaryConfig {
    /// Box filter radius applied to the difference image.
    pub diff_blur_radius: u32,
    /// Smoothed difference values above this level disagree.
    pub diff_threshold: u8,
    /// Training strips are stored already binarized.
    ///
    /// Slices are then used as stored instead of going through the
    /// binarizing chain a second time.
    pub prebinarized_deck: bool,
}

impl Default for BinaryConfig {
    fn default() -> Self {
        Self {
            diff_blur_radius: 2,
            diff_threshold: 200,
            prebinarized_deck: false,
        }
    }
}

/// Scores cards by the number of disagreeing pixels; lower is better.
///
/// Isolated single-pixel differences along stroke edges are smoothed
/// below the threshold, so only solid disagreeing regions count.
#[derive(Clone, Debug, Default)]
pub struct BinaryStrategy {
    normalize: NormalizeConfig,
    cfg: BinaryConfig,
}

impl BinaryStrategy {
    pub fn new(normalize: NormalizeConfig, cfg: BinaryConfig) -> CardMatchResult<Self> {
        normalize.validate()?;
        Ok(Self { normalize, cfg })
    }

    pub fn config(&self) -> &BinaryConfig {
        &self.cfg
    }

    fn check_size(&self, card: &RgbImage) -> CardMatchResult<()> {
        if card.dimensions() != (self.normalize.size, self.normalize.size) {
            return Err(CardMatchError::InvalidDimensions {
                width: card.width(),
                height: card.height(),
            });
        }
        Ok(())
    }
}

impl Strategy for BinaryStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Binary
    }

    fn normalize_config(&self) -> &NormalizeConfig {
        &self.normalize
    }

    fn preprocess(&self, card: &RgbImage) -> CardMatchResult<NormalizedCard> {
        self.check_size(card)?;
        Ok(NormalizedCard {
            image: binarize_card(card, &self.normalize),
            features: None,
        })
    }

    fn prepare_reference(&self, slice: &RgbImage) -> CardMatchResult<NormalizedCard> {
        if !self.cfg.prebinarized_deck {
            return self.preprocess(slice);
        }
        self.check_size(slice)?;
        // Snap lossy-stored levels back to 0/255.
        Ok(NormalizedCard {
            image: binarize(&to_gray(slice), STORED_LEVEL),
            features: None,
        })
    }

    fn score(&self, probe: &NormalizedCard, entry: &NormalizedCard) -> CardMatchResult<i64> {
        let diff = abs_diff(&probe.image, &entry.image)?;
        let smooth = box_smooth(&diff, self.cfg.diff_blur_radius);
        let disagree = binarize(&smooth, self.cfg.diff_threshold);
        Ok(count_non_zero(&disagree) as i64)
    }

    fn better(&self, candidate: i64, incumbent: i64) -> bool {
        candidate < incumbent
    }
}
