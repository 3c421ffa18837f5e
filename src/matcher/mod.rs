//! Card identification against a deck.
//!
//! A [`Strategy`] turns a normalized card into a comparable form and
//! scores it against prepared deck entries. The [`Matcher`] evaluates the
//! card as warped and turned by a half turn against every deck entry. Each
//! entry keeps its better orientation (upright on a tie) and the scan keeps
//! the first strictly better entry.

mod binary;
mod feature;

pub use binary::{BinaryConfig, BinaryStrategy};
pub use feature::FeatureStrategy;

use crate::deck::{Deck, DeckEntry};
use crate::features::FeatureSet;
use crate::frame::{ensure_not_empty, rotate_half_turn};
use crate::trace::{trace_event, trace_span};
use crate::util::CardMatchResult;
use crate::warp::NormalizeConfig;
use image::{GrayImage, RgbImage};

/// Strategy selector, used by configuration front ends.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum StrategyKind {
    /// Pixel disagreement count between binarized cards.
    #[default]
    Binary,
    /// Verified keypoint correspondence count.
    Feature,
}

/// A canonical card prepared for scoring.
#[derive(Clone, Debug)]
pub struct NormalizedCard {
    /// Binarized card (binary strategy) or grayscale card (feature strategy).
    pub image: GrayImage,
    /// Keypoints and descriptors, present for the feature strategy.
    pub features: Option<FeatureSet>,
}

/// Card comparison method, selected once and shared by deck and matcher.
pub trait Strategy: Send + Sync {
    fn kind(&self) -> StrategyKind;

    /// Canonical-square parameters the strategy expects.
    fn normalize_config(&self) -> &NormalizeConfig;

    /// Prepares a canonical card image for scoring.
    fn preprocess(&self, card: &RgbImage) -> CardMatchResult<NormalizedCard>;

    /// Prepares one training-strip slice as a deck entry.
    fn prepare_reference(&self, slice: &RgbImage) -> CardMatchResult<NormalizedCard> {
        self.preprocess(slice)
    }

    /// Scores `probe` against a prepared deck entry.
    fn score(&self, probe: &NormalizedCard, entry: &NormalizedCard) -> CardMatchResult<i64>;

    /// True if `candidate` is strictly better than `incumbent`.
    fn better(&self, candidate: i64, incumbent: i64) -> bool;

    /// True if `score` is a usable identification.
    fn confident(&self, _score: i64) -> bool {
        true
    }
}

/// Identification result for one card.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Identification {
    /// Index of the matched deck entry.
    pub index: usize,
    pub score: i64,
    /// True if the half-turned card scored better.
    pub flipped: bool,
}

/// Matcher configuration.
#[derive(Clone, Debug, Default)]
pub struct MatchConfig {
    /// Score deck entries in parallel (requires the `rayon` feature).
    pub parallel: bool,
}

/// Identifies canonical cards against a deck with a fixed strategy.
pub struct Matcher<S> {
    strategy: S,
    cfg: MatchConfig,
}

impl<S: Strategy> Matcher<S> {
    pub fn new(strategy: S) -> Self {
        Self {
            strategy,
            cfg: MatchConfig::default(),
        }
    }

    pub fn with_config(mut self, cfg: MatchConfig) -> Self {
        self.cfg = cfg;
        self
    }

    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    pub fn config(&self) -> &MatchConfig {
        &self.cfg
    }

    /// Identifies a warped card.
    ///
    /// Returns `None` for an empty deck or when the best score is not
    /// confident for the strategy.
    pub fn identify(&self, warped: &RgbImage, deck: &Deck) -> CardMatchResult<Option<Identification>> {
        ensure_not_empty(warped.width(), warped.height())?;
        let _span = trace_span!("identify", deck = deck.len()).entered();
        if deck.is_empty() {
            return Ok(None);
        }

        let upright = self.strategy.preprocess(warped)?;
        let turned = self.strategy.preprocess(&rotate_half_turn(warped))?;

        let mut best: Option<Identification> = None;
        let scores = self.score_all(&upright, &turned, deck)?;
        for (index, (up, flip)) in scores.into_iter().enumerate() {
            let candidate = if self.strategy.better(flip, up) {
                Identification {
                    index,
                    score: flip,
                    flipped: true,
                }
            } else {
                Identification {
                    index,
                    score: up,
                    flipped: false,
                }
            };
            if best.map_or(true, |b| self.strategy.better(candidate.score, b.score)) {
                best = Some(candidate);
            }
        }
        let Some(best) = best else {
            return Ok(None);
        };

        trace_event!(
            "identify_best",
            index = best.index,
            score = best.score,
            flipped = best.flipped
        );
        if !self.strategy.confident(best.score) {
            return Ok(None);
        }
        Ok(Some(best))
    }

    /// Scores both orientations of the card against every entry, in deck
    /// order.
    fn score_all(
        &self,
        upright: &NormalizedCard,
        turned: &NormalizedCard,
        deck: &Deck,
    ) -> CardMatchResult<Vec<(i64, i64)>> {
        let score_pair = |entry: &DeckEntry| -> CardMatchResult<(i64, i64)> {
            Ok((
                self.strategy.score(upright, &entry.image)?,
                self.strategy.score(turned, &entry.image)?,
            ))
        };

        #[cfg(feature = "rayon")]
        {
            if self.cfg.parallel {
                use rayon::prelude::*;
                // Collecting keeps entry order, so the reduction stays sequential.
                return deck.entries().par_iter().map(score_pair).collect();
            }
        }

        deck.entries().iter().map(score_pair).collect()
    }
}

impl<T: Strategy + ?Sized> Strategy for Box<T> {
    fn kind(&self) -> StrategyKind {
        (**self).kind()
    }

    fn normalize_config(&self) -> &NormalizeConfig {
        (**self).normalize_config()
    }

    fn preprocess(&self, card: &RgbImage) -> CardMatchResult<NormalizedCard> {
        (**self).preprocess(card)
    }

    fn prepare_reference(&self, slice: &RgbImage) -> CardMatchResult<NormalizedCard> {
        (**self).prepare_reference(slice)
    }

    fn score(&self, probe: &NormalizedCard, entry: &NormalizedCard) -> CardMatchResult<i64> {
        (**self).score(probe, entry)
    }

    fn better(&self, candidate: i64, incumbent: i64) -> bool {
        (**self).better(candidate, incumbent)
    }

    fn confident(&self, score: i64) -> bool {
        (**self).confident(score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::{compose_training_image, Card};
    use crate::frame::to_gray;
    use image::Rgb;

    /// Scores the top-left pixel distance; lower is better.
    struct CornerStrategy {
        normalize: NormalizeConfig,
    }

    impl CornerStrategy {
        fn new() -> Self {
            Self {
                normalize: NormalizeConfig {
                    size: 4,
                    ..NormalizeConfig::default()
                },
            }
        }
    }

    impl Strategy for CornerStrategy {
        fn kind(&self) -> StrategyKind {
            StrategyKind::Binary
        }

        fn normalize_config(&self) -> &NormalizeConfig {
            &self.normalize
        }

        fn preprocess(&self, card: &RgbImage) -> CardMatchResult<NormalizedCard> {
            Ok(NormalizedCard {
                image: to_gray(card),
                features: None,
            })
        }

        fn score(&self, probe: &NormalizedCard, entry: &NormalizedCard) -> CardMatchResult<i64> {
            let a = i64::from(probe.image.get_pixel(0, 0)[0]);
            let b = i64::from(entry.image.get_pixel(0, 0)[0]);
            Ok((a - b).abs())
        }

        fn better(&self, candidate: i64, incumbent: i64) -> bool {
            candidate < incumbent
        }
    }

    fn slice(corner: u8) -> RgbImage {
        let mut img = RgbImage::from_pixel(4, 4, Rgb([0, 0, 0]));
        img.put_pixel(0, 0, Rgb([corner; 3]));
        img
    }

    fn deck(corners: &[u8], strategy: &CornerStrategy) -> Deck {
        let slices: Vec<RgbImage> = corners.iter().map(|&c| slice(c)).collect();
        let strip = compose_training_image(&slices).unwrap();
        let cards = (0..corners.len())
            .map(|i| Card::from_tokens(&(i + 2).to_string(), "Hearts").unwrap())
            .collect();
        Deck::from_training_image(cards, &strip, strategy).unwrap()
    }

    /// Top-left 100 upright, 50 once turned by a half turn.
    fn probe_card() -> RgbImage {
        let mut img = slice(100);
        img.put_pixel(3, 3, Rgb([50; 3]));
        img
    }

    #[test]
    fn earlier_entry_wins_a_tie_across_orientations() {
        let strategy = CornerStrategy::new();
        // Entry 0: upright 40, turned 10. Entry 1: upright 10, turned 60.
        let deck = deck(&[60, 110], &strategy);
        let matcher = Matcher::new(strategy);
        let id = matcher.identify(&probe_card(), &deck).unwrap().unwrap();
        assert_eq!(
            id,
            Identification {
                index: 0,
                score: 10,
                flipped: true,
            }
        );
    }

    #[test]
    fn upright_wins_a_tie_within_an_entry() {
        let strategy = CornerStrategy::new();
        // Upright and turned both score 25 against the only entry.
        let deck = deck(&[75], &strategy);
        let matcher = Matcher::new(strategy);
        let id = matcher.identify(&probe_card(), &deck).unwrap().unwrap();
        assert_eq!(id.index, 0);
        assert_eq!(id.score, 25);
        assert!(!id.flipped);
    }

    #[test]
    fn strictly_better_later_entry_replaces_the_best() {
        let strategy = CornerStrategy::new();
        let deck = deck(&[0, 200, 98], &strategy);
        let matcher = Matcher::new(strategy);
        let id = matcher.identify(&probe_card(), &deck).unwrap().unwrap();
        assert_eq!((id.index, id.score, id.flipped), (2, 2, false));
    }
}
