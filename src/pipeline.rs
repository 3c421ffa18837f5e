//! End-to-end detection pass over one frame.
//!
//! Extraction, quadrilateral recovery on the largest `expected` outlines,
//! perspective normalization and identification against the deck. A
//! region whose geometry degenerates is dropped; the rest of the frame is
//! still processed.

use crate::boundary::{extract, Boundary, ExtractConfig};
use crate::deck::{Card, Deck};
use crate::matcher::{Identification, MatchConfig, Matcher, Strategy};
use crate::quad::{QuadConfig, QuadRecoverer, Quadrilateral};
use crate::trace::{trace_event, trace_span, trace_warn};
use crate::util::CardMatchResult;
use crate::warp::warp_card;
use image::RgbImage;

/// Stage parameters of a detection pass.
#[derive(Clone, Debug, Default)]
pub struct DetectConfig {
    pub extract: ExtractConfig,
    pub quad: QuadConfig,
    pub matching: MatchConfig,
}

impl DetectConfig {
    pub fn validate(&self) -> CardMatchResult<()> {
        self.extract.validate()?;
        self.quad.validate()
    }
}

/// Deck identity assigned to a detected region.
#[derive(Clone, Debug, PartialEq)]
pub struct MatchedCard {
    pub card: Card,
    /// Index of the deck entry.
    pub index: usize,
    pub score: i64,
    pub flipped: bool,
}

/// One processed card region.
#[derive(Clone, Debug)]
pub struct DetectedCard {
    pub quad: Quadrilateral,
    pub boundary: Boundary,
    /// `None` when no deck entry matched confidently.
    pub matched: Option<MatchedCard>,
}

/// Result of a detection pass.
#[derive(Clone, Debug)]
pub enum Detection {
    /// Regions processed, largest outline first.
    Cards(Vec<DetectedCard>),
    /// Fewer outlines than cards expected; the frame should be skipped.
    Insufficient { found: usize, expected: usize },
}

impl Detection {
    /// Processed regions; empty for an insufficient frame.
    pub fn cards(&self) -> &[DetectedCard] {
        match self {
            Detection::Cards(cards) => cards,
            Detection::Insufficient { .. } => &[],
        }
    }

    pub fn is_insufficient(&self) -> bool {
        matches!(self, Detection::Insufficient { .. })
    }

    /// Identified cards in region order, for a game evaluator.
    ///
    /// Unmatched regions are skipped, so hand positions are not region
    /// indices; see [`Detection::hand_regions`].
    pub fn hand(&self) -> Vec<Card> {
        self.cards()
            .iter()
            .filter_map(|d| d.matched.as_ref().map(|m| m.card.clone()))
            .collect()
    }

    /// Region index of every [`Detection::hand`] position.
    pub fn hand_regions(&self) -> Vec<usize> {
        self.cards()
            .iter()
            .enumerate()
            .filter_map(|(region, d)| d.matched.as_ref().map(|_| region))
            .collect()
    }
}

/// Locates and identifies cards with a prepared deck.
pub struct Detector<S> {
    deck: Deck,
    matcher: Matcher<S>,
    cfg: DetectConfig,
}

impl<S: Strategy> Detector<S> {
    pub fn new(deck: Deck, strategy: S, cfg: DetectConfig) -> CardMatchResult<Self> {
        cfg.validate()?;
        strategy.normalize_config().validate()?;
        let matcher = Matcher::new(strategy).with_config(cfg.matching.clone());
        Ok(Self { deck, matcher, cfg })
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn matcher(&self) -> &Matcher<S> {
        &self.matcher
    }

    pub fn config(&self) -> &DetectConfig {
        &self.cfg
    }

    /// Runs one detection pass expecting `expected` cards.
    ///
    /// Only an empty frame is a hard error. Too few outlines yield
    /// [`Detection::Insufficient`].
    pub fn detect(&self, image: &RgbImage, expected: usize) -> CardMatchResult<Detection> {
        let _span = trace_span!("detect", expected = expected).entered();
        let boundaries = extract(image, expected, &self.cfg.extract)?;
        if boundaries.len() < expected {
            trace_event!("insufficient", found = boundaries.len(), expected = expected);
            return Ok(Detection::Insufficient {
                found: boundaries.len(),
                expected,
            });
        }

        let mut cards = Vec::with_capacity(expected);
        for (region, boundary) in boundaries.into_iter().take(expected).enumerate() {
            match self.process_region(image, boundary) {
                Ok(card) => cards.push(card),
                Err(err) if err.is_recoverable() => {
                    trace_warn!(
                        "region_dropped",
                        region = region,
                        reason = err.to_string().as_str()
                    );
                }
                Err(err) => return Err(err),
            }
        }
        trace_event!("detected", count = cards.len());
        Ok(Detection::Cards(cards))
    }

    fn process_region(
        &self,
        image: &RgbImage,
        boundary: Boundary,
    ) -> CardMatchResult<DetectedCard> {
        let quad = self.cfg.quad.recover(&boundary)?;
        let warped = warp_card(image, &quad, self.matcher.strategy().normalize_config())?;
        let matched = self
            .matcher
            .identify(&warped, &self.deck)?
            .and_then(|id| self.matched_card(id));
        Ok(DetectedCard {
            quad,
            boundary,
            matched,
        })
    }

    /// `id.index` always comes from a scan over this deck.
    fn matched_card(&self, id: Identification) -> Option<MatchedCard> {
        self.deck.get(id.index).map(|entry| MatchedCard {
            card: entry.card.clone(),
            index: id.index,
            score: id.score,
            flipped: id.flipped,
        })
    }
}
