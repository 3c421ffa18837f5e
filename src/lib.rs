//! CardMatch locates playing cards in a photo and identifies them against a
//! known deck.
//!
//! A detection pass extracts card outlines, recovers a quadrilateral per
//! outline, warps it into a canonical square and scores it against every
//! deck entry with a pixel-difference or a verified-keypoint strategy.
//! Deck scoring can run in parallel via the `rayon` feature.

pub mod boundary;
pub mod deck;
pub mod features;
pub mod frame;
pub mod game;
pub mod geometry;
pub mod lowlevel;
pub mod matcher;
pub mod pipeline;
pub mod quad;
mod trace;
pub mod util;
pub mod warp;

pub use boundary::{extract, Boundary, ExtractConfig};
pub use deck::{compose_training_image, parse_deck_list, Card, Deck, DeckEntry, Rank};
pub use features::{FeatureConfig, VerifyConfig};
pub use game::{GameEvaluator, HighCardGame, Outcome};
pub use geometry::Point;
pub use matcher::{
    BinaryConfig, BinaryStrategy, FeatureStrategy, Identification, MatchConfig, Matcher,
    NormalizedCard, Strategy, StrategyKind,
};
pub use pipeline::{DetectConfig, DetectedCard, Detection, Detector, MatchedCard};
pub use quad::{QuadConfig, QuadRecoverer, QuadStrategy, Quadrilateral};
pub use util::{CardMatchError, CardMatchResult};
pub use warp::{binarize_card, warp_card, NormalizeConfig, CANONICAL_SIZE};
