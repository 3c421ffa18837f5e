//! Deck list parsing and the prepared reference deck.
//!
//! The training image is a horizontal strip of canonical card squares,
//! one per deck-list entry in list order, stored either raw or already
//! binarized. Each slice is prepared once with the session's [`Strategy`]
//! so matching never re-processes the deck.

pub mod card;
pub mod list;

pub use card::{classify_rank, Card, FaceCode, Rank, RankToken};
pub use list::{parse_deck_list, read_deck_list};

use crate::frame::io::load_color_image;
use crate::matcher::{NormalizedCard, Strategy};
use crate::trace::{trace_event, trace_span};
use crate::util::{CardMatchError, CardMatchResult};
use image::{imageops, GenericImageView, RgbImage};
use std::path::Path;

/// One known card with its prepared reference image.
#[derive(Clone, Debug)]
pub struct DeckEntry {
    pub card: Card,
    pub image: NormalizedCard,
}

/// Ordered reference deck; entry order is the deck-list order.
#[derive(Clone, Debug, Default)]
pub struct Deck {
    entries: Vec<DeckEntry>,
}

impl Deck {
    /// Slices `training` into one canonical square per card.
    ///
    /// `training` must be exactly `cards.len() * size` wide and `size`
    /// high, where `size` is the strategy's canonical size.
    pub fn from_training_image<S: Strategy + ?Sized>(
        cards: Vec<Card>,
        training: &RgbImage,
        strategy: &S,
    ) -> CardMatchResult<Self> {
        if cards.is_empty() {
            return Err(CardMatchError::EmptyDeck);
        }
        let size = strategy.normalize_config().size;
        let expected_width = size * cards.len() as u32;
        if training.dimensions() != (expected_width, size) {
            return Err(CardMatchError::DeckImageMismatch {
                width: training.width(),
                height: training.height(),
                expected_width,
                expected_height: size,
            });
        }

        let _span = trace_span!("prepare_deck", cards = cards.len()).entered();
        let mut entries = Vec::with_capacity(cards.len());
        for (idx, card) in cards.into_iter().enumerate() {
            let slice = training.view(idx as u32 * size, 0, size, size).to_image();
            let image = strategy.prepare_reference(&slice)?;
            entries.push(DeckEntry { card, image });
        }
        trace_event!("deck_prepared", entries = entries.len());
        Ok(Self { entries })
    }

    /// Reads a deck list and its training image from disk.
    pub fn load<S: Strategy + ?Sized>(
        list_path: impl AsRef<Path>,
        image_path: impl AsRef<Path>,
        strategy: &S,
    ) -> CardMatchResult<Self> {
        let cards = read_deck_list(list_path)?;
        let training = load_color_image(image_path)?;
        Self::from_training_image(cards, &training, strategy)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[DeckEntry] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&DeckEntry> {
        self.entries.get(index)
    }
}

/// Packs equally sized square slices left to right into a training image.
pub fn compose_training_image(slices: &[RgbImage]) -> CardMatchResult<RgbImage> {
    let first = slices.first().ok_or(CardMatchError::EmptyDeck)?;
    let size = first.width();
    if size == 0 {
        return Err(CardMatchError::EmptyImage);
    }
    let mut out = RgbImage::new(size * slices.len() as u32, size);
    for (idx, slice) in slices.iter().enumerate() {
        if slice.dimensions() != (size, size) {
            return Err(CardMatchError::InvalidDimensions {
                width: slice.width(),
                height: slice.height(),
            });
        }
        imageops::replace(&mut out, slice, idx as i64 * size as i64, 0);
    }
    Ok(out)
}
