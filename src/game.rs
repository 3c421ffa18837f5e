//! Game evaluation over an identified hand.

use crate::deck::{Card, FaceCode, Rank};

/// Result of evaluating one hand.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Index of the single winning card.
    Winner(usize),
    /// Indices of all cards sharing the best value, ascending.
    Tie(Vec<usize>),
    /// The hand was empty.
    Empty,
}

/// Rules applied to the cards detected in one frame.
pub trait GameEvaluator {
    fn evaluate(&self, hand: &[Card]) -> Outcome;
}

/// Highest card wins; suits are ignored.
///
/// Numeric ranks count their face value, `J`=11, `Q`=12, `K`=13, `A`=14
/// and jokers count 0.
#[derive(Clone, Copy, Debug, Default)]
pub struct HighCardGame;

impl HighCardGame {
    pub fn value(card: &Card) -> u32 {
        match card.rank() {
            Rank::Numeric(n) => n,
            Rank::Face(FaceCode::Jack) => 11,
            Rank::Face(FaceCode::Queen) => 12,
            Rank::Face(FaceCode::King) => 13,
            Rank::Face(FaceCode::Ace) => 14,
            Rank::Face(FaceCode::Joker) => 0,
        }
    }
}

impl GameEvaluator for HighCardGame {
    fn evaluate(&self, hand: &[Card]) -> Outcome {
        let Some(best) = hand.iter().map(Self::value).max() else {
            return Outcome::Empty;
        };
        let winners: Vec<usize> = hand
            .iter()
            .enumerate()
            .filter(|(_, card)| Self::value(card) == best)
            .map(|(idx, _)| idx)
            .collect();
        match winners.as_slice() {
            [single] => Outcome::Winner(*single),
            _ => Outcome::Tie(winners),
        }
    }
}
