//! Deck list parsing: one `<rank> <suit>` pair per line.

use crate::deck::card::Card;
use crate::util::{CardMatchError, CardMatchResult};
use std::path::Path;

/// Parses a deck list; blank lines are skipped.
///
/// Every other line must hold exactly two whitespace-separated tokens with
/// a valid rank. Errors carry the 1-based line number.
pub fn parse_deck_list(text: &str) -> CardMatchResult<Vec<Card>> {
    let mut cards = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        let line_no = idx + 1;
        let tokens: Vec<&str> = line.split_whitespace().collect();
        match tokens.as_slice() {
            [] => continue,
            [rank, suit] => {
                let card =
                    Card::from_tokens(rank, suit).ok_or_else(|| CardMatchError::DeckListParse {
                        line: line_no,
                        reason: format!("invalid rank token {rank:?}"),
                    })?;
                cards.push(card);
            }
            other => {
                return Err(CardMatchError::DeckListParse {
                    line: line_no,
                    reason: format!("expected 2 tokens, found {}", other.len()),
                })
            }
        }
    }
    Ok(cards)
}

/// Reads and parses a deck list file.
pub fn read_deck_list<P: AsRef<Path>>(path: P) -> CardMatchResult<Vec<Card>> {
    let text = std::fs::read_to_string(path)?;
    parse_deck_list(&text)
}
