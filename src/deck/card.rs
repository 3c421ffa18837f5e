//! Card identities and rank classification.

use std::fmt;

/// Face-card codes accepted in deck lists.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FaceCode {
    Jack,
    Queen,
    King,
    Ace,
    Joker,
}

impl FaceCode {
    /// Parses a face-card token (`J`, `Q`, `K`, `A`, `JOKER`), case-insensitive.
    pub fn from_token(token: &str) -> Option<Self> {
        match token.to_ascii_uppercase().as_str() {
            "J" => Some(FaceCode::Jack),
            "Q" => Some(FaceCode::Queen),
            "K" => Some(FaceCode::King),
            "A" => Some(FaceCode::Ace),
            "JOKER" => Some(FaceCode::Joker),
            _ => None,
        }
    }
}

/// Classification of a rank token.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RankToken {
    Numeric(u32),
    Face(FaceCode),
    Invalid,
}

/// Classifies a rank token without using parse failures for control flow
/// at the call site.
pub fn classify_rank(token: &str) -> RankToken {
    if !token.is_empty() && token.bytes().all(|b| b.is_ascii_digit()) {
        return match token.parse::<u32>() {
            Ok(n) => RankToken::Numeric(n),
            Err(_) => RankToken::Invalid,
        };
    }
    match FaceCode::from_token(token) {
        Some(code) => RankToken::Face(code),
        None => RankToken::Invalid,
    }
}

/// Rank of a valid card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Rank {
    Numeric(u32),
    Face(FaceCode),
}

/// Identity of one physical card.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Card {
    rank: Rank,
    symbol: String,
    suit: String,
}

impl Card {
    /// Builds a card from its rank and suit tokens.
    ///
    /// Returns `None` if the rank token is invalid.
    pub fn from_tokens(rank: &str, suit: &str) -> Option<Self> {
        let rank_value = match classify_rank(rank) {
            RankToken::Numeric(n) => Rank::Numeric(n),
            RankToken::Face(code) => Rank::Face(code),
            RankToken::Invalid => return None,
        };
        Some(Self {
            rank: rank_value,
            symbol: rank.to_string(),
            suit: suit.to_string(),
        })
    }

    pub fn rank(&self) -> Rank {
        self.rank
    }

    /// True for numeric ranks.
    pub fn is_number(&self) -> bool {
        matches!(self.rank, Rank::Numeric(_))
    }

    /// Rank token as written in the deck list.
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn suit(&self) -> &str {
        &self.suit
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.symbol, self.suit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_is_total() {
        assert_eq!(classify_rank("7"), RankToken::Numeric(7));
        assert_eq!(classify_rank("10"), RankToken::Numeric(10));
        assert_eq!(classify_rank("k"), RankToken::Face(FaceCode::King));
        assert_eq!(classify_rank("Joker"), RankToken::Face(FaceCode::Joker));
        assert_eq!(classify_rank(""), RankToken::Invalid);
        assert_eq!(classify_rank("7x"), RankToken::Invalid);
        assert_eq!(classify_rank("-3"), RankToken::Invalid);
        assert_eq!(classify_rank("99999999999999999999"), RankToken::Invalid);
    }

    #[test]
    fn card_keeps_tokens() {
        let card = Card::from_tokens("Q", "Diamonds").unwrap();
        assert!(!card.is_number());
        assert_eq!(card.symbol(), "Q");
        assert_eq!(card.to_string(), "Q Diamonds");
        assert!(Card::from_tokens("Z", "Clubs").is_none());
    }
}
