//! Error types for cardmatch.

use thiserror::Error;

/// Result alias for cardmatch operations.
pub type CardMatchResult<T> = std::result::Result<T, CardMatchError>;

/// Errors that can occur while locating and identifying cards.
#[derive(Debug, Error)]
pub enum CardMatchError {
    /// The source image has no pixels.
    #[error("image is empty")]
    EmptyImage,
    /// Image dimensions do not fit the requested operation.
    #[error("invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },
    /// The composite deck image does not hold one canonical slice per card.
    #[error("deck image is {width}x{height}, expected {expected_width}x{expected_height}")]
    DeckImageMismatch {
        width: u32,
        height: u32,
        expected_width: u32,
        expected_height: u32,
    },
    /// A deck list line could not be parsed.
    #[error("deck list line {line}: {reason}")]
    DeckListParse { line: usize, reason: String },
    /// The deck holds no cards.
    #[error("deck is empty")]
    EmptyDeck,
    /// A boundary did not yield a usable quadrilateral.
    #[error("degenerate geometry: {reason}")]
    DegenerateGeometry { reason: &'static str },
    /// A configuration value is out of range.
    #[error("invalid config: {reason}")]
    InvalidConfig { reason: &'static str },
    /// Decoding or encoding an image failed.
    #[error("image io error: {reason}")]
    ImageIo { reason: String },
    /// Reading a file failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CardMatchError {
    /// Returns true for per-region failures the pipeline recovers from.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, CardMatchError::DegenerateGeometry { .. })
    }
}
