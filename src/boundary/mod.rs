//! Boundary extraction: from a raw frame to ranked closed outlines.
//!
//! The frame is reduced to intensity, smoothed hard enough to wash out the
//! printed content of a card, split with a fixed global threshold, passed
//! through Canny and finally traced into closed point sequences. Outlines
//! are ranked by signed enclosed area, largest first.

use crate::frame::{binarize, blur, ensure_not_empty, to_gray};
use crate::geometry::{signed_area, Point};
use crate::trace::{trace_event, trace_span};
use crate::util::{CardMatchError, CardMatchResult};
use image::RgbImage;
use imageproc::contours::{find_contours, BorderType};
use imageproc::edges::canny;

/// Parameters of the boundary extractor.
#[derive(Clone, Debug)]
pub struct ExtractConfig {
    /// Gaussian sigma applied before thresholding.
    pub blur_sigma: f32,
    /// Global intensity threshold separating cards from the table.
    pub threshold: u8,
    /// Canny hysteresis low threshold.
    pub canny_low: f32,
    /// Canny hysteresis high threshold.
    pub canny_high: f32,
    /// Outlines with fewer points are discarded.
    pub min_points: usize,
    /// Keep only outer borders not nested in another region.
    ///
    /// With `false` every traced border is returned, holes ranked by
    /// negative area.
    pub outermost_only: bool,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            blur_sigma: 3.0,
            threshold: 120,
            canny_low: 20.0,
            canny_high: 60.0,
            min_points: 4,
            outermost_only: true,
        }
    }
}

impl ExtractConfig {
    pub fn validate(&self) -> CardMatchResult<()> {
        if !self.blur_sigma.is_finite() || self.blur_sigma < 0.0 {
            return Err(CardMatchError::InvalidConfig {
                reason: "blur_sigma must be finite and >= 0",
            });
        }
        if !(self.canny_low >= 0.0 && self.canny_high >= self.canny_low) {
            return Err(CardMatchError::InvalidConfig {
                reason: "canny thresholds must satisfy 0 <= low <= high",
            });
        }
        Ok(())
    }
}

/// Closed outline of one connected region.
#[derive(Clone, Debug, PartialEq)]
pub struct Boundary {
    points: Vec<Point>,
    area: f32,
}

impl Boundary {
    /// Creates a boundary, ranking it by its own signed area.
    pub fn new(points: Vec<Point>) -> Self {
        let area = signed_area(&points);
        Self { points, area }
    }

    fn with_area(points: Vec<Point>, area: f32) -> Self {
        Self { points, area }
    }

    /// Outline points in traversal order.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Oriented enclosed area used for ranking.
    ///
    /// Outer borders count positive and hole borders negative, so the inner
    /// trace of an edge ring never ties with its outer trace.
    pub fn area(&self) -> f32 {
        self.area
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Extracts card outlines from a frame, largest enclosed area first.
///
/// `min_count` is the number of cards expected. A result shorter than
/// `min_count` is not an error: the caller decides to skip the frame.
pub fn extract(
    image: &RgbImage,
    min_count: usize,
    cfg: &ExtractConfig,
) -> CardMatchResult<Vec<Boundary>> {
    ensure_not_empty(image.width(), image.height())?;
    cfg.validate()?;

    let _span = trace_span!(
        "extract_boundaries",
        width = image.width(),
        height = image.height(),
        min_count = min_count
    )
    .entered();

    let gray = to_gray(image);
    let smooth = blur(&gray, cfg.blur_sigma);
    let binary = binarize(&smooth, cfg.threshold);
    let edges = canny(&binary, cfg.canny_low, cfg.canny_high);

    let mut boundaries: Vec<Boundary> = find_contours::<i32>(&edges)
        .into_iter()
        .filter(|c| c.points.len() >= cfg.min_points)
        .filter(|c| {
            !cfg.outermost_only
                || (matches!(c.border_type, BorderType::Outer) && c.parent.is_none())
        })
        .map(|c| {
            let points: Vec<Point> = c
                .points
                .iter()
                .map(|p| Point::new(p.x as f32, p.y as f32))
                .collect();
            let magnitude = signed_area(&points).abs();
            let area = match c.border_type {
                BorderType::Outer => magnitude,
                BorderType::Hole => -magnitude,
            };
            Boundary::with_area(points, area)
        })
        .collect();

    sort_by_area_desc(&mut boundaries);

    trace_event!(
        "boundaries_found",
        count = boundaries.len(),
        expected = min_count
    );
    Ok(boundaries)
}

/// Sorts boundaries by descending area; ties keep tracing order.
pub fn sort_by_area_desc(boundaries: &mut [Boundary]) {
    boundaries.sort_by(|a, b| b.area.total_cmp(&a.area));
}
