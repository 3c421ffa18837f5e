//! Quadrilateral recovery from a traced boundary.
//!
//! Three interchangeable strategies turn a noisy outline into four corner
//! points. Every strategy ends in [`Quadrilateral::new`], which rejects
//! degenerate corner sets and applies the canonical labelling: clockwise
//! on screen, with the `p1-p2`/`p3-p4` side pair the longer one.

mod bounding;
mod diagonal;
mod edges;

pub use bounding::BoundingRect;
pub use diagonal::DiagonalPairing;
pub use edges::EdgeIntersection;

use crate::boundary::Boundary;
use crate::geometry::{distance, is_collinear, segments_cross, signed_area, Point};
use crate::trace::trace_span;
use crate::util::{CardMatchError, CardMatchResult};
use imageproc::geometry::{approximate_polygon_dp, arc_length};

/// Smallest enclosed area, in square pixels, accepted for a card.
const MIN_QUAD_AREA: f32 = 16.0;

/// Distance, in pixels, under which three corners count as collinear.
const COLLINEAR_TOL: f32 = 0.5;

/// Four card corners in canonical labelling.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Quadrilateral {
    corners: [Point; 4],
}

impl Quadrilateral {
    /// Validates and canonicalizes four corners.
    ///
    /// Fails with `DegenerateGeometry` if any corner is non-finite, three
    /// corners are collinear, the polygon self-intersects, or its area is
    /// negligible.
    pub fn new(corners: [Point; 4]) -> CardMatchResult<Self> {
        validate_corners(&corners)?;
        let clockwise = if signed_area(&corners) < 0.0 {
            [corners[0], corners[3], corners[2], corners[1]]
        } else {
            corners
        };
        Ok(Self {
            corners: canonical_orientation(clockwise),
        })
    }

    /// Corners `[p1, p2, p3, p4]`.
    pub fn corners(&self) -> [Point; 4] {
        self.corners
    }

    /// Side lengths `[p1p2, p2p3, p3p4, p4p1]`.
    pub fn side_lengths(&self) -> [f32; 4] {
        side_lengths(&self.corners)
    }

    /// Enclosed area in square pixels.
    pub fn area(&self) -> f32 {
        signed_area(&self.corners).abs()
    }
}

fn side_lengths(c: &[Point; 4]) -> [f32; 4] {
    [
        distance(c[0], c[1]),
        distance(c[1], c[2]),
        distance(c[2], c[3]),
        distance(c[3], c[0]),
    ]
}

/// Rotates the labels by one position when the `p2-p3` side pair is longer
/// than the `p1-p2` pair.
///
/// Comparing opposite-side sums makes the fix idempotent for any simple
/// quadrilateral: after one rotation the condition no longer holds.
pub fn canonical_orientation(corners: [Point; 4]) -> [Point; 4] {
    let [a, b, c, d] = side_lengths(&corners);
    if a + c < b + d {
        [corners[1], corners[2], corners[3], corners[0]]
    } else {
        corners
    }
}

/// Checks the corner invariants without reordering.
pub fn validate_corners(c: &[Point; 4]) -> CardMatchResult<()> {
    if c.iter().any(|p| !p.x.is_finite() || !p.y.is_finite()) {
        return Err(CardMatchError::DegenerateGeometry {
            reason: "non-finite corner",
        });
    }
    for i in 0..4 {
        let (a, b, d) = (c[i], c[(i + 1) % 4], c[(i + 2) % 4]);
        if is_collinear(a, b, d, COLLINEAR_TOL) {
            return Err(CardMatchError::DegenerateGeometry {
                reason: "collinear corners",
            });
        }
    }
    if segments_cross(c[0], c[1], c[2], c[3]) || segments_cross(c[1], c[2], c[3], c[0]) {
        return Err(CardMatchError::DegenerateGeometry {
            reason: "self-intersecting quadrilateral",
        });
    }
    if signed_area(c).abs() < MIN_QUAD_AREA {
        return Err(CardMatchError::DegenerateGeometry {
            reason: "quadrilateral area too small",
        });
    }
    Ok(())
}

/// Strategy seam: one boundary in, one validated quadrilateral out.
pub trait QuadRecoverer {
    fn recover(&self, boundary: &Boundary) -> CardMatchResult<Quadrilateral>;
}

/// Selects a recovery strategy at runtime.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum QuadStrategy {
    /// Minimal-area rotated rectangle around all boundary points.
    #[default]
    BoundingRect,
    /// Two well-separated diagonals of the simplified polygon.
    DiagonalPairing,
    /// Intersections of the four longest simplified edges.
    EdgeIntersection,
}

/// Parameters shared by the polygon-based strategies.
#[derive(Clone, Debug)]
pub struct QuadConfig {
    pub strategy: QuadStrategy,
    /// Simplification tolerance as a fraction of the boundary perimeter.
    pub epsilon_fraction: f64,
    /// Open angular window, in degrees, between two accepted diagonals.
    pub diagonal_angle_deg: (f32, f32),
    /// Shortest accepted card side after simplification, in pixels.
    pub min_edge_length: f32,
}

impl Default for QuadConfig {
    fn default() -> Self {
        Self {
            strategy: QuadStrategy::BoundingRect,
            epsilon_fraction: 0.02,
            diagonal_angle_deg: (60.0, 120.0),
            min_edge_length: 4.0,
        }
    }
}

impl QuadConfig {
    pub fn validate(&self) -> CardMatchResult<()> {
        if !(self.epsilon_fraction > 0.0 && self.epsilon_fraction < 1.0) {
            return Err(CardMatchError::InvalidConfig {
                reason: "epsilon_fraction must be in (0, 1)",
            });
        }
        let (lo, hi) = self.diagonal_angle_deg;
        if !(0.0..=180.0).contains(&lo) || !(lo < hi && hi <= 180.0) {
            return Err(CardMatchError::InvalidConfig {
                reason: "diagonal_angle_deg must satisfy 0 <= lo < hi <= 180",
            });
        }
        Ok(())
    }
}

impl QuadRecoverer for QuadConfig {
    fn recover(&self, boundary: &Boundary) -> CardMatchResult<Quadrilateral> {
        let _span = trace_span!("recover_quad", points = boundary.len()).entered();
        match self.strategy {
            QuadStrategy::BoundingRect => BoundingRect.recover(boundary),
            QuadStrategy::DiagonalPairing => DiagonalPairing {
                epsilon_fraction: self.epsilon_fraction,
                angle_window_deg: self.diagonal_angle_deg,
            }
            .recover(boundary),
            QuadStrategy::EdgeIntersection => EdgeIntersection {
                epsilon_fraction: self.epsilon_fraction,
                min_edge_length: self.min_edge_length,
            }
            .recover(boundary),
        }
    }
}

/// Douglas-Peucker simplification of a closed boundary.
///
/// The tolerance is `epsilon_fraction` of the boundary perimeter.
pub(crate) fn simplify(points: &[Point], epsilon_fraction: f64) -> CardMatchResult<Vec<Point>> {
    if points.len() < 4 {
        return Err(CardMatchError::DegenerateGeometry {
            reason: "boundary has fewer than 4 points",
        });
    }
    let curve: Vec<imageproc::point::Point<f32>> = points
        .iter()
        .map(|p| imageproc::point::Point::new(p.x, p.y))
        .collect();
    let epsilon = arc_length(&curve, true) * epsilon_fraction;
    if !(epsilon > 0.0) {
        return Err(CardMatchError::DegenerateGeometry {
            reason: "boundary has zero perimeter",
        });
    }
    let mut poly: Vec<Point> = approximate_polygon_dp(&curve, epsilon, true)
        .into_iter()
        .map(|p| Point::new(p.x, p.y))
        .collect();
    // A closed result may repeat its first vertex.
    if poly.len() > 1 && poly.first() == poly.last() {
        poly.pop();
    }
    Ok(poly)
}
