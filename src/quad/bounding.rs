//! Minimal-area rotated rectangle strategy.

use crate::boundary::Boundary;
use crate::geometry::Point;
use crate::quad::{QuadRecoverer, Quadrilateral};
use crate::util::{CardMatchError, CardMatchResult};
use imageproc::geometry::min_area_rect;

/// Takes the four corners of the smallest rotated rectangle enclosing the
/// boundary.
///
/// Robust to ragged outlines; under strong perspective the rectangle is
/// only as good as the card's bounding box.
#[derive(Clone, Copy, Debug, Default)]
pub struct BoundingRect;

impl QuadRecoverer for BoundingRect {
    fn recover(&self, boundary: &Boundary) -> CardMatchResult<Quadrilateral> {
        if boundary.len() < 4 {
            return Err(CardMatchError::DegenerateGeometry {
                reason: "boundary has fewer than 4 points",
            });
        }
        let pts: Vec<imageproc::point::Point<i32>> = boundary
            .points()
            .iter()
            .map(|p| imageproc::point::Point::new(p.x.round() as i32, p.y.round() as i32))
            .collect();
        let rect = min_area_rect(&pts);
        Quadrilateral::new(rect.map(|p| Point::new(p.x as f32, p.y as f32)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotated_square_outline_gives_rotated_corners() {
        // Diamond: a square rotated by 45 degrees.
        let mut pts = Vec::new();
        for i in 0..20 {
            let t = i as f32;
            pts.push(Point::new(50.0 + t, 30.0 + t));
            pts.push(Point::new(70.0 - t, 50.0 + t));
            pts.push(Point::new(50.0 - t, 70.0 - t));
            pts.push(Point::new(30.0 + t, 50.0 - t));
        }
        let quad = BoundingRect.recover(&Boundary::new(pts)).unwrap();
        for corner in quad.corners() {
            let near = [(50.0, 30.0), (70.0, 50.0), (50.0, 70.0), (30.0, 50.0)]
                .iter()
                .any(|&(x, y)| (corner.x - x).abs() <= 1.5 && (corner.y - y).abs() <= 1.5);
            assert!(near, "unexpected corner {corner:?}");
        }
    }
}
