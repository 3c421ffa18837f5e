//! Polygon-edge-intersection strategy.

use crate::boundary::Boundary;
use crate::geometry::{intersect_lines, sort_by_length_desc, sort_by_sequence, Line};
use crate::quad::{simplify, QuadRecoverer, Quadrilateral};
use crate::util::{CardMatchError, CardMatchResult};

/// Recovers the corners as intersections of the four longest sides.
///
/// The simplified polygon is closed into edges, the four longest are kept
/// as the card sides, re-sorted by traversal order, and each consecutive
/// pair is intersected. Clipped or rounded corners do not move the result.
#[derive(Clone, Copy, Debug)]
pub struct EdgeIntersection {
    pub epsilon_fraction: f64,
    pub min_edge_length: f32,
}

impl QuadRecoverer for EdgeIntersection {
    fn recover(&self, boundary: &Boundary) -> CardMatchResult<Quadrilateral> {
        let poly = simplify(boundary.points(), self.epsilon_fraction)?;
        if poly.len() < 4 {
            return Err(CardMatchError::DegenerateGeometry {
                reason: "simplified polygon has fewer than 4 edges",
            });
        }

        let mut lines: Vec<Line> = (0..poly.len())
            .map(|i| Line::new(i, poly[i], poly[(i + 1) % poly.len()]))
            .collect();
        sort_by_length_desc(&mut lines);
        lines.truncate(4);
        if lines.iter().any(|l| l.length < self.min_edge_length) {
            return Err(CardMatchError::DegenerateGeometry {
                reason: "card side shorter than min_edge_length",
            });
        }
        sort_by_sequence(&mut lines);

        let mut corners = [lines[0].p1; 4];
        for (k, corner) in corners.iter_mut().enumerate() {
            *corner = intersect_lines(&lines[k], &lines[(k + 1) % 4]).ok_or(
                CardMatchError::DegenerateGeometry {
                    reason: "adjacent card sides are parallel",
                },
            )?;
        }
        Quadrilateral::new(corners)
    }
}
