//! Diagonal-pairing strategy.

use crate::boundary::Boundary;
use crate::geometry::{sort_by_length_desc, Line};
use crate::quad::{simplify, QuadRecoverer, Quadrilateral};
use crate::util::math::line_direction_diff_deg;
use crate::util::{CardMatchError, CardMatchResult};

/// Recovers the card from its two diagonals.
///
/// Every vertex pair of the simplified polygon is a candidate line. The
/// longest is the first diagonal; the second is the longest remaining line
/// that shares no endpoint with it and whose direction differs by an angle
/// inside `angle_window_deg`. Fails when no such line exists.
#[derive(Clone, Copy, Debug)]
pub struct DiagonalPairing {
    pub epsilon_fraction: f64,
    pub angle_window_deg: (f32, f32),
}

impl QuadRecoverer for DiagonalPairing {
    fn recover(&self, boundary: &Boundary) -> CardMatchResult<Quadrilateral> {
        let poly = simplify(boundary.points(), self.epsilon_fraction)?;
        if poly.len() < 4 {
            return Err(CardMatchError::DegenerateGeometry {
                reason: "simplified polygon has fewer than 4 vertices",
            });
        }

        let mut lines = Vec::with_capacity(poly.len() * (poly.len() - 1) / 2);
        for i in 0..poly.len() {
            for j in i + 1..poly.len() {
                lines.push(Line::new(lines.len(), poly[i], poly[j]));
            }
        }
        sort_by_length_desc(&mut lines);

        let first = lines[0];
        let (lo, hi) = self.angle_window_deg;
        let second = lines[1..]
            .iter()
            .find(|line| {
                if line.shares_endpoint(&first) {
                    return false;
                }
                // Undirected difference in [0, 90]; the window is symmetric
                // around 90 so both `d` and `180 - d` are tested.
                let d = line_direction_diff_deg(first.angle_deg(), line.angle_deg());
                (d > lo && d < hi) || (180.0 - d > lo && 180.0 - d < hi)
            })
            .ok_or(CardMatchError::DegenerateGeometry {
                reason: "no second diagonal inside the angular window",
            })?;

        Quadrilateral::new([first.p1, second.p1, first.p2, second.p2])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;

    fn polygon_boundary(vertices: &[(f32, f32)]) -> Boundary {
        // Densify edges so simplification has something to remove.
        let mut pts = Vec::new();
        for i in 0..vertices.len() {
            let (x0, y0) = vertices[i];
            let (x1, y1) = vertices[(i + 1) % vertices.len()];
            for s in 0..10 {
                let t = s as f32 / 10.0;
                pts.push(Point::new(x0 + (x1 - x0) * t, y0 + (y1 - y0) * t));
            }
        }
        Boundary::new(pts)
    }

    #[test]
    fn pairs_crossing_diagonals_of_a_skewed_card() {
        let boundary = polygon_boundary(&[(10.0, 12.0), (80.0, 5.0), (95.0, 110.0), (5.0, 100.0)]);
        let quad = DiagonalPairing {
            epsilon_fraction: 0.02,
            angle_window_deg: (60.0, 120.0),
        }
        .recover(&boundary)
        .unwrap();
        assert!(quad.area() > 7000.0);
    }

    #[test]
    fn elongated_shape_without_second_diagonal_fails() {
        // Diagonals of a 10:1 strip are nearly parallel.
        let boundary = polygon_boundary(&[(0.0, 0.0), (200.0, 0.0), (200.0, 20.0), (0.0, 20.0)]);
        let err = DiagonalPairing {
            epsilon_fraction: 0.01,
            angle_window_deg: (60.0, 120.0),
        }
        .recover(&boundary)
        .unwrap_err();
        assert!(matches!(err, CardMatchError::DegenerateGeometry { .. }));
    }
}
