//! Line segments with traversal and length orderings.

use crate::geometry::{angle_deg, distance, Point};

/// Segment between two points, tagged with its position among a polygon's
/// edges.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Line {
    /// Index of the edge in traversal order.
    pub seq: usize,
    /// Start point.
    pub p1: Point,
    /// End point.
    pub p2: Point,
    /// Euclidean length, cached at construction.
    pub length: f32,
}

impl Line {
    /// Creates a line and caches its length.
    pub fn new(seq: usize, p1: Point, p2: Point) -> Self {
        Self {
            seq,
            p1,
            p2,
            length: distance(p1, p2),
        }
    }

    /// Direction of `p1 -> p2` in degrees.
    pub fn angle_deg(&self) -> f32 {
        angle_deg(self.p1, self.p2)
    }

    /// Returns true if both lines share an endpoint.
    pub fn shares_endpoint(&self, other: &Line) -> bool {
        self.p1 == other.p1 || self.p1 == other.p2 || self.p2 == other.p1 || self.p2 == other.p2
    }
}

/// Sorts lines longest first; equal lengths keep traversal order.
pub fn sort_by_length_desc(lines: &mut [Line]) {
    lines.sort_by(|a, b| {
        b.length
            .total_cmp(&a.length)
            .then_with(|| a.seq.cmp(&b.seq))
    });
}

/// Sorts lines by traversal order.
pub fn sort_by_sequence(lines: &mut [Line]) {
    lines.sort_by_key(|line| line.seq);
}

/// Intersects the infinite lines through `a` and `b`.
///
/// Vertical lines are handled separately from the slope-intercept form.
/// Returns `None` for parallel or zero-length lines.
pub fn intersect_lines(a: &Line, b: &Line) -> Option<Point> {
    const EPS: f32 = 1e-6;
    let a_dx = a.p2.x - a.p1.x;
    let b_dx = b.p2.x - b.p1.x;
    if a.length <= EPS || b.length <= EPS {
        return None;
    }
    let a_vertical = a_dx.abs() <= EPS;
    let b_vertical = b_dx.abs() <= EPS;

    match (a_vertical, b_vertical) {
        (true, true) => None,
        (true, false) => {
            let m = (b.p2.y - b.p1.y) / b_dx;
            let c = b.p1.y - m * b.p1.x;
            let x = a.p1.x;
            Some(Point::new(x, m * x + c))
        }
        (false, true) => {
            let m = (a.p2.y - a.p1.y) / a_dx;
            let c = a.p1.y - m * a.p1.x;
            let x = b.p1.x;
            Some(Point::new(x, m * x + c))
        }
        (false, false) => {
            let ma = (a.p2.y - a.p1.y) / a_dx;
            let mb = (b.p2.y - b.p1.y) / b_dx;
            if (ma - mb).abs() <= EPS {
                return None;
            }
            let ca = a.p1.y - ma * a.p1.x;
            let cb = b.p1.y - mb * b.p1.x;
            let x = (cb - ca) / (ma - mb);
            let point = Point::new(x, ma * x + ca);
            if point.x.is_finite() && point.y.is_finite() {
                Some(point)
            } else {
                None
            }
        }
    }
}
