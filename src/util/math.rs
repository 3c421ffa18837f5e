//! Angle helpers for undirected line directions.

/// Wraps an angle in degrees to the range [0, 180).
///
/// Undirected line directions are equal modulo 180 degrees.
pub(crate) fn wrap_half_turn_deg(angle_deg: f32) -> f32 {
    let wrapped = angle_deg.rem_euclid(180.0);
    if wrapped >= 180.0 {
        0.0
    } else {
        wrapped
    }
}

/// Returns the unsigned difference between two undirected line directions,
/// in degrees within [0, 90].
pub(crate) fn line_direction_diff_deg(a_deg: f32, b_deg: f32) -> f32 {
    let diff = (wrap_half_turn_deg(a_deg) - wrap_half_turn_deg(b_deg)).abs();
    if diff > 90.0 {
        180.0 - diff
    } else {
        diff
    }
}

#[cfg(test)]
mod tests {
    use super::{line_direction_diff_deg, wrap_half_turn_deg};

    #[test]
    fn wrap_half_turn_maps_to_expected_range() {
        assert!((wrap_half_turn_deg(190.0) - 10.0).abs() < 1e-4);
        assert!((wrap_half_turn_deg(-10.0) - 170.0).abs() < 1e-4);
        assert!(wrap_half_turn_deg(180.0).abs() < 1e-4);
    }

    #[test]
    fn line_direction_diff_is_symmetric() {
        assert!((line_direction_diff_deg(10.0, 170.0) - 20.0).abs() < 1e-4);
        assert!((line_direction_diff_deg(170.0, 10.0) - 20.0).abs() < 1e-4);
        assert!((line_direction_diff_deg(0.0, 90.0) - 90.0).abs() < 1e-4);
    }
}
