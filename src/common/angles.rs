//! Angle helpers shared by the lattice and the cost model

use std::f64::consts::PI;

/// Full turn [rad]
pub const TWO_PI: f64 = 2.0 * PI;

/// Wrap an angle into [0, 2*pi)
pub fn wrap_two_pi(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(TWO_PI);
    // rem_euclid can round up to exactly 2*pi for tiny negative inputs
    if wrapped >= TWO_PI {
        0.0
    } else {
        wrapped
    }
}

/// Normalize angle to [-PI, PI)
pub fn normalize_angle(angle: f64) -> f64 {
    wrap_two_pi(angle + PI) - PI
}

/// Absolute shortest rotation between two headings, in [0, PI]
pub fn angular_distance(a: f64, b: f64) -> f64 {
    normalize_angle(a - b).abs()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_two_pi() {
        assert!((wrap_two_pi(0.0) - 0.0).abs() < 1e-12);
        assert!((wrap_two_pi(-PI / 2.0) - 1.5 * PI).abs() < 1e-12);
        assert!((wrap_two_pi(5.0 * PI) - PI).abs() < 1e-12);
        assert!(wrap_two_pi(-1e-20) < TWO_PI);
        assert!(wrap_two_pi(TWO_PI).abs() < 1e-12);
    }

    #[test]
    fn test_normalize_angle() {
        assert!((normalize_angle(3.0 * PI) - (-PI)).abs() < 1e-12);
        assert!((normalize_angle(1.5 * PI) - (-0.5 * PI)).abs() < 1e-12);
        assert!((normalize_angle(0.25) - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_angular_distance_wraps() {
        assert!(angular_distance(0.01, TWO_PI - 0.01) < 0.02 + 1e-12);
        assert!((angular_distance(0.0, PI) - PI).abs() < 1e-12);
        assert!((angular_distance(1.0, 1.5) - 0.5).abs() < 1e-12);
    }
}
