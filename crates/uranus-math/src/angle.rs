//! Scalar and angular interpolation.

use std::f64::consts::{PI, TAU};

/// Linear interpolation from `a` to `b` by `t`.
#[inline]
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Wrap an angle into `[-pi, pi]`.
pub fn wrap_angle(angle: f64) -> f64 {
    (angle + PI).rem_euclid(TAU) - PI
}

/// Wrap an angle into `[0, 2pi)`.
pub fn normalize_angle(angle: f64) -> f64 {
    let a = angle.rem_euclid(TAU);
    // rem_euclid rounds up to TAU for tiny negative inputs.
    if a >= TAU { 0.0 } else { a }
}

/// Signed difference `to - from` taken the short way around the circle.
///
/// The magnitude never exceeds pi.
pub fn shortest_angle_delta(from: f64, to: f64) -> f64 {
    wrap_angle(to - from)
}

/// Interpolate between two angles along the shortest arc.
///
/// The result is continuous with `from` (not wrapped), so callers keeping an
/// unbounded azimuth see no jump at `t = 0`.
pub fn lerp_angle(from: f64, to: f64, t: f64) -> f64 {
    from + shortest_angle_delta(from, to) * t
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lerp_endpoints_and_midpoint() {
        assert_eq!(lerp(2.0, 6.0, 0.0), 2.0);
        assert_eq!(lerp(2.0, 6.0, 1.0), 6.0);
        assert_eq!(lerp(2.0, 6.0, 0.5), 4.0);
    }

    #[test]
    fn test_wrap_angle_range() {
        for i in -50..50 {
            let a = i as f64 * 0.37;
            let w = wrap_angle(a);
            assert!((-PI..=PI).contains(&w), "{a} wrapped to {w}");
            assert!(((a - w) / TAU - ((a - w) / TAU).round()).abs() < 1e-9);
        }
    }

    #[test]
    fn test_normalize_angle_range() {
        assert!((normalize_angle(-0.5) - (TAU - 0.5)).abs() < 1e-12);
        assert!((normalize_angle(TAU + 0.25) - 0.25).abs() < 1e-12);
        assert_eq!(normalize_angle(0.0), 0.0);
    }

    #[test]
    fn test_shortest_delta_goes_the_short_way() {
        let start = 0.3;
        let end = start + 1.9 * PI;
        let delta = shortest_angle_delta(start, end);
        assert!((delta - (-0.1 * PI)).abs() < 1e-9, "delta = {delta}");
        assert!(delta.abs() <= PI);
    }

    #[test]
    fn test_lerp_angle_across_wrap() {
        let from = 170.0_f64.to_radians();
        let to = (-170.0_f64).to_radians();
        let mid = lerp_angle(from, to, 0.5);
        assert!((normalize_angle(mid) - PI).abs() < 1e-9, "mid = {mid}");
    }

    #[test]
    fn test_lerp_angle_endpoints() {
        let from = 5.0;
        let to = -1.0;
        assert_eq!(lerp_angle(from, to, 0.0), from);
        let end = lerp_angle(from, to, 1.0);
        assert!(shortest_angle_delta(end, to).abs() < 1e-9);
    }
}
