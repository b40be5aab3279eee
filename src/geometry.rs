// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Planar geometry primitives over normalized landmark coordinates.
//!
//! All functions are pure. Zero-length vectors are treated as degenerate and yield an
//! angle of `0.0` instead of `NaN`.

use crate::landmarks::LandmarkPoint;

/// Angle in degrees at vertex `p2` between the arms `p2 -> p1` and `p2 -> p3`.
///
/// Returns `0.0` when either arm has zero length.
///
/// # Example
///
/// ```rust
/// use posture_assessment::geometry::angle;
/// use posture_assessment::LandmarkPoint;
///
/// let a = LandmarkPoint::new(0.0, 1.0, 1.0);
/// let b = LandmarkPoint::new(0.0, 0.0, 1.0);
/// let c = LandmarkPoint::new(1.0, 0.0, 1.0);
/// assert!((angle(&a, &b, &c) - 90.0).abs() < 1e-4);
/// ```
#[must_use]
pub fn angle(p1: &LandmarkPoint, p2: &LandmarkPoint, p3: &LandmarkPoint) -> f32 {
    let a = [p1.x - p2.x, p1.y - p2.y];
    let b = [p3.x - p2.x, p3.y - p2.y];
    let mag_a = a[0].hypot(a[1]);
    let mag_b = b[0].hypot(b[1]);
    if mag_a == 0.0 || mag_b == 0.0 {
        return 0.0;
    }
    let dot = a[0].mul_add(b[0], a[1] * b[1]);
    acos_degrees(dot / (mag_a * mag_b))
}

/// Angle in degrees between the vector `p1 -> p2` and the +x axis, shifted by -90.
///
/// A vector pointing straight up or down the image yields `0.0`; vectors tilted toward +x
/// are negative and toward -x positive. Returns `0.0` when `p1 == p2`.
#[must_use]
pub fn horizontal_angle(p1: &LandmarkPoint, p2: &LandmarkPoint) -> f32 {
    let v = [p2.x - p1.x, p2.y - p1.y];
    let mag = v[0].hypot(v[1]);
    if mag == 0.0 {
        return 0.0;
    }
    acos_degrees(v[0] / mag) - 90.0
}

/// Angle in degrees between the vector `p1 -> p2` and the downward vertical `(0, 1)`.
///
/// Returns `0.0` when `p1 == p2`.
#[must_use]
pub fn vertical_angle(p1: &LandmarkPoint, p2: &LandmarkPoint) -> f32 {
    let v = [p2.x - p1.x, p2.y - p1.y];
    let mag = v[0].hypot(v[1]);
    if mag == 0.0 {
        return 0.0;
    }
    acos_degrees(v[1] / mag)
}

/// Euclidean distance between two points in the image plane.
#[must_use]
pub fn distance(p1: &LandmarkPoint, p2: &LandmarkPoint) -> f32 {
    (p1.x - p2.x).hypot(p1.y - p2.y)
}

/// Midpoint of two points. Confidence is the lower of the two.
#[must_use]
pub fn midpoint(p1: &LandmarkPoint, p2: &LandmarkPoint) -> LandmarkPoint {
    LandmarkPoint::new(
        (p1.x + p2.x) / 2.0,
        (p1.y + p2.y) / 2.0,
        p1.confidence.min(p2.confidence),
    )
}

// Rounding can push a cosine just past ±1.
fn acos_degrees(cos: f32) -> f32 {
    cos.clamp(-1.0, 1.0).acos().to_degrees()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pt(x: f32, y: f32) -> LandmarkPoint {
        LandmarkPoint::new(x, y, 1.0)
    }

    #[test]
    fn test_right_angle() {
        let v = angle(&pt(0.2, 0.5), &pt(0.5, 0.5), &pt(0.5, 0.2));
        assert!((v - 90.0).abs() < 1e-3);
    }

    #[test]
    fn test_straight_line() {
        let v = angle(&pt(0.1, 0.5), &pt(0.5, 0.5), &pt(0.9, 0.5));
        assert!((v - 180.0).abs() < 1e-3);
    }

    #[test]
    fn test_angle_symmetric_in_arms() {
        let cases = [
            (pt(0.1, 0.2), pt(0.4, 0.6), pt(0.9, 0.3)),
            (pt(0.33, 0.71), pt(0.52, 0.18), pt(0.05, 0.95)),
            (pt(0.5, 0.5), pt(0.6, 0.4), pt(0.7, 0.51)),
        ];
        for (a, b, c) in cases {
            assert_eq!(angle(&a, &b, &c), angle(&c, &b, &a));
        }
    }

    #[test]
    fn test_angle_translation_invariant() {
        let (a, b, c) = (pt(0.1, 0.2), pt(0.4, 0.6), pt(0.9, 0.3));
        let shift = |p: LandmarkPoint| pt(p.x + 0.05, p.y - 0.1);
        let moved = angle(&shift(a), &shift(b), &shift(c));
        assert!((angle(&a, &b, &c) - moved).abs() < 1e-3);
    }

    #[test]
    fn test_degenerate_arms_give_zero() {
        let (a, b) = (pt(0.3, 0.3), pt(0.6, 0.1));
        assert!(angle(&a, &a, &b).abs() < f32::EPSILON);
        assert!(angle(&b, &a, &a).abs() < f32::EPSILON);
        assert!(horizontal_angle(&a, &a).abs() < f32::EPSILON);
        assert!(vertical_angle(&b, &b).abs() < f32::EPSILON);
    }

    #[test]
    fn test_horizontal_angle() {
        // straight up the image
        assert!(horizontal_angle(&pt(0.5, 0.5), &pt(0.5, 0.2)).abs() < 1e-3);
        // pointing toward -x
        assert!((horizontal_angle(&pt(0.5, 0.5), &pt(0.2, 0.5)) - 90.0).abs() < 1e-3);
        // pointing toward +x
        assert!((horizontal_angle(&pt(0.5, 0.5), &pt(0.8, 0.5)) + 90.0).abs() < 1e-3);
    }

    #[test]
    fn test_vertical_angle() {
        assert!(vertical_angle(&pt(0.5, 0.2), &pt(0.5, 0.6)).abs() < 1e-3);
        assert!((vertical_angle(&pt(0.2, 0.5), &pt(0.6, 0.5)) - 90.0).abs() < 1e-3);
    }

    #[test]
    fn test_distance_and_midpoint() {
        assert!((distance(&pt(0.0, 0.0), &pt(0.3, 0.4)) - 0.5).abs() < 1e-6);
        let m = midpoint(&LandmarkPoint::new(0.2, 0.4, 0.9), &LandmarkPoint::new(0.4, 0.8, 0.5));
        assert!((m.x - 0.3).abs() < 1e-6);
        assert!((m.y - 0.6).abs() < 1e-6);
        assert!((m.confidence - 0.5).abs() < 1e-6);
    }
}
